//! CSV fleet loader.
//!
//! # CSV format
//!
//! One row per itinerary leg, with a header row.  Rows of the same vehicle
//! appear in leg order; the starting pose and archetype are read from the
//! vehicle's first row.  Vehicles keep the order of their first appearance.
//!
//! ```csv
//! vehicle,archetype,start_x,start_y,start_heading,goal_x,goal_y,heading,wait,reverse,snap,start_gate,end_gate,kind
//! LDL_Rear,ldl,655,1370,-90,815,325,0,0,false,true,Connect_LDL_Rear,,outbound
//! LDL_Rear,ldl,655,1370,-90,535,1370,,0,true,true,,Remove_LDL_Rear,return
//! ```
//!
//! | Column       | Empty means                 |
//! |--------------|-----------------------------|
//! | `heading`    | no arrival heading          |
//! | `wait`       | no dwell                    |
//! | `reverse`    | `false`                     |
//! | `snap`       | `true`                      |
//! | `start_gate` | always ready                |
//! | `end_gate`   | always completed            |
//! | `kind`       | `outbound`                  |

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use apron_core::Point;

use crate::itinerary::{LegKind, LegSpec, VehicleSpec};
use crate::MobilityError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum RecordKind {
    Outbound,
    Return,
}

#[derive(Deserialize)]
struct LegRecord {
    vehicle:       String,
    archetype:     String,
    start_x:       f32,
    start_y:       f32,
    start_heading: f32,
    goal_x:        f32,
    goal_y:        f32,
    heading:       Option<f32>,
    wait:          Option<f64>,
    reverse:       Option<bool>,
    snap:          Option<bool>,
    start_gate:    Option<String>,
    end_gate:      Option<String>,
    kind:          Option<RecordKind>,
}

impl LegRecord {
    fn leg(&self) -> LegSpec {
        let non_empty = |s: &Option<String>| s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned);
        LegSpec {
            goal: Point::new(self.goal_x, self.goal_y),
            heading: self.heading,
            wait: self.wait.unwrap_or(0.0),
            reverse: self.reverse.unwrap_or(false),
            snap: self.snap.unwrap_or(true),
            start_gate: non_empty(&self.start_gate),
            end_gate: non_empty(&self.end_gate),
            kind: match self.kind {
                Some(RecordKind::Return) => LegKind::Return,
                Some(RecordKind::Outbound) | None => LegKind::Outbound,
            },
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load vehicle itineraries from a CSV file.
pub fn load_fleet_csv(path: &Path) -> Result<Vec<VehicleSpec>, MobilityError> {
    let file = std::fs::File::open(path).map_err(MobilityError::Io)?;
    load_fleet_reader(file)
}

/// Like [`load_fleet_csv`] but accepts any `Read` source.
pub fn load_fleet_reader<R: Read>(reader: R) -> Result<Vec<VehicleSpec>, MobilityError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut specs: Vec<VehicleSpec> = Vec::new();

    for result in csv_reader.deserialize::<LegRecord>() {
        let row = result.map_err(|e| MobilityError::Parse(e.to_string()))?;
        let leg = row.leg();
        match specs.iter_mut().find(|s| s.name == row.vehicle) {
            Some(spec) => {
                if spec.archetype != row.archetype {
                    return Err(MobilityError::Parse(format!(
                        "vehicle {:?} switches archetype from {:?} to {:?}",
                        row.vehicle, spec.archetype, row.archetype
                    )));
                }
                spec.legs.push(leg);
            }
            None => {
                let start = Point::new(row.start_x, row.start_y);
                specs.push(VehicleSpec::new(row.vehicle, row.archetype, start, row.start_heading).leg(leg));
            }
        }
    }
    Ok(specs)
}
