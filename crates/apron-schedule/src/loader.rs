//! CSV operation-table loader.
//!
//! # CSV format
//!
//! One row per operation, with a header row.  Durations and delays are in
//! minutes; empty cells mean "absent".
//!
//! ```csv
//! name,duration_min,dep_1,dep_2,dep_3,dep_4,dep_5,dep_6,loc_1_x,loc_1_y,loc_2_x,loc_2_y,delay_min
//! Parking,2,,,,,,,,,,,0
//! Connect_Bridge,1.5,Parking,,,,,,820,140,,,0
//! Boarding,15,Connect_Bridge,Catering_Front,,,,,820,140,,,0
//! ```
//!
//! A location is kept only when both of its coordinates are present.  Delays
//! are rounded to whole minutes.  Dependency names may refer to rows further
//! down; they are resolved when the table is handed to a
//! [`Scheduler`](crate::Scheduler).

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use apron_core::Point;

use crate::operation::OperationDef;
use crate::ScheduleError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct OperationRecord {
    name:         String,
    duration_min: f64,
    dep_1:        Option<String>,
    dep_2:        Option<String>,
    dep_3:        Option<String>,
    dep_4:        Option<String>,
    dep_5:        Option<String>,
    dep_6:        Option<String>,
    loc_1_x:      Option<f32>,
    loc_1_y:      Option<f32>,
    loc_2_x:      Option<f32>,
    loc_2_y:      Option<f32>,
    delay_min:    Option<f64>,
}

impl OperationRecord {
    fn into_def(self) -> Result<OperationDef, ScheduleError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(ScheduleError::Parse("operation with empty name".into()));
        }
        if !self.duration_min.is_finite() || self.duration_min < 0.0 {
            return Err(ScheduleError::Parse(format!(
                "operation {name:?}: invalid duration {}",
                self.duration_min
            )));
        }

        let deps = [self.dep_1, self.dep_2, self.dep_3, self.dep_4, self.dep_5, self.dep_6]
            .into_iter()
            .flatten()
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty())
            .collect();

        let locations = [(self.loc_1_x, self.loc_1_y), (self.loc_2_x, self.loc_2_y)]
            .into_iter()
            .filter_map(|(x, y)| Some(Point::new(x?, y?)))
            .collect();

        Ok(OperationDef {
            name,
            duration: self.duration_min * 60.0,
            deps,
            locations,
            delay_minutes: self.delay_min.map_or(0, |d| d.round() as i32),
        })
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load an operation table from a CSV file.
pub fn load_operations_csv(path: &Path) -> Result<Vec<OperationDef>, ScheduleError> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_operations_reader(file)
}

/// Like [`load_operations_csv`] but accepts any `Read` source.
pub fn load_operations_reader<R: Read>(reader: R) -> Result<Vec<OperationDef>, ScheduleError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    csv_reader
        .deserialize::<OperationRecord>()
        .map(|row| {
            row.map_err(|e| ScheduleError::Parse(e.to_string()))
                .and_then(OperationRecord::into_def)
        })
        .collect()
}
