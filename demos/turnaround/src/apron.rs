//! Synthetic single-stand apron: obstacle grids, depot lanes, archetypes.
//!
//! ```text
//!  y = -200 ┌──────────────────────────────────────────────┐
//!           │            ┌──────┐                          │
//!           │   engine   │ fuse │   engine        Spot ◀── │
//!           │    ▓▓      │ lage │     ▓▓          dock     │
//!           │            └──────┘                          │
//!  y = 1080 └──┬──┬────────────────────────────────────────┘
//!              in out   (depot lanes, off-grid)
//! ```

use apron_core::{FrameConfig, Point};
use apron_mobility::{Archetype, DropSpec, TrailerSpec};
use apron_spatial::{GridFrame, GridMap, Lane, ServiceRoad, SpatialResult};

pub const ROWS: usize = 128;
pub const COLS: usize = 192;

pub const DEPOT_OUT: Point = Point::new(655.0, 1370.0);
pub const DEPOT_IN: Point = Point::new(535.0, 1370.0);

/// Grid name used by every archetype unless it says otherwise.
pub const APRON: &str = "apron";
pub const HYDRANT_OUT: &str = "hydrant_out";
pub const HYDRANT_RETURN: &str = "hydrant_return";

/// Aircraft footprint shared by every grid.
fn aircraft(grid: &mut GridMap) {
    // Fuselage.
    grid.block_rect(Point::new(880.0, 40.0), Point::new(1020.0, 1000.0));
    // Engines.
    grid.block_rect(Point::new(600.0, 540.0), Point::new(660.0, 600.0));
    grid.block_rect(Point::new(1260.0, 540.0), Point::new(1320.0, 600.0));
}

/// The base apron grid with the aircraft blocked out.
pub fn base_grid(frame: &FrameConfig) -> SpatialResult<GridMap> {
    let mut grid = GridMap::open(ROWS, COLS, GridFrame::from(frame))?;
    aircraft(&mut grid);
    Ok(grid)
}

/// Every named grid the fleet plans on.
///
/// `base` replaces the synthetic apron when a grid file was given.  The
/// hydrant truck leaves the pit forwards: its return grid walls off the
/// space behind the hose so the search cannot back out toward the engine.
pub fn grids(frame: &FrameConfig, base: Option<GridMap>) -> SpatialResult<Vec<(&'static str, GridMap)>> {
    let apron = match base {
        Some(grid) => grid,
        None => base_grid(frame)?,
    };
    let mut hydrant_return = apron.clone();
    hydrant_return.block_rect(Point::new(680.0, 480.0), Point::new(770.0, 520.0));

    Ok(vec![
        (APRON, apron.clone()),
        (HYDRANT_OUT, apron),
        (HYDRANT_RETURN, hydrant_return),
    ])
}

pub fn service_road() -> ServiceRoad {
    ServiceRoad::new(vec![
        Lane::new(DEPOT_OUT, Point::new(655.0, 1060.0)),
        Lane::new(DEPOT_IN, Point::new(535.0, 1060.0)),
    ])
}

pub fn archetypes() -> Vec<Archetype> {
    let baggage_cart = TrailerSpec::new(40.0).dropped(DropSpec {
        after_leg: 0,
        release: "Baggage_Unloading".into(),
        recall: "Baggage_Loading".into(),
        target: Point::new(760.0, 700.0),
        target_heading: -90.0,
        duration: 20.0,
    });

    vec![
        Archetype::new("hydrant", HYDRANT_OUT).with_return_grid(HYDRANT_RETURN),
        Archetype::new("ldl", APRON).with_speed(3.0),
        Archetype::new("catering", APRON).with_speed(3.0),
        Archetype::new("service", APRON).with_speed(2.5),
        Archetype::new("tug", APRON)
            .with_speed(2.5)
            .with_trailer(baggage_cart)
            .with_trailer(TrailerSpec::new(40.0)),
        Archetype::new("robot", APRON).agile(10.0).with_straighten(0.0).with_speed(0.5),
    ]
}
