//! `apron-spatial`: occupancy grids and path planning.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`grid`]    | `Cell`, `GridFrame`, `GridMap`, grid CSV loader             |
//! | [`search`]  | four-connected A* and line-of-sight smoothing               |
//! | [`path`]    | `Path` (consumable waypoint queue)                          |
//! | [`planner`] | `Planner` trait, `PathRequest`, `find_path`, `GridPlanner`, `ServiceRoad` |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod grid;
pub mod path;
pub mod planner;
pub mod search;


pub use error::{SpatialError, SpatialResult};
pub use grid::{Cell, GridFrame, GridMap, load_grid_csv, load_grid_reader};
pub use path::Path;
pub use planner::{GridPlanner, Lane, PathRequest, Planner, ServiceRoad, find_path};
pub use search::{astar, smooth};
