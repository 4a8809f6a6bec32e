//! `apron-core`: foundational types for the apron turnaround simulator.
//!
//! This crate is a dependency of every other `apron-*` crate.  It has no
//! `apron-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `OpId`, `VehicleId`                                   |
//! | [`geo`]         | `Point`, heading helpers, angle normalisation         |
//! | [`time`]        | `SimClock`, `SpeedMultiplier`                         |
//! | [`config`]      | `SimConfig` and its sections                          |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ClockConfig, FrameConfig, MotionConfig, SimConfig, StopCone, TrafficConfig};
pub use error::{CoreError, CoreResult};
pub use geo::{Point, angle_between, lerp_angle, normalize_angle};
pub use ids::{OpId, VehicleId};
pub use time::{SimClock, SpeedMultiplier};
