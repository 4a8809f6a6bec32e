//! `apron-mobility`: service vehicles moving to the schedule's rhythm.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`gate`]        | `OperationStatus` trait, `Gate`, `ArrivalGate`            |
//! | [`itinerary`]   | `Archetype`, `LegSpec`, `VehicleSpec`, `TrailerSpec`      |
//! | [`kinematics`]  | `Motion`, `Pose`, steering and speed control              |
//! | [`trailer`]     | `Trailer`, `TrailerMode`, detach/reattach transitions     |
//! | [`traffic`]     | `Traffic` view of other vehicles, stop heuristic          |
//! | [`vehicle`]     | `Vehicle`, `VehicleState` itinerary state machine         |
//! | [`fleet`]       | `Fleet<P>`, `StepContext`, `LegEvent`, `NoPathPolicy`     |
//! | [`loader`]      | `load_fleet_csv`, `load_fleet_reader`                     |
//! | [`error`]       | `MobilityError`, `MobilityResult<T>`                      |
//!
//! # Vehicle life cycle
//!
//! ```text
//!            gates open, road clear,
//!            trailers attached
//!   Idle ───────────────────────────▶ EnRoute
//!    ▲                                  │ final arrival gate crossed
//!    │ wait elapsed                     ▼
//!    └──────────────────────────── Arrived ──▶ Departed (last leg)
//! ```
//!
//! Gating flows one way: vehicles read operation state through
//! [`OperationStatus`] and never write to the scheduler.

pub mod error;
pub mod fleet;
pub mod gate;
pub mod itinerary;
pub mod kinematics;
pub mod loader;
pub mod traffic;
pub mod trailer;
pub mod vehicle;


pub use error::{MobilityError, MobilityResult};
pub use fleet::{Fleet, LegEvent, NoPathPolicy, StepContext};
pub use gate::{ArrivalGate, Gate, OperationStatus};
pub use itinerary::{Archetype, DropSpec, LegKind, LegSpec, TrailerSpec, VehicleSpec};
pub use kinematics::{Motion, Pose};
pub use loader::{load_fleet_csv, load_fleet_reader};
pub use traffic::Traffic;
pub use trailer::{Trailer, TrailerMode};
pub use vehicle::{Vehicle, VehicleState};
