//! `apron-sim`: the turnaround tick loop.
//!
//! # Tick order
//!
//! ```text
//! tick(wall_dt):
//!   paused or finished → nothing happens
//!   ① Clock     sim_dt = wall_dt × multiplier; decide fast-forward
//!   ② Schedule  Scheduler::advance(sim_dt, now)
//!   ③ Fleet     every vehicle, in spawn order, reads the schedule
//!   ④ Observe   completions, leg events, periodic snapshots
//! ```
//!
//! The scheduler always runs before the fleet, so a vehicle sees the
//! completions of the current tick.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use apron_core::SimConfig;
//! use apron_schedule::{OperationTables, Variant};
//! use apron_sim::{NoopObserver, SimBuilder};
//! use apron_spatial::GridPlanner;
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), tables, GridPlanner::default())
//!     .grid("apron", grid)
//!     .archetype(truck)
//!     .fleet(Variant::Manual, vehicles)
//!     .build()?;
//! sim.run(1.0 / 60.0, 1_000_000, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod control;
pub mod error;
pub mod observer;
pub mod sim;
pub mod view;

#[cfg(test)]
mod tests;

pub use builder::{Itineraries, SimBuilder};
pub use control::Control;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Simulation, TickReport};
pub use view::{OperationView, VehicleView};
