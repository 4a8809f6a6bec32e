//! `apron-schedule`: the dependency-gated operation scheduler.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`operation`]   | `OperationDef`, `Operation`, `Variant`                  |
//! | [`graph`]       | name resolution and acyclicity check                    |
//! | [`scheduler`]   | `Scheduler`, `OperationTables`                          |
//! | [`loader`]      | `load_operations_csv`, `load_operations_reader`         |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`                    |
//!
//! # Timer model (summary)
//!
//! Each operation carries a countdown initialised to its nominal duration.
//! On every [`Scheduler::advance`] call, operations whose dependencies were
//! all complete at the start of the call lose `elapsed` seconds:
//!
//! ```text
//! completed  ⇔  time_left + delay ≤ 0
//! ```
//!
//! Completion is monotonic until an explicit [`Scheduler::reset`].

pub mod error;
pub mod graph;
pub mod loader;
pub mod operation;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use error::{ScheduleError, ScheduleResult};
pub use graph::resolve;
pub use loader::{load_operations_csv, load_operations_reader};
pub use operation::{Operation, OperationDef, Variant};
pub use scheduler::{OperationTables, Scheduler};
