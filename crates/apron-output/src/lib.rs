//! `apron-output`: simulation output writers.
//!
//! | File                 | One row per                                   |
//! |----------------------|-----------------------------------------------|
//! | `operations.csv`     | completed operation                           |
//! | `legs.csv`           | completed vehicle itinerary leg               |
//! | `vehicle_tracks.csv` | vehicle, every snapshot interval              |
//!
//! Writers implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `apron_sim::SimObserver`.
//! Every row carries a `run` counter that increments on each restart or
//! variant switch, so one set of files can hold several runs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use apron_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, sim.variant());
//! sim.run(1.0 / 60.0, u64::MAX, &mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{LegRow, OperationRow, TrackRow};
pub use writer::OutputWriter;
