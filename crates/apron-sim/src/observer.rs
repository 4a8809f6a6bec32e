//! Simulation observer trait for progress reporting and data collection.

use apron_mobility::{LegEvent, Vehicle};
use apron_schedule::{Operation, Variant};

use crate::TickReport;

/// Callbacks invoked by [`Simulation`][crate::Simulation] at key points in
/// the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: completion printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl SimObserver for Printer {
///     fn on_operation_completed(&mut self, op: &Operation) {
///         println!("{} done at {:?}", op.name(), op.completion_time());
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before the clock advances on a tick that is not gated off.
    fn on_tick_start(&mut self, _tick: u64, _now: f64) {}

    /// Called at the end of every processed tick.
    fn on_tick_end(&mut self, _report: &TickReport) {}

    /// Called once per operation, in table order, on the tick it completes.
    fn on_operation_completed(&mut self, _op: &Operation) {}

    /// Called for every finished itinerary leg, in fleet order.
    fn on_leg_completed(&mut self, _event: &LegEvent, _vehicle: &Vehicle) {}

    /// Called every `snapshot_interval` processed ticks with the whole fleet.
    fn on_snapshot(&mut self, _tick: u64, _now: f64, _vehicles: &[Vehicle]) {}

    /// Called after a restart or variant switch; `origin` is the new clock
    /// reading.
    fn on_reset(&mut self, _variant: Variant, _origin: f64) {}

    /// Called once when [`Simulation::run`][crate::Simulation::run] returns.
    fn on_sim_end(&mut self, _now: f64) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
