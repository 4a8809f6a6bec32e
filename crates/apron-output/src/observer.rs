//! `SimOutputObserver<W>` bridges `SimObserver` to an `OutputWriter`.

use apron_mobility::{LegEvent, Vehicle, VehicleState};
use apron_schedule::{Operation, Variant};
use apron_sim::SimObserver;

use crate::row::{LegRow, OperationRow, TrackRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that records completions, legs and snapshots to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    run:        u32,
    variant:    Variant,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`; `variant` labels the first run.
    pub fn new(writer: W, variant: Variant) -> Self {
        Self { writer, run: 0, variant, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Current run counter.
    pub fn run(&self) -> u32 {
        self.run
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

fn state_label(state: VehicleState) -> &'static str {
    match state {
        VehicleState::Idle => "idle",
        VehicleState::EnRoute => "en_route",
        VehicleState::Arrived { .. } => "arrived",
        VehicleState::Departed => "departed",
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_operation_completed(&mut self, op: &Operation) {
        let Some(completion_time) = op.completion_time() else {
            return;
        };
        let row = OperationRow {
            run: self.run,
            variant: self.variant,
            name: op.name().to_owned(),
            start_time: op.start_time().unwrap_or(completion_time),
            completion_time,
            delay_minutes: op.delay_minutes(),
        };
        let result = self.writer.write_operation(&row);
        self.store_err(result);
    }

    fn on_leg_completed(&mut self, event: &LegEvent, vehicle: &Vehicle) {
        let row = LegRow {
            run:      self.run,
            vehicle:  vehicle.name().to_owned(),
            leg:      event.leg,
            time:     event.time,
            x:        event.position.x,
            y:        event.position.y,
            departed: event.departed,
        };
        let result = self.writer.write_leg(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: u64, now: f64, vehicles: &[Vehicle]) {
        let rows: Vec<TrackRow> = vehicles
            .iter()
            .map(|v| {
                let m = v.motion();
                TrackRow {
                    run:     self.run,
                    tick,
                    time:    now,
                    vehicle: v.name().to_owned(),
                    x:       m.position.x,
                    y:       m.position.y,
                    heading: m.heading,
                    speed:   m.speed,
                    state:   state_label(v.state()),
                    stopped: v.is_stopped(),
                }
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_tracks(&rows);
            self.store_err(result);
        }
    }

    fn on_reset(&mut self, variant: Variant, _origin: f64) {
        self.run += 1;
        self.variant = variant;
    }

    fn on_sim_end(&mut self, _now: f64) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
