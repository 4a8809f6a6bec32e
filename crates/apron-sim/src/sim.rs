//! The `Simulation` struct and its tick loop.

use tracing::{debug, info};

use apron_core::{ClockConfig, OpId, SimClock, SimConfig, SpeedMultiplier};
use apron_mobility::{Fleet, LegEvent, NoPathPolicy, StepContext};
use apron_schedule::{Scheduler, Variant};
use apron_spatial::{GridPlanner, Planner};

use crate::{Control, Itineraries, NoopObserver, OperationView, SimError, SimObserver, SimResult, VehicleView};

// ── TickReport ────────────────────────────────────────────────────────────────

/// What one call to [`Simulation::tick`] did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Processed-tick counter; gated ticks do not advance it.
    pub tick: u64,
    /// Simulated time at the end of the tick.
    pub now: f64,
    /// Simulated seconds applied; zero on a gated tick.
    pub dt: f64,
    /// Kinematics were skipped and legs completed on departure.
    pub fast_forward: bool,
    /// Operations completed this tick, in table order.
    pub completed: Vec<OpId>,
    /// Legs completed this tick, in fleet order.
    pub legs: Vec<LegEvent>,
}

impl TickReport {
    /// `true` when the tick was gated off by pause or completion.
    pub fn is_idle(&self) -> bool {
        self.dt == 0.0
    }
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// The turnaround simulation: a scheduler and a fleet sharing one clock.
///
/// `Simulation<P>` drives the tick loop:
///
/// 1. **Gate**: nothing happens while paused or once every operation has
///    completed.
/// 2. **Clock**: the wall-clock delta is scaled by the speed multiplier.
///    When the multiplier leaves fewer than
///    `config.clock.min_updates_per_sim_sec` updates per simulated second,
///    the tick runs in fast-forward mode.
/// 3. **Schedule**: [`Scheduler::advance`].
/// 4. **Fleet**: every vehicle in spawn order.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation<P: Planner = GridPlanner> {
    pub(crate) config: SimConfig,
    pub(crate) clock: SimClock,
    pub(crate) scheduler: Scheduler,
    pub(crate) fleet: Fleet<P>,
    pub(crate) itineraries: Itineraries,
    /// Call `on_snapshot` every this many processed ticks; 0 disables.
    pub(crate) snapshot_interval: u64,
    pub(crate) ticks: u64,
}

impl<P: Planner> Simulation<P> {
    // ── Ticking ───────────────────────────────────────────────────────────

    /// Advance by one frame of `wall_dt` real seconds.
    pub fn tick(&mut self, wall_dt: f64) -> SimResult<TickReport> {
        self.tick_with(wall_dt, &mut NoopObserver)
    }

    /// [`tick`](Self::tick) with observer callbacks.
    pub fn tick_with<O: SimObserver>(&mut self, wall_dt: f64, observer: &mut O) -> SimResult<TickReport> {
        if self.clock.paused || self.scheduler.is_finished() || wall_dt <= 0.0 {
            return Ok(TickReport { tick: self.ticks, now: self.clock.now, ..TickReport::default() });
        }

        observer.on_tick_start(self.ticks, self.clock.now);

        let fast_forward = self
            .clock
            .multiplier
            .exceeds_safe(wall_dt, self.config.clock.min_updates_per_sim_sec);
        let dt = self.clock.advance(wall_dt);
        let now = self.clock.now;

        let completed = self.scheduler.advance(dt, now);
        for &id in &completed {
            observer.on_operation_completed(self.scheduler.get(id));
        }

        let ctx = StepContext { ops: &self.scheduler, config: &self.config, dt, now, fast_forward };
        let legs = self.fleet.update(&ctx)?;
        for event in &legs {
            if let Some(vehicle) = self.fleet.get(event.vehicle) {
                observer.on_leg_completed(event, vehicle);
            }
        }

        self.ticks += 1;
        if self.snapshot_interval > 0 && self.ticks.is_multiple_of(self.snapshot_interval) {
            observer.on_snapshot(self.ticks, now, self.fleet.vehicles());
        }
        if self.scheduler.is_finished() {
            info!(t = now, ticks = self.ticks, "turnaround finished");
        }

        let report = TickReport { tick: self.ticks, now, dt, fast_forward, completed, legs };
        observer.on_tick_end(&report);
        Ok(report)
    }

    /// Tick with a fixed `wall_dt` until finished, paused, or `max_ticks`
    /// processed ticks.  Returns the number of ticks processed.
    pub fn run<O: SimObserver>(&mut self, wall_dt: f64, max_ticks: u64, observer: &mut O) -> SimResult<u64> {
        let mut processed = 0;
        while processed < max_ticks && !self.is_finished() && !self.clock.paused {
            let report = self.tick_with(wall_dt, observer)?;
            if report.is_idle() {
                break;
            }
            processed += 1;
        }
        observer.on_sim_end(self.clock.now);
        Ok(processed)
    }

    // ── Controls ──────────────────────────────────────────────────────────

    /// Apply one operator control.
    pub fn apply(&mut self, control: Control) -> SimResult<()> {
        self.apply_with(control, &mut NoopObserver)
    }

    /// [`apply`](Self::apply) with observer callbacks for resets.
    pub fn apply_with<O: SimObserver>(&mut self, control: Control, observer: &mut O) -> SimResult<()> {
        match control {
            Control::TogglePause => {
                self.clock.paused = !self.clock.paused;
                debug!(paused = self.clock.paused, "pause toggled");
            }
            Control::SpeedUp => {
                self.clock.multiplier = self.clock.multiplier.step_up(self.config.clock.max_multiplier);
                debug!(multiplier = %self.clock.multiplier, "speed changed");
            }
            Control::SlowDown => {
                self.clock.multiplier = self.clock.multiplier.step_down();
                debug!(multiplier = %self.clock.multiplier, "speed changed");
            }
            Control::AdjustDelay { op, minutes } => {
                if op.index() >= self.scheduler.len() {
                    return Err(SimError::UnknownOperation(op));
                }
                self.scheduler.adjust_delay(op, minutes);
            }
            Control::ResetDelays => self.scheduler.reset_delays(),
            Control::Restart => self.restart(self.scheduler.variant(), observer)?,
            Control::ToggleVariant => self.restart(self.scheduler.variant().toggled(), observer)?,
        }
        Ok(())
    }

    /// Rebuild operation and vehicle state for `variant`.  The speed
    /// multiplier survives; pause is cleared.
    fn restart<O: SimObserver>(&mut self, variant: Variant, observer: &mut O) -> SimResult<()> {
        self.scheduler.reset(variant)?;
        self.fleet.spawn(self.itineraries.get(variant), &self.scheduler)?;
        self.clock.now = clock_origin(&self.scheduler, &self.config.clock);
        self.clock.paused = false;
        self.ticks = 0;
        info!(%variant, origin = self.clock.now, vehicles = self.fleet.len(), "simulation reset");
        observer.on_reset(variant, self.clock.now);
        Ok(())
    }

    // ── Read surface ──────────────────────────────────────────────────────

    pub fn operations(&self) -> Vec<OperationView> {
        OperationView::collect(&self.scheduler)
    }

    pub fn vehicles(&self) -> Vec<VehicleView> {
        self.fleet.vehicles().iter().map(VehicleView::from).collect()
    }

    /// Simulated seconds; negative before the origin operation completes.
    pub fn now(&self) -> f64 {
        self.clock.now
    }

    pub fn is_finished(&self) -> bool {
        self.scheduler.is_finished()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.paused
    }

    pub fn multiplier(&self) -> SpeedMultiplier {
        self.clock.multiplier
    }

    pub fn variant(&self) -> Variant {
        self.scheduler.variant()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn fleet(&self) -> &Fleet<P> {
        &self.fleet
    }

    /// Processed ticks since the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn set_no_path_policy(&mut self, policy: NoPathPolicy) {
        self.fleet.set_policy(policy);
    }
}

/// Clock reading at the start of a run: minus the origin operation's
/// duration, or zero when there is none.
pub(crate) fn clock_origin(scheduler: &Scheduler, cfg: &ClockConfig) -> f64 {
    cfg.origin_operation
        .as_deref()
        .and_then(|name| scheduler.lookup(name))
        .map_or(0.0, |id| -scheduler.get(id).duration())
}
