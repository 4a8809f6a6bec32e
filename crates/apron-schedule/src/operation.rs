//! Operation definitions and live operation state.
//!
//! An [`OperationDef`] is one row of a declarative operation table: names
//! only, no resolved references.  [`crate::graph::resolve`] turns a list of
//! definitions into [`Operation`]s whose dependencies are [`OpId`]s into the
//! same ordered list.

use std::fmt;
use std::str::FromStr;

use apron_core::{OpId, Point};

use crate::ScheduleError;

// ── Variant ───────────────────────────────────────────────────────────────────

/// Which declarative operation table drives the simulation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variant {
    /// Conventional, manually driven ground handling.
    #[default]
    Manual,
    /// Ground handling with automated service vehicles.
    Automated,
}

impl Variant {
    /// The other variant.
    pub fn toggled(self) -> Self {
        match self {
            Variant::Manual => Variant::Automated,
            Variant::Automated => Variant::Manual,
        }
    }
}

impl FromStr for Variant {
    type Err = ScheduleError;

    /// Accepts `manual`/`old` and `automated`/`auto`/`new`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" | "old" => Ok(Variant::Manual),
            "automated" | "auto" | "new" => Ok(Variant::Automated),
            _ => Err(ScheduleError::UnknownVariant(s.to_owned())),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variant::Manual => "manual",
            Variant::Automated => "automated",
        })
    }
}

// ── OperationDef ──────────────────────────────────────────────────────────────

/// One unresolved row of an operation table.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationDef {
    pub name: String,
    /// Nominal duration in simulated seconds.
    pub duration: f64,
    /// Names of operations that must complete first.
    pub deps: Vec<String>,
    /// Up to two marker positions for visualisation.
    pub locations: Vec<Point>,
    /// Initial operator delay in whole minutes.
    pub delay_minutes: i32,
}

impl OperationDef {
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
            deps: Vec::new(),
            locations: Vec::new(),
            delay_minutes: 0,
        }
    }

    /// Add dependencies by name.
    pub fn after(mut self, deps: &[&str]) -> Self {
        self.deps.extend(deps.iter().map(|d| (*d).to_owned()));
        self
    }

    pub fn at(mut self, location: Point) -> Self {
        self.locations.push(location);
        self
    }

    pub fn with_delay(mut self, minutes: i32) -> Self {
        self.delay_minutes = minutes;
        self
    }
}

// ── Operation ─────────────────────────────────────────────────────────────────

/// Live state of one scheduled operation.
///
/// Owned by the [`Scheduler`](crate::Scheduler); everything outside this crate
/// sees it through shared references.  The only external mutation channel is
/// the delay, via `Scheduler::adjust_delay`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operation {
    pub(crate) name: String,
    pub(crate) duration: f64,
    pub(crate) deps: Vec<OpId>,
    pub(crate) locations: Vec<Point>,
    pub(crate) delay_minutes: i32,
    pub(crate) time_left: f64,
    pub(crate) start_time: Option<f64>,
    pub(crate) completion_time: Option<f64>,
    pub(crate) completed: bool,
}

impl Operation {
    pub(crate) fn new(def: &OperationDef, deps: Vec<OpId>) -> Self {
        Self {
            name: def.name.clone(),
            duration: def.duration,
            deps,
            locations: def.locations.clone(),
            delay_minutes: def.delay_minutes,
            time_left: def.duration,
            start_time: None,
            completion_time: None,
            completed: false,
        }
    }

    /// Back to "not started"; the delay is kept.
    pub(crate) fn reset(&mut self) {
        self.time_left = self.duration;
        self.start_time = None;
        self.completion_time = None;
        self.completed = false;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nominal duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn deps(&self) -> &[OpId] {
        &self.deps
    }

    pub fn locations(&self) -> &[Point] {
        &self.locations
    }

    pub fn delay_minutes(&self) -> i32 {
        self.delay_minutes
    }

    /// Delay in seconds as it enters the completion test.
    pub fn delay_secs(&self) -> f64 {
        self.delay_minutes as f64 * 60.0
    }

    pub fn time_left(&self) -> f64 {
        self.time_left
    }

    /// Simulated time at which the operation first became ready.
    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    pub fn completion_time(&self) -> Option<f64> {
        self.completion_time
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Fraction of the delayed duration already elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.completed {
            return 1.0;
        }
        let total = self.duration + self.delay_secs();
        if total <= 0.0 {
            return 0.0;
        }
        ((self.duration - self.time_left) / total).clamp(0.0, 1.0)
    }
}
