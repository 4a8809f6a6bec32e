//! Simulation time model.
//!
//! # Design
//!
//! Simulated time is a continuous `f64` count of seconds.  It is driven
//! externally: each frame the caller hands in a wall-clock delta, which is
//! scaled by the operator-controlled [`SpeedMultiplier`]:
//!
//!   sim_dt = wall_dt * multiplier
//!
//! The clock may start at a negative time so that a lead-in phase (the
//! aircraft taxiing onto the stand) finishes exactly at `t = 0`.

use std::fmt;

// ── SpeedMultiplier ───────────────────────────────────────────────────────────

/// Operator speed-up factor, always a power of two within `1..=max`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedMultiplier(u32);

impl SpeedMultiplier {
    pub const ONE: SpeedMultiplier = SpeedMultiplier(1);

    /// Largest power of two `<= value`, clamped to `1..=max`.
    pub fn new(value: u32, max: u32) -> Self {
        let clamped = value.clamp(1, max.max(1));
        SpeedMultiplier(1 << (31 - clamped.leading_zeros()))
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Double the multiplier unless that would exceed `max`.
    pub fn step_up(self, max: u32) -> Self {
        match self.0.checked_mul(2) {
            Some(next) if next <= max => SpeedMultiplier(next),
            _ => self,
        }
    }

    /// Halve the multiplier, never going below 1.
    pub fn step_down(self) -> Self {
        SpeedMultiplier((self.0 / 2).max(1))
    }

    /// `true` when the multiplier is too high for the frame rate to give at
    /// least `min_updates` kinematic updates per simulated second.
    ///
    /// With `fps = 1 / wall_dt` frames per real second and `m` simulated
    /// seconds per real second, each simulated second gets `fps / m` updates.
    pub fn exceeds_safe(self, wall_dt: f64, min_updates: f64) -> bool {
        if wall_dt <= 0.0 || min_updates <= 0.0 {
            return false;
        }
        let fps = 1.0 / wall_dt;
        self.0 as f64 > fps / min_updates
    }
}

impl Default for SpeedMultiplier {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for SpeedMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Simulated clock plus the operator's pause and speed controls.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds; negative during the lead-in phase.
    pub now: f64,
    /// Current speed-up factor.
    pub multiplier: SpeedMultiplier,
    /// When paused, [`SimClock::advance`] is a no-op.
    pub paused: bool,
}

impl SimClock {
    /// A running clock at `origin` with multiplier 1.
    pub fn new(origin: f64) -> Self {
        Self { now: origin, multiplier: SpeedMultiplier::ONE, paused: false }
    }

    /// Advance by one frame of `wall_dt` real seconds.
    ///
    /// Returns the simulated delta that was applied (zero while paused).
    pub fn advance(&mut self, wall_dt: f64) -> f64 {
        if self.paused || wall_dt <= 0.0 {
            return 0.0;
        }
        let dt = wall_dt * self.multiplier.get() as f64;
        self.now += dt;
        dt
    }

    /// Split `now` into signed `(minutes, seconds)` for display.
    pub fn minutes_seconds(&self) -> (i64, u32) {
        let total = self.now.trunc() as i64;
        let minutes = total / 60;
        let seconds = (total % 60).unsigned_abs() as u32;
        (minutes, seconds)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (m, s) = self.minutes_seconds();
        let sign = if self.now < 0.0 && m == 0 { "-" } else { "" };
        write!(f, "{sign}{m:02}:{s:02} @ {}", self.multiplier)
    }
}
