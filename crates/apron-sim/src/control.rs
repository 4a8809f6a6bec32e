//! Operator controls.

use apron_core::OpId;

/// One operator action, applied between ticks with
/// [`Simulation::apply`][crate::Simulation::apply].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Control {
    TogglePause,
    /// Double the speed multiplier, up to the configured maximum.
    SpeedUp,
    /// Halve the speed multiplier, down to 1.
    SlowDown,
    /// Add `minutes` (usually ±1 or ±10) to one operation's delay.
    AdjustDelay { op: OpId, minutes: i32 },
    /// Zero every operation delay.
    ResetDelays,
    /// Start the current variant over, keeping delays.
    Restart,
    /// Switch between the manual and automated variants and start over.
    ToggleVariant,
}
