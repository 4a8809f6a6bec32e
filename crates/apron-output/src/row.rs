//! Plain data row types written by output backends.

use apron_schedule::Variant;

/// One completed operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRow {
    pub run:             u32,
    pub variant:         Variant,
    pub name:            String,
    pub start_time:      f64,
    pub completion_time: f64,
    pub delay_minutes:   i32,
}

/// One finished itinerary leg.
#[derive(Debug, Clone, PartialEq)]
pub struct LegRow {
    pub run:      u32,
    pub vehicle:  String,
    pub leg:      usize,
    pub time:     f64,
    pub x:        f32,
    pub y:        f32,
    /// The leg was the vehicle's last.
    pub departed: bool,
}

/// A vehicle's kinematic state at a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRow {
    pub run:     u32,
    pub tick:    u64,
    pub time:    f64,
    pub vehicle: String,
    pub x:       f32,
    pub y:       f32,
    pub heading: f32,
    /// Metres per second; negative while reversing.
    pub speed:   f32,
    pub state:   &'static str,
    pub stopped: bool,
}
