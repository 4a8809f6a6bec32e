//! Immutable simulation configuration.
//!
//! One `SimConfig` is built at startup (from `Default`, or deserialised from
//! JSON with the `serde` feature) and passed by reference to every component
//! that needs a tuning constant.  Nothing in the workspace reads ambient
//! global state.

use crate::{CoreError, CoreResult};

/// Mapping between continuous apron coordinates and grid cells.
///
/// ```text
/// row = floor(y / cell_size) + row_offset
/// col = floor(x / cell_size) + col_offset
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FrameConfig {
    /// Continuous units per grid cell.
    pub cell_size: f32,
    /// Grid rows above `y = 0`.
    pub row_offset: i32,
    /// Grid columns left of `x = 0`.
    pub col_offset: i32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { cell_size: 10.0, row_offset: 20, col_offset: 0 }
    }
}

/// Kinematic tuning shared by all vehicles.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Continuous units travelled per metre (speeds are in m/s).
    pub distance_scale: f32,
    /// Heading error beyond which a vehicle backs up instead of turning.
    pub reverse_threshold_deg: f32,
    /// Degrees per second of turn rate per degree of heading error.
    pub steering_gain: f32,
    /// Absolute turn-rate limit, degrees per second.
    pub max_turn_rate: f32,
    /// Limit on the change of turn rate, degrees per second squared.
    pub max_turn_accel: f32,
    /// Speed (m/s) at which steering reaches full responsiveness.
    pub full_steering_speed: f32,
    /// Distance to the final waypoint at which braking begins.
    pub braking_distance: f32,
    /// Braking target speed (m/s) right at the final waypoint.
    pub brake_floor: f32,
    /// Default distance of a gate line before its waypoint.
    pub gate_lead: f32,
    /// Gate lead per remaining waypoint inside a straightened approach.
    pub approach_gate_step: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            distance_scale:        25.0,
            reverse_threshold_deg: 160.0,
            steering_gain:         10.0,
            max_turn_rate:         30.0,
            max_turn_accel:        120.0,
            full_steering_speed:   3.0,
            braking_distance:      200.0,
            brake_floor:           0.1,
            gate_lead:             80.0,
            approach_gate_step:    7.0,
        }
    }
}

/// One cone of the inter-vehicle stopping heuristic.
///
/// A vehicle stops when another moving vehicle lies within `range` and the
/// relative bearing from this vehicle is within `half_angle_deg`.  If
/// `mutual` is set, the bearing from the other vehicle back to this one must
/// also lie within its own forward cone.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopCone {
    pub range: f32,
    pub half_angle_deg: f32,
    pub mutual: bool,
}

/// Inter-vehicle interaction tuning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrafficConfig {
    /// No vehicle starts a leg while another en-route vehicle is this close.
    pub exclusion_radius: f32,
    /// Seconds a stop decision is held before being re-evaluated.
    pub stop_hold_secs: f64,
    /// A vehicle stops when any cone matches.
    pub cones: Vec<StopCone>,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            exclusion_radius: 250.0,
            stop_hold_secs:   0.5,
            cones: vec![
                StopCone { range: 200.0, half_angle_deg: 60.0, mutual: true },
                StopCone { range: 300.0, half_angle_deg: 25.0, mutual: false },
                StopCone { range: 400.0, half_angle_deg: 30.0, mutual: true },
            ],
        }
    }
}

/// Clock and operator-control tuning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClockConfig {
    /// The clock starts at minus this operation's duration.  `None` starts at 0.
    pub origin_operation: Option<String>,
    /// Below this many updates per simulated second, vehicles skip ahead.
    pub min_updates_per_sim_sec: f64,
    /// Upper bound of the speed multiplier (a power of two).
    pub max_multiplier: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            origin_operation:        Some("Parking".to_owned()),
            min_updates_per_sim_sec: 2.0,
            max_multiplier:          1024,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    pub frame:   FrameConfig,
    pub motion:  MotionConfig,
    pub traffic: TrafficConfig,
    pub clock:   ClockConfig,
}

impl SimConfig {
    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        let bad = |msg: String| Err(CoreError::Config(msg));

        if !(self.frame.cell_size.is_finite() && self.frame.cell_size > 0.0) {
            return bad(format!("frame.cell_size must be positive, got {}", self.frame.cell_size));
        }
        if !(self.motion.distance_scale > 0.0) {
            return bad(format!("motion.distance_scale must be positive, got {}", self.motion.distance_scale));
        }
        if !(self.motion.max_turn_rate > 0.0) {
            return bad(format!("motion.max_turn_rate must be positive, got {}", self.motion.max_turn_rate));
        }
        if self.traffic.exclusion_radius < 0.0 || self.traffic.stop_hold_secs < 0.0 {
            return bad("traffic distances and hold times must not be negative".into());
        }
        if let Some(cone) = self.traffic.cones.iter().find(|c| !(0.0..=180.0).contains(&c.half_angle_deg)) {
            return bad(format!("stop cone half angle {} outside 0..=180", cone.half_angle_deg));
        }
        if !self.clock.max_multiplier.is_power_of_two() {
            return bad(format!("clock.max_multiplier must be a power of two, got {}", self.clock.max_multiplier));
        }
        if self.clock.min_updates_per_sim_sec < 0.0 {
            return bad("clock.min_updates_per_sim_sec must not be negative".into());
        }
        Ok(())
    }
}
