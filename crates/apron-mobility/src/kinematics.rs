//! Vehicle kinematics: steering, speed control and Euler integration.
//!
//! Speeds are metres per second; positions are apron units.  One metre is
//! `MotionConfig::distance_scale` units.  Headings are degrees, `0` along
//! `+x`, `90` along `+y`.

use apron_core::{MotionConfig, Point, angle_between, normalize_angle};

/// Position plus heading.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Pose {
    pub position: Point,
    pub heading: f32,
}

impl Pose {
    pub fn new(position: Point, heading: f32) -> Self {
        Self { position, heading }
    }
}

/// Kinematic state of one vehicle.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Motion {
    pub position: Point,
    pub heading: f32,
    /// Signed speed; negative while backing up.
    pub speed: f32,
    /// Turn rate applied on the previous tick, degrees per second.
    pub turn_rate: f32,
}

impl Motion {
    pub fn at(pose: Pose) -> Self {
        Self { position: pose.position, heading: pose.heading, speed: 0.0, turn_rate: 0.0 }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.heading)
    }

    /// Direction of travel: the heading, flipped while reversing.
    pub fn travel_heading(&self) -> f32 {
        if self.speed < 0.0 {
            normalize_angle(self.heading + 180.0)
        } else {
            self.heading
        }
    }

    /// Stop dead on `pose`.
    pub fn snap_to(&mut self, pose: Pose) {
        self.position = pose.position;
        self.heading = pose.heading;
        self.speed = 0.0;
        self.turn_rate = 0.0;
    }

    /// Turn towards `target` and report whether the vehicle should back up.
    ///
    /// Backing up is chosen when `force_reverse` is set or when the target
    /// lies more than `reverse_threshold_deg` off the nose.  The steering
    /// error is then measured against the tail.  The commanded rate is
    /// scaled by speed (unless `agile`), clamped to `max_turn_rate`, limited
    /// in its change per tick, and never turns past the target bearing.
    pub fn steer(&mut self, target: Point, force_reverse: bool, agile: bool, cfg: &MotionConfig, dt: f32) -> bool {
        let bearing = self.position.bearing_to(target);
        let mut error = angle_between(self.heading, bearing);
        let reversing = force_reverse || error.abs() > cfg.reverse_threshold_deg;
        if reversing {
            error = angle_between(normalize_angle(self.heading + 180.0), bearing);
        }

        let factor = if agile {
            1.0
        } else {
            (self.speed.abs() / cfg.full_steering_speed).min(1.0).powi(2)
        };
        let desired = (cfg.steering_gain * error * factor).clamp(-cfg.max_turn_rate, cfg.max_turn_rate);
        let max_change = cfg.max_turn_accel * dt;
        self.turn_rate += (desired - self.turn_rate).clamp(-max_change, max_change);

        let mut step = self.turn_rate * dt;
        if step.abs() > error.abs() {
            step = error;
            self.turn_rate = if dt > 0.0 { step / dt } else { 0.0 };
        }
        self.heading = normalize_angle(self.heading + step);
        reversing
    }

    /// Move `speed` towards `target` using `acceleration` when gaining speed
    /// in the current direction and `braking` otherwise.
    pub fn drive(&mut self, target: f32, acceleration: f32, braking: f32, dt: f32) {
        let gaining = self.speed * target >= 0.0 && target.abs() > self.speed.abs();
        let rate = if gaining { acceleration } else { braking };
        let max_step = rate * dt;
        self.speed += (target - self.speed).clamp(-max_step, max_step);
    }

    /// Forward-Euler position update; returns the distance moved in apron units.
    pub fn integrate(&mut self, distance_scale: f32, dt: f32) -> f32 {
        let travel = self.speed * distance_scale * dt;
        self.position = self.position + Point::from_heading(self.heading) * travel;
        travel.abs()
    }
}

/// Braking-curve speed at `distance` from the final waypoint.
///
/// Linear from `brake_floor` at the waypoint up to `max_speed` at
/// `braking_distance`; `max_speed` beyond.
pub fn braking_target(max_speed: f32, distance: f32, cfg: &MotionConfig) -> f32 {
    if distance >= cfg.braking_distance {
        return max_speed;
    }
    let slope = (max_speed - cfg.brake_floor) / cfg.braking_distance;
    (slope * distance + cfg.brake_floor).min(max_speed)
}

/// Arrival gate lead for the waypoint at the front of a path.
///
/// * the final waypoint gets no lead, so the gate sits on the goal;
/// * inside a straightened approach the lead shrinks with the remaining
///   waypoint count;
/// * elsewhere the archetype's lead, or the configured default.
pub fn gate_lead(remaining: usize, in_approach: bool, archetype_lead: Option<f32>, cfg: &MotionConfig) -> f32 {
    if remaining <= 1 {
        0.0
    } else if in_approach {
        (cfg.approach_gate_step * remaining as f32).min(cfg.gate_lead)
    } else {
        archetype_lead.unwrap_or(cfg.gate_lead)
    }
}
