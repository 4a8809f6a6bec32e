//! Towed trailers.
//!
//! # Chain geometry
//!
//! Each trailer trails its tow point (the vehicle, or the previous attached
//! trailer) through a double link: half the link length back along the
//! tow's heading, then half back along the trailer's own heading.
//!
//! ```text
//!   tow ●──── link/2 ────┼──── link/2 ────● trailer
//!        (tow heading)        (trailer heading)
//! ```
//!
//! The trailer heading lags the tow heading by a fraction
//! `clamp(responsiveness · |speed| · dt, 0, 1)` of the difference per tick.
//!
//! # Detach / reattach
//!
//! A detaching trailer leaves the chain and moves linearly from its current
//! pose to a parking pose over a fixed duration; reattaching does the same
//! back to its slot behind the tow point.  While not attached it ignores
//! the chain update.

use apron_core::{Point, VehicleId, lerp_angle};

use crate::itinerary::TrailerSpec;
use crate::kinematics::Pose;

/// A time-boxed linear move between two poses.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transition {
    pub from: Pose,
    pub to: Pose,
    pub elapsed: f64,
    pub duration: f64,
}

impl Transition {
    pub fn new(from: Pose, to: Pose, duration: f64) -> Self {
        Self { from, to, elapsed: 0.0, duration }
    }

    /// Advance by `dt`; returns the interpolated pose and whether the move is done.
    pub fn step(&mut self, dt: f64) -> (Pose, bool) {
        self.elapsed += dt;
        let t = if self.duration <= 0.0 { 1.0 } else { (self.elapsed / self.duration).min(1.0) };
        let pose = Pose::new(
            self.from.position.lerp(self.to.position, t as f32),
            lerp_angle(self.from.heading, self.to.heading, t as f32),
        );
        (pose, t >= 1.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TrailerMode {
    Attached,
    Detaching(Transition),
    Detached,
    Reattaching(Transition),
}

/// One trailer owned by a vehicle.
#[derive(Clone, Debug)]
pub struct Trailer {
    /// The towing vehicle; lookup only.
    pub tow: VehicleId,
    pub link: f32,
    pub responsiveness: f32,
    pub position: Point,
    pub heading: f32,
    pub prev_heading: f32,
    /// Accumulated deviation from a rigid follow; diagnostic only.
    pub slip: f32,
    pub mode: TrailerMode,
}

impl Trailer {
    /// A trailer aligned straight behind `tow_pose`.
    pub fn behind(tow: VehicleId, spec: &TrailerSpec, tow_pose: Pose) -> Self {
        let slot = slot_behind(tow_pose, spec.link);
        Self {
            tow,
            link: spec.link,
            responsiveness: spec.responsiveness,
            position: slot.position,
            heading: slot.heading,
            prev_heading: slot.heading,
            slip: 0.0,
            mode: TrailerMode::Attached,
        }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.heading)
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        matches!(self.mode, TrailerMode::Attached)
    }

    #[inline]
    pub fn is_detached(&self) -> bool {
        matches!(self.mode, TrailerMode::Detached)
    }

    /// One chain update behind `tow`, which moved at `speed` m/s for `dt`.
    pub fn follow(&mut self, tow: Pose, speed: f32, distance_scale: f32, dt: f32) {
        self.prev_heading = self.heading;
        let lag = (self.responsiveness * speed.abs() * dt).clamp(0.0, 1.0);
        self.heading = lerp_angle(self.heading, tow.heading, lag);

        let half = self.link / 2.0;
        let placed = tow.position
            - Point::from_heading(tow.heading) * half
            - Point::from_heading(self.heading) * half;

        let travel = speed * distance_scale * dt;
        let naive = self.position + Point::from_heading(self.prev_heading) * travel;
        self.slip += placed.distance(naive);
        self.position = placed;
    }

    /// Snap straight behind `tow`.
    pub fn realign(&mut self, tow: Pose) {
        let slot = slot_behind(tow, self.link);
        self.position = slot.position;
        self.heading = slot.heading;
        self.prev_heading = slot.heading;
    }

    /// Start moving to the parking pose.
    pub fn detach(&mut self, target: Pose, duration: f64) {
        self.mode = TrailerMode::Detaching(Transition::new(self.pose(), target, duration));
    }

    /// Start moving back to the slot behind `tow`.
    pub fn reattach(&mut self, tow: Pose, duration: f64) {
        let slot = slot_behind(tow, self.link);
        self.mode = TrailerMode::Reattaching(Transition::new(self.pose(), slot, duration));
    }

    /// Advance a running transition.  Returns `true` when one finished.
    pub fn step_transition(&mut self, dt: f64) -> bool {
        let (transition, next_mode) = match &mut self.mode {
            TrailerMode::Detaching(t) => (t, TrailerMode::Detached),
            TrailerMode::Reattaching(t) => (t, TrailerMode::Attached),
            TrailerMode::Attached | TrailerMode::Detached => return false,
        };
        let (pose, done) = transition.step(dt);
        self.position = pose.position;
        self.heading = pose.heading;
        if done {
            self.prev_heading = self.heading;
            self.mode = next_mode;
        }
        done
    }
}

fn slot_behind(tow: Pose, link: f32) -> Pose {
    Pose::new(tow.position - Point::from_heading(tow.heading) * link, tow.heading)
}
