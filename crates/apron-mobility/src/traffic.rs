//! Other vehicles as seen by the one being updated.
//!
//! Vehicles update in fleet order, so a [`Traffic`] view holds the already
//! updated vehicles before the current one and the not yet updated ones
//! after it.  The split comes from `split_at_mut` in the fleet loop.

use apron_core::{Point, StopCone, TrafficConfig, angle_between};

use crate::kinematics::Motion;
use crate::vehicle::Vehicle;

#[derive(Copy, Clone)]
pub struct Traffic<'a> {
    before: &'a [Vehicle],
    after: &'a [Vehicle],
}

impl<'a> Traffic<'a> {
    pub fn new(before: &'a [Vehicle], after: &'a [Vehicle]) -> Self {
        Self { before, after }
    }

    pub fn empty() -> Self {
        Self { before: &[], after: &[] }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Vehicle> + use<'a> {
        self.before.iter().chain(self.after.iter())
    }

    /// `true` if any en-route vehicle is within `radius` of `at`.
    pub fn is_crowded(&self, at: Point, radius: f32) -> bool {
        self.iter().any(|v| v.is_en_route() && v.motion().position.distance(at) < radius)
    }

    /// Stop heuristic: does a moving vehicle or trailer sit in one of our
    /// forward cones?
    ///
    /// Vehicles that are themselves stopped are ignored, so of two vehicles
    /// facing each other the one updated second keeps going.
    pub fn should_stop(&self, me: &Motion, cfg: &TrafficConfig) -> bool {
        let my_travel = me.travel_heading();
        self.iter()
            .filter(|v| v.is_en_route() && !v.is_stopped())
            .any(|other| {
                let tow = other.motion();
                let reversing = tow.speed < 0.0;
                let body = std::iter::once((tow.position, tow.travel_heading()));
                let trailers = other.trailers().iter().filter(|t| t.is_attached()).map(move |t| {
                    let h = if reversing { t.heading + 180.0 } else { t.heading };
                    (t.position, h)
                });
                body.chain(trailers).any(|(pos, travel)| {
                    cfg.cones.iter().any(|cone| in_cone(me.position, my_travel, pos, travel, cone))
                })
            })
    }
}

fn in_cone(me: Point, my_travel: f32, other: Point, other_travel: f32, cone: &StopCone) -> bool {
    if me.distance(other) >= cone.range {
        return false;
    }
    let ahead_of_me = angle_between(my_travel, me.bearing_to(other)).abs() <= cone.half_angle_deg;
    if !cone.mutual {
        return ahead_of_me;
    }
    ahead_of_me && angle_between(other_travel, other.bearing_to(me)).abs() <= cone.half_angle_deg
}
