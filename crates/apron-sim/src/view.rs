//! Read-only snapshots for a renderer or UI.

use apron_core::{OpId, Point, VehicleId};
use apron_mobility::{Pose, Vehicle, VehicleState};
use apron_schedule::Scheduler;

/// One operation as a UI would draw it.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationView {
    pub id: OpId,
    pub name: String,
    pub completed: bool,
    /// Operator delay, minutes.
    pub delay_minutes: i32,
    pub is_ready: bool,
    pub start_time: Option<f64>,
    pub completion_time: Option<f64>,
    /// Fraction of the nominal duration elapsed, `0.0..=1.0`.
    pub progress: f64,
    pub locations: Vec<Point>,
}

impl OperationView {
    pub(crate) fn collect(scheduler: &Scheduler) -> Vec<Self> {
        scheduler
            .ids()
            .map(|id| {
                let op = scheduler.get(id);
                Self {
                    id,
                    name: op.name().to_owned(),
                    completed: op.is_completed(),
                    delay_minutes: op.delay_minutes(),
                    is_ready: scheduler.is_ready(id),
                    start_time: op.start_time(),
                    completion_time: op.completion_time(),
                    progress: op.progress(),
                    locations: op.locations().to_vec(),
                }
            })
            .collect()
    }
}

/// One vehicle as a UI would draw it.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleView {
    pub id: VehicleId,
    pub name: String,
    pub state: VehicleState,
    pub position: Point,
    pub heading: f32,
    /// Remaining waypoints of the active path, next one first.
    pub waypoints: Vec<Point>,
    pub stopped: bool,
    pub trailers: Vec<Pose>,
}

impl From<&Vehicle> for VehicleView {
    fn from(v: &Vehicle) -> Self {
        Self {
            id: v.id(),
            name: v.name().to_owned(),
            state: v.state(),
            position: v.motion().position,
            heading: v.motion().heading,
            waypoints: v.path().to_vec(),
            stopped: v.is_stopped(),
            trailers: v.trailers().iter().map(|t| t.pose()).collect(),
        }
    }
}
