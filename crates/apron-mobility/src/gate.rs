//! Operation gates and waypoint arrival gates.

use apron_core::{OpId, Point};
use apron_schedule::Scheduler;

use crate::{MobilityError, MobilityResult};

// ── OperationStatus ───────────────────────────────────────────────────────────

/// Read-only view of operation state used to gate vehicle legs.
pub trait OperationStatus {
    fn lookup(&self, name: &str) -> Option<OpId>;
    fn is_ready(&self, id: OpId) -> bool;
    fn is_completed(&self, id: OpId) -> bool;
}

impl OperationStatus for Scheduler {
    fn lookup(&self, name: &str) -> Option<OpId> {
        Scheduler::lookup(self, name)
    }

    fn is_ready(&self, id: OpId) -> bool {
        Scheduler::is_ready(self, id)
    }

    fn is_completed(&self, id: OpId) -> bool {
        Scheduler::is_completed(self, id)
    }
}

// ── Gate ──────────────────────────────────────────────────────────────────────

/// An optional operation a leg waits on.  `Open` is always satisfied.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Gate {
    #[default]
    Open,
    Op(OpId),
}

impl Gate {
    /// Resolve an optional operation name.
    pub fn resolve<S: OperationStatus>(name: Option<&str>, ops: &S) -> MobilityResult<Self> {
        match name {
            None => Ok(Gate::Open),
            Some(n) => ops
                .lookup(n)
                .map(Gate::Op)
                .ok_or_else(|| MobilityError::UnknownOperation(n.to_owned())),
        }
    }

    /// Start-gate test: the operation's dependencies are all complete.
    pub fn is_ready<S: OperationStatus>(&self, ops: &S) -> bool {
        match self {
            Gate::Open => true,
            Gate::Op(id) => ops.is_ready(*id),
        }
    }

    /// End-gate test: the operation itself is complete.
    pub fn is_completed<S: OperationStatus>(&self, ops: &S) -> bool {
        match self {
            Gate::Open => true,
            Gate::Op(id) => ops.is_completed(*id),
        }
    }
}

// ── ArrivalGate ───────────────────────────────────────────────────────────────

/// A trigger line perpendicular to the approach to a waypoint.
///
/// Placed `lead` units before the waypoint along the segment from where the
/// vehicle stood when the gate was erected.  The vehicle has passed the
/// waypoint once it is on or past the line, which stays robust when a large
/// time step carries it beyond the waypoint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArrivalGate {
    pub center: Point,
    /// Unit direction of approach; zero for a degenerate segment.
    pub direction: Point,
}

impl ArrivalGate {
    pub fn new(from: Point, waypoint: Point, lead: f32) -> Self {
        let direction = (waypoint - from).normalized();
        Self { center: waypoint - direction * lead, direction }
    }

    #[inline]
    pub fn is_crossed(&self, position: Point) -> bool {
        (position - self.center).dot(self.direction) >= 0.0
    }
}
