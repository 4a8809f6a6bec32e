//! The vehicle itinerary state machine.
//!
//! One [`Vehicle::update`] call per tick:
//!
//! 1. Trailer choreography: running detach/reattach moves advance, and
//!    pending drops or recalls fire when their operations allow.
//! 2. `Arrived` counts its dwell timer down and falls through to `Idle`
//!    once it expires.
//! 3. `Idle` departs on the current leg when its gates are open, no other
//!    en-route vehicle is within the exclusion radius and every trailer is
//!    attached.  A trailer due to be dropped at this stop holds the vehicle
//!    until its release operation is ready.
//! 4. `EnRoute` runs one kinematic step and tests the arrival gate.
//!
//! While the speed multiplier is too high for meaningful motion, legs
//! complete on departure with a forced snap instead of being driven.

use tracing::{debug, info, warn};

use apron_core::{Point, SimConfig, VehicleId};
use apron_spatial::{Path, PathRequest, Planner, SpatialError};

use crate::fleet::{Environment, LegEvent, NoPathPolicy, StepContext};
use crate::gate::{ArrivalGate, Gate, OperationStatus};
use crate::itinerary::{Archetype, LegKind, LegSpec, VehicleSpec};
use crate::kinematics::{Motion, Pose, braking_target, gate_lead};
use crate::traffic::Traffic;
use crate::trailer::Trailer;
use crate::{MobilityError, MobilityResult};

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum VehicleState {
    /// No active path; waiting for gates, traffic or trailers.
    Idle,
    /// Following a path.
    EnRoute,
    /// Leg finished; dwelling before the next one.
    Arrived { wait_left: f64 },
    /// Every leg consumed.
    Departed,
}

/// A leg with its gates resolved against the live scheduler.
#[derive(Clone, Debug)]
struct Leg {
    spec: LegSpec,
    start_gate: Gate,
    end_gate: Gate,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DropStage {
    Pending,
    Out,
    Done,
}

#[derive(Clone, Debug)]
struct TrailerDrop {
    after_leg: usize,
    release: Gate,
    recall: Gate,
    target: Pose,
    duration: f64,
    stage: DropStage,
}

// ── Vehicle ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Vehicle {
    id: VehicleId,
    name: String,
    archetype: Archetype,
    legs: Vec<Leg>,
    cursor: usize,
    state: VehicleState,
    motion: Motion,
    path: Path,
    gate: Option<ArrivalGate>,
    /// Seconds left on the current stop decision.
    stop_hold: f64,
    trailers: Vec<Trailer>,
    drops: Vec<Option<TrailerDrop>>,
}

impl Vehicle {
    /// Build a vehicle at its starting pose, resolving every gate name.
    pub fn new<S: OperationStatus>(
        id: VehicleId,
        spec: &VehicleSpec,
        archetype: &Archetype,
        ops: &S,
    ) -> MobilityResult<Self> {
        if spec.legs.is_empty() {
            return Err(MobilityError::EmptyItinerary(spec.name.clone()));
        }

        let legs = spec
            .legs
            .iter()
            .map(|leg| {
                Ok(Leg {
                    spec: leg.clone(),
                    start_gate: Gate::resolve(leg.start_gate.as_deref(), ops)?,
                    end_gate: Gate::resolve(leg.end_gate.as_deref(), ops)?,
                })
            })
            .collect::<MobilityResult<Vec<Leg>>>()?;

        let start = Pose::new(spec.start, spec.start_heading);
        let mut trailers: Vec<Trailer> = Vec::with_capacity(archetype.trailers.len());
        let mut drops = Vec::with_capacity(archetype.trailers.len());
        for trailer_spec in &archetype.trailers {
            let tow = trailers.last().map_or(start, Trailer::pose);
            trailers.push(Trailer::behind(id, trailer_spec, tow));
            let plan = match &trailer_spec.drop {
                None => None,
                Some(d) => Some(TrailerDrop {
                    after_leg: d.after_leg,
                    release: Gate::resolve(Some(&d.release), ops)?,
                    recall: Gate::resolve(Some(&d.recall), ops)?,
                    target: Pose::new(d.target, d.target_heading),
                    duration: d.duration,
                    stage: DropStage::Pending,
                }),
            };
            drops.push(plan);
        }

        Ok(Self {
            id,
            name: spec.name.clone(),
            archetype: archetype.clone(),
            legs,
            cursor: 0,
            state: VehicleState::Idle,
            motion: Motion::at(start),
            path: Path::default(),
            gate: None,
            stop_hold: 0.0,
            trailers,
            drops,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn archetype(&self) -> &Archetype {
        &self.archetype
    }

    pub fn state(&self) -> VehicleState {
        self.state
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn arrival_gate(&self) -> Option<&ArrivalGate> {
        self.gate.as_ref()
    }

    pub fn trailers(&self) -> &[Trailer] {
        &self.trailers
    }

    /// Number of legs already completed.
    pub fn legs_completed(&self) -> usize {
        self.cursor
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// The leg being driven or waited on; `None` once departed.
    pub fn current_leg(&self) -> Option<&LegSpec> {
        self.legs.get(self.cursor).map(|l| &l.spec)
    }

    #[inline]
    pub fn is_en_route(&self) -> bool {
        matches!(self.state, VehicleState::EnRoute)
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stop_hold > 0.0
    }

    #[inline]
    pub fn is_departed(&self) -> bool {
        matches!(self.state, VehicleState::Departed)
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    pub(crate) fn update<S: OperationStatus, P: Planner>(
        &mut self,
        ctx: &StepContext<'_, S>,
        env: &Environment<'_, P>,
        traffic: Traffic<'_>,
    ) -> MobilityResult<Option<LegEvent>> {
        self.step_trailers(ctx.ops, ctx.dt);

        match self.state {
            VehicleState::Departed => return Ok(None),
            VehicleState::Arrived { wait_left } => {
                let left = wait_left - ctx.dt;
                if left > 0.0 {
                    self.state = VehicleState::Arrived { wait_left: left };
                    return Ok(None);
                }
                self.state = VehicleState::Idle;
            }
            VehicleState::Idle | VehicleState::EnRoute => {}
        }

        match self.state {
            VehicleState::Idle => self.try_depart(ctx, env, traffic),
            VehicleState::EnRoute => Ok(self.drive(ctx, traffic)),
            _ => Ok(None),
        }
    }

    fn try_depart<S: OperationStatus, P: Planner>(
        &mut self,
        ctx: &StepContext<'_, S>,
        env: &Environment<'_, P>,
        traffic: Traffic<'_>,
    ) -> MobilityResult<Option<LegEvent>> {
        let Some(leg) = self.legs.get(self.cursor) else {
            return Ok(None);
        };
        if !leg.start_gate.is_ready(ctx.ops) || !leg.end_gate.is_completed(ctx.ops) {
            return Ok(None);
        }
        if traffic.is_crowded(self.motion.position, ctx.config.traffic.exclusion_radius) {
            return Ok(None);
        }
        if !self.trailers.iter().all(Trailer::is_attached) || self.awaiting_drop() {
            return Ok(None);
        }
        let (kind, goal, goal_heading, reverse) = (leg.spec.kind, leg.spec.goal, leg.spec.heading, leg.spec.reverse);
        if ctx.fast_forward {
            return Ok(Some(self.complete_leg(true, ctx.now)));
        }

        let grid_name = match kind {
            LegKind::Outbound => &self.archetype.outbound_grid,
            LegKind::Return => &self.archetype.return_grid,
        };
        let grid = env
            .grids
            .get(grid_name)
            .ok_or_else(|| MobilityError::UnknownGrid(grid_name.clone()))?;

        let request = PathRequest {
            start: self.motion.position,
            start_heading: Some(self.motion.heading),
            goal,
            goal_heading,
            straighten: self.archetype.straighten,
            reverse,
        };

        match env.planner.plan(grid, &request) {
            Ok(path) if path.is_empty() => Ok(Some(self.complete_leg(true, ctx.now))),
            Ok(path) => {
                self.path = path;
                self.state = VehicleState::EnRoute;
                self.erect_gate(ctx.config);
                info!(
                    vehicle = %self.name,
                    leg = self.cursor,
                    waypoints = self.path.len(),
                    t = ctx.now,
                    "leg started"
                );
                Ok(None)
            }
            Err(SpatialError::SameCell(_)) => Ok(Some(self.complete_leg(true, ctx.now))),
            // Only an unreachable goal may be retried; bad input is always fatal.
            Err(source @ SpatialError::NoPath { .. }) if env.policy == NoPathPolicy::HoldAndRetry => {
                warn!(vehicle = %self.name, leg = self.cursor, error = %source, "no path; holding");
                Ok(None)
            }
            Err(source) => Err(MobilityError::Planning { vehicle: self.name.clone(), source }),
        }
    }

    /// One kinematic step along the active path.
    fn drive<S: OperationStatus>(&mut self, ctx: &StepContext<'_, S>, traffic: Traffic<'_>) -> Option<LegEvent> {
        let snap = self.legs.get(self.cursor).is_some_and(|l| l.spec.snap);
        if ctx.fast_forward {
            return Some(self.complete_leg(true, ctx.now));
        }
        let Some(target) = self.path.next() else {
            return Some(self.complete_leg(snap, ctx.now));
        };

        let cfg = ctx.config;
        let dt = ctx.dt as f32;

        if self.stop_hold > 0.0 {
            self.stop_hold -= ctx.dt;
        } else if traffic.should_stop(&self.motion, &cfg.traffic) {
            self.stop_hold = cfg.traffic.stop_hold_secs;
            debug!(vehicle = %self.name, position = %self.motion.position, "yielding");
        }

        let reversing = self.motion.steer(target, self.path.is_reversing(), self.archetype.agile, &cfg.motion, dt);

        let cap = if reversing { self.archetype.max_speed / 2.0 } else { self.archetype.max_speed };
        let remaining = self
            .path
            .destination()
            .map_or(0.0, |d| self.motion.position.distance(d));
        let mut target_speed = braking_target(cap, remaining, &cfg.motion);
        if reversing {
            target_speed = -target_speed;
        }
        if self.is_stopped() {
            target_speed = 0.0;
        }
        self.motion.drive(target_speed, self.archetype.acceleration, self.archetype.braking, dt);
        self.motion.integrate(cfg.motion.distance_scale, dt);
        self.follow_trailers(cfg.motion.distance_scale, dt);

        let crossed = self.gate.is_some_and(|g| g.is_crossed(self.motion.position));
        if !crossed {
            return None;
        }
        if self.path.len() > 1 {
            self.path.advance();
            self.erect_gate(cfg);
            None
        } else {
            Some(self.complete_leg(snap, ctx.now))
        }
    }

    fn erect_gate(&mut self, cfg: &SimConfig) {
        self.gate = self.path.next().map(|waypoint| {
            let lead = gate_lead(self.path.len(), self.path.in_approach(), self.archetype.gate_lead, &cfg.motion);
            debug!(vehicle = %self.name, %waypoint, lead, "arrival gate");
            ArrivalGate::new(self.motion.position, waypoint, lead)
        });
    }

    /// Finish the current leg, optionally snapping onto the declared goal.
    fn complete_leg(&mut self, snap: bool, now: f64) -> LegEvent {
        let index = self.cursor;
        let (goal, heading, wait) = match self.legs.get(index) {
            Some(leg) => (leg.spec.goal, leg.spec.heading, leg.spec.wait),
            None => (self.motion.position, None, 0.0),
        };

        if snap {
            let pose = Pose::new(goal, heading.unwrap_or(self.motion.heading));
            self.motion.snap_to(pose);
            self.realign_trailers();
        } else {
            self.motion.speed = 0.0;
            self.motion.turn_rate = 0.0;
        }
        self.path = Path::default();
        self.gate = None;
        self.stop_hold = 0.0;

        self.cursor += 1;
        let departed = self.cursor >= self.legs.len();
        self.state = if departed {
            VehicleState::Departed
        } else {
            VehicleState::Arrived { wait_left: wait }
        };
        info!(vehicle = %self.name, leg = index, departed, t = now, "leg completed");

        LegEvent { vehicle: self.id, leg: index, departed, position: self.motion.position, time: now }
    }

    // ── Trailers ──────────────────────────────────────────────────────────

    fn follow_trailers(&mut self, distance_scale: f32, dt: f32) {
        let speed = self.motion.speed;
        let mut tow = self.motion.pose();
        for trailer in self.trailers.iter_mut().filter(|t| t.is_attached()) {
            trailer.follow(tow, speed, distance_scale, dt);
            tow = trailer.pose();
        }
    }

    fn realign_trailers(&mut self) {
        let mut tow = self.motion.pose();
        for trailer in self.trailers.iter_mut().filter(|t| t.is_attached()) {
            trailer.realign(tow);
            tow = trailer.pose();
        }
    }

    /// Advance detach/reattach moves and fire drops whose operations allow.
    /// A trailer is due to be dropped at this stop but its release has not come yet.
    fn awaiting_drop(&self) -> bool {
        self.drops
            .iter()
            .flatten()
            .any(|plan| plan.stage == DropStage::Pending && self.cursor == plan.after_leg + 1)
    }

    fn step_trailers<S: OperationStatus>(&mut self, ops: &S, dt: f64) {
        // Drops happen only while parked at the stop that ends the drop leg.
        let parked = matches!(self.state, VehicleState::Idle | VehicleState::Arrived { .. });
        let mut tow = self.motion.pose();

        for (trailer, plan) in self.trailers.iter_mut().zip(self.drops.iter_mut()) {
            trailer.step_transition(dt);

            if let Some(plan) = plan {
                match plan.stage {
                    DropStage::Pending
                        if parked
                            && self.cursor == plan.after_leg + 1
                            && trailer.is_attached()
                            && plan.release.is_ready(ops) =>
                    {
                        trailer.detach(plan.target, plan.duration);
                        plan.stage = DropStage::Out;
                        info!(vehicle = %self.name, target = %plan.target.position, "trailer released");
                    }
                    DropStage::Out if trailer.is_detached() && plan.recall.is_completed(ops) => {
                        trailer.reattach(tow, plan.duration);
                        plan.stage = DropStage::Done;
                        info!(vehicle = %self.name, "trailer recalled");
                    }
                    _ => {}
                }
            }

            if trailer.is_attached() {
                tow = trailer.pose();
            }
        }
    }

    /// Positions of the vehicle body and every trailer.
    pub fn footprint(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.motion.position).chain(self.trailers.iter().map(|t| t.position))
    }
}
