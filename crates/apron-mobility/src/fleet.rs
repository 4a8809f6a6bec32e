//! The fleet: every vehicle plus the shared planner and grids.

use std::collections::HashMap;

use apron_core::{Point, SimConfig, VehicleId};
use apron_spatial::{GridMap, GridPlanner, Planner};

use crate::gate::OperationStatus;
use crate::itinerary::{Archetype, VehicleSpec};
use crate::traffic::Traffic;
use crate::vehicle::Vehicle;
use crate::{MobilityError, MobilityResult};

/// What a vehicle does when the planner finds no path for its next leg.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum NoPathPolicy {
    /// Abort the tick with [`MobilityError::Planning`].
    #[default]
    Fatal,
    /// Stay idle, log a warning, and plan again next tick.
    HoldAndRetry,
}

/// Per-tick inputs shared by every vehicle.
pub struct StepContext<'a, S: OperationStatus> {
    pub ops: &'a S,
    pub config: &'a SimConfig,
    /// Simulated seconds in this tick.
    pub dt: f64,
    /// Simulated time at the end of the tick.
    pub now: f64,
    /// Skip kinematics and complete legs on departure.
    pub fast_forward: bool,
}

/// A leg completion reported by [`Fleet::update`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LegEvent {
    pub vehicle: VehicleId,
    /// Zero-based index of the completed leg.
    pub leg: usize,
    /// `true` if that was the final leg.
    pub departed: bool,
    pub position: Point,
    pub time: f64,
}

/// Borrowed planning environment handed to each vehicle.
pub(crate) struct Environment<'a, P> {
    pub(crate) planner: &'a P,
    pub(crate) grids: &'a HashMap<String, GridMap>,
    pub(crate) policy: NoPathPolicy,
}

/// Owns the vehicles and everything they plan with.
///
/// Vehicles are updated in spawn order; that order is part of the
/// simulation's determinism.
pub struct Fleet<P: Planner = GridPlanner> {
    planner: P,
    grids: HashMap<String, GridMap>,
    archetypes: HashMap<String, Archetype>,
    policy: NoPathPolicy,
    vehicles: Vec<Vehicle>,
}

impl<P: Planner> Fleet<P> {
    /// Check that every archetype's grids exist.
    pub fn new(
        planner: P,
        grids: HashMap<String, GridMap>,
        archetypes: Vec<Archetype>,
        policy: NoPathPolicy,
    ) -> MobilityResult<Self> {
        for a in &archetypes {
            for grid in [&a.outbound_grid, &a.return_grid] {
                if !grids.contains_key(grid) {
                    return Err(MobilityError::UnknownGrid(grid.clone()));
                }
            }
        }
        let archetypes = archetypes.into_iter().map(|a| (a.name.clone(), a)).collect();
        Ok(Self { planner, grids, archetypes, policy, vehicles: Vec::new() })
    }

    /// Replace every vehicle with fresh ones built from `specs`.
    ///
    /// On error the current vehicles are left untouched.
    pub fn spawn<S: OperationStatus>(&mut self, specs: &[VehicleSpec], ops: &S) -> MobilityResult<()> {
        let mut vehicles = Vec::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            let archetype = self
                .archetypes
                .get(&spec.archetype)
                .ok_or_else(|| MobilityError::UnknownArchetype(spec.archetype.clone()))?;
            let id = VehicleId::try_from(i).map_err(|_| MobilityError::Parse("too many vehicles".into()))?;
            vehicles.push(Vehicle::new(id, spec, archetype, ops)?);
        }
        self.vehicles = vehicles;
        Ok(())
    }

    /// Advance every vehicle by one tick, in fleet order.
    ///
    /// Each vehicle sees the ones before it as already updated this tick.
    pub fn update<S: OperationStatus>(&mut self, ctx: &StepContext<'_, S>) -> MobilityResult<Vec<LegEvent>> {
        let env = Environment { planner: &self.planner, grids: &self.grids, policy: self.policy };
        let mut events = Vec::new();

        for i in 0..self.vehicles.len() {
            let (before, rest) = self.vehicles.split_at_mut(i);
            let Some((vehicle, after)) = rest.split_first_mut() else {
                break;
            };
            if let Some(event) = vehicle.update(ctx, &env, Traffic::new(before, after))? {
                events.push(event);
            }
        }
        Ok(events)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// `true` once every vehicle has consumed its whole itinerary.
    pub fn all_departed(&self) -> bool {
        self.vehicles.iter().all(Vehicle::is_departed)
    }

    pub fn policy(&self) -> NoPathPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: NoPathPolicy) {
        self.policy = policy;
    }

    pub fn grid(&self, name: &str) -> Option<&GridMap> {
        self.grids.get(name)
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }
}
