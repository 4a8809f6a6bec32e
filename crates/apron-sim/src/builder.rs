//! Fluent builder for constructing a [`Simulation`].

use std::collections::HashMap;

use apron_core::{SimClock, SimConfig};
use apron_mobility::{Archetype, Fleet, NoPathPolicy, VehicleSpec};
use apron_schedule::{OperationTables, Scheduler, Variant};
use apron_spatial::{GridMap, Planner};

use crate::sim::clock_origin;
use crate::{SimResult, Simulation};

/// Vehicle itineraries for each variant.  A variant without an entry runs
/// with no vehicles.
#[derive(Clone, Debug, Default)]
pub struct Itineraries {
    pub manual: Vec<VehicleSpec>,
    pub automated: Vec<VehicleSpec>,
}

impl Itineraries {
    pub fn get(&self, variant: Variant) -> &[VehicleSpec] {
        match variant {
            Variant::Manual => &self.manual,
            Variant::Automated => &self.automated,
        }
    }

    fn slot_mut(&mut self, variant: Variant) -> &mut Vec<VehicleSpec> {
        match variant {
            Variant::Manual => &mut self.manual,
            Variant::Automated => &mut self.automated,
        }
    }
}

/// Fluent builder for [`Simulation<P>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: motion, traffic and clock constants
/// - [`OperationTables`]: at least the table of the starting variant
/// - `P: Planner`: usually [`apron_spatial::GridPlanner`]
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default               |
/// |-------------------------|-----------------------|
/// | `.variant(v)`           | `Variant::Manual`     |
/// | `.grid(name, g)`        | no grids              |
/// | `.archetype(a)`         | no archetypes         |
/// | `.fleet(v, specs)`      | no vehicles           |
/// | `.no_path_policy(p)`    | `NoPathPolicy::Fatal` |
/// | `.snapshot_interval(n)` | `10`                  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, tables, GridPlanner::new(road))
///     .variant(Variant::Automated)
///     .grid("apron", grid)
///     .archetype(Archetype::new("tug", "apron"))
///     .fleet(Variant::Automated, specs)
///     .build()?;
/// ```
pub struct SimBuilder<P: Planner> {
    config:            SimConfig,
    tables:            OperationTables,
    planner:           P,
    variant:           Variant,
    grids:             HashMap<String, GridMap>,
    archetypes:        Vec<Archetype>,
    itineraries:       Itineraries,
    policy:            NoPathPolicy,
    snapshot_interval: u64,
}

impl<P: Planner> SimBuilder<P> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, tables: OperationTables, planner: P) -> Self {
        Self {
            config,
            tables,
            planner,
            variant:           Variant::default(),
            grids:             HashMap::new(),
            archetypes:        Vec::new(),
            itineraries:       Itineraries::default(),
            policy:            NoPathPolicy::default(),
            snapshot_interval: 10,
        }
    }

    /// Variant to start on.
    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Register an occupancy grid under `name` for archetypes to refer to.
    pub fn grid(mut self, name: impl Into<String>, grid: GridMap) -> Self {
        self.grids.insert(name.into(), grid);
        self
    }

    pub fn archetype(mut self, archetype: Archetype) -> Self {
        self.archetypes.push(archetype);
        self
    }

    /// Vehicles spawned whenever `variant` starts.  Replaces any earlier list.
    pub fn fleet(mut self, variant: Variant, specs: Vec<VehicleSpec>) -> Self {
        *self.itineraries.slot_mut(variant) = specs;
        self
    }

    pub fn no_path_policy(mut self, policy: NoPathPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Snapshot observers every `n` processed ticks; `0` disables snapshots.
    pub fn snapshot_interval(mut self, n: u64) -> Self {
        self.snapshot_interval = n;
        self
    }

    /// Validate every table and itinerary, then return a ready-to-run
    /// [`Simulation`].
    ///
    /// Each variant with a table is checked against its own fleet, so a
    /// later variant switch cannot fail on an unknown gate name.
    pub fn build(self) -> SimResult<Simulation<P>> {
        self.config.validate()?;
        let mut fleet = Fleet::new(self.planner, self.grids, self.archetypes, self.policy)?;

        for variant in [Variant::Manual, Variant::Automated] {
            if variant == self.variant || self.tables.get(variant).is_err() {
                continue;
            }
            let probe = Scheduler::new(self.tables.clone(), variant)?;
            fleet.spawn(self.itineraries.get(variant), &probe)?;
        }

        let scheduler = Scheduler::new(self.tables, self.variant)?;
        fleet.spawn(self.itineraries.get(self.variant), &scheduler)?;
        let clock = SimClock::new(clock_origin(&scheduler, &self.config.clock));

        Ok(Simulation {
            config: self.config,
            clock,
            scheduler,
            fleet,
            itineraries: self.itineraries,
            snapshot_interval: self.snapshot_interval,
            ticks: 0,
        })
    }
}
