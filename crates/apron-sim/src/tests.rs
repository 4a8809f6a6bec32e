//! Integration tests for apron-sim.

use apron_core::{Point, SimConfig};
use apron_mobility::{Archetype, LegEvent, LegSpec, Vehicle, VehicleSpec};
use apron_schedule::{Operation, OperationDef, OperationTables, Variant};
use apron_spatial::{GridFrame, GridMap, GridPlanner};

use crate::{Control, SimBuilder, SimError, SimObserver, Simulation, TickReport};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Default constants with the clock starting at zero.
fn test_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.clock.origin_operation = None;
    config
}

fn manual_table() -> Vec<OperationDef> {
    vec![
        OperationDef::new("A", 60.0).at(Point::new(100.0, 100.0)),
        OperationDef::new("B", 30.0).after(&["A"]),
    ]
}

fn automated_table() -> Vec<OperationDef> {
    vec![
        OperationDef::new("A", 20.0),
        OperationDef::new("C", 10.0).after(&["A"]),
        OperationDef::new("D", 10.0).after(&["C"]),
    ]
}

fn tables() -> OperationTables {
    OperationTables { manual: Some(manual_table()), automated: Some(automated_table()) }
}

fn grid() -> GridMap {
    GridMap::open(50, 50, GridFrame { cell_size: 10.0, row_offset: 0, col_offset: 0 }).unwrap()
}

fn builder(config: SimConfig) -> SimBuilder<GridPlanner> {
    SimBuilder::new(config, tables(), GridPlanner::default())
        .grid("apron", grid())
        .archetype(Archetype::new("truck", "apron").with_straighten(0.0))
}

fn truck_to(name: &str, goal: Point, gate: &str) -> VehicleSpec {
    VehicleSpec::new(name, "truck", Point::new(50.0, 50.0), 0.0).leg(LegSpec::to(goal).when_ready(gate))
}

fn simple() -> Simulation {
    builder(test_config()).build().unwrap()
}

#[derive(Default)]
struct Recorder {
    starts: usize,
    ends: usize,
    completed: Vec<String>,
    legs: Vec<(String, usize)>,
    snapshots: usize,
    resets: Vec<(Variant, f64)>,
    ended: bool,
}

impl SimObserver for Recorder {
    fn on_tick_start(&mut self, _tick: u64, _now: f64) {
        self.starts += 1;
    }
    fn on_tick_end(&mut self, _report: &TickReport) {
        self.ends += 1;
    }
    fn on_operation_completed(&mut self, op: &Operation) {
        self.completed.push(op.name().to_owned());
    }
    fn on_leg_completed(&mut self, event: &LegEvent, vehicle: &Vehicle) {
        self.legs.push((vehicle.name().to_owned(), event.leg));
    }
    fn on_snapshot(&mut self, _tick: u64, _now: f64, _vehicles: &[Vehicle]) {
        self.snapshots += 1;
    }
    fn on_reset(&mut self, variant: Variant, origin: f64) {
        self.resets.push((variant, origin));
    }
    fn on_sim_end(&mut self, _now: f64) {
        self.ended = true;
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let sim = simple();
        assert_eq!(sim.variant(), Variant::Manual);
        assert_eq!(sim.now(), 0.0);
        assert_eq!(sim.operations().len(), 2);
        assert!(sim.vehicles().is_empty());
        assert!(!sim.is_finished());
    }

    #[test]
    fn clock_starts_before_origin_operation() {
        let table = vec![
            OperationDef::new("Parking", 300.0),
            OperationDef::new("Boarding", 600.0).after(&["Parking"]),
        ];
        let sim = SimBuilder::new(
            SimConfig::default(),
            OperationTables::single(Variant::Manual, table),
            GridPlanner::default(),
        )
        .build()
        .unwrap();
        assert_eq!(sim.now(), -300.0);
    }

    #[test]
    fn invalid_config_errors() {
        let mut config = test_config();
        config.frame.cell_size = -1.0;
        let result = SimBuilder::new(
            config,
            OperationTables::single(Variant::Manual, manual_table()),
            GridPlanner::default(),
        )
        .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn missing_start_table_errors() {
        let result = SimBuilder::new(
            test_config(),
            OperationTables::single(Variant::Manual, manual_table()),
            GridPlanner::default(),
        )
        .variant(Variant::Automated)
        .build();
        assert!(matches!(result, Err(SimError::Schedule(_))));
    }

    #[test]
    fn other_variant_fleet_is_validated() {
        // `B` exists only in the manual table.
        let result = builder(test_config())
            .fleet(Variant::Automated, vec![truck_to("t", Point::new(300.0, 50.0), "B")])
            .build();
        assert!(matches!(result, Err(SimError::Mobility(_))));
    }

    #[test]
    fn unknown_grid_errors() {
        let result = builder(test_config()).archetype(Archetype::new("bus", "nowhere")).build();
        assert!(matches!(result, Err(SimError::Mobility(_))));
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tick_tests {
    use super::*;

    #[test]
    fn a_then_b_scenario() {
        let mut sim = simple();

        let first = sim.tick(60.0).unwrap();
        assert_eq!(first.now, 60.0);
        assert_eq!(first.completed.len(), 1);
        let ops = sim.operations();
        assert!(ops[0].completed);
        assert_eq!(ops[1].start_time, Some(60.0));
        assert!(ops[1].is_ready);
        assert!(!sim.is_finished());

        sim.tick(30.0).unwrap();
        assert!(sim.operations()[1].completed);
        assert!(sim.is_finished());
    }

    #[test]
    fn finished_simulation_ignores_ticks() {
        let mut sim = simple();
        sim.tick(100.0).unwrap();
        sim.tick(100.0).unwrap();
        assert!(sim.is_finished());
        let now = sim.now();

        let report = sim.tick(10.0).unwrap();
        assert!(report.is_idle());
        assert_eq!(sim.now(), now);
    }

    #[test]
    fn paused_simulation_ignores_ticks() {
        let mut sim = simple();
        sim.apply(Control::TogglePause).unwrap();
        assert!(sim.is_paused());
        for _ in 0..10 {
            assert!(sim.tick(1.0).unwrap().is_idle());
        }
        assert_eq!(sim.now(), 0.0);
        assert_eq!(sim.ticks(), 0);

        sim.apply(Control::TogglePause).unwrap();
        sim.tick(1.0).unwrap();
        assert_eq!(sim.now(), 1.0);
    }

    #[test]
    fn multiplier_scales_time() {
        let mut sim = simple();
        sim.apply(Control::SpeedUp).unwrap();
        sim.apply(Control::SpeedUp).unwrap();
        assert_eq!(sim.multiplier().get(), 4);
        let report = sim.tick(0.5).unwrap();
        assert_eq!(report.dt, 2.0);
        assert_eq!(sim.now(), 2.0);
    }

    #[test]
    fn speed_bounds() {
        let mut config = test_config();
        config.clock.max_multiplier = 8;
        let mut sim = builder(config).build().unwrap();
        for _ in 0..10 {
            sim.apply(Control::SpeedUp).unwrap();
        }
        assert_eq!(sim.multiplier().get(), 8);
        for _ in 0..10 {
            sim.apply(Control::SlowDown).unwrap();
        }
        assert_eq!(sim.multiplier().get(), 1);
    }

    #[test]
    fn fast_forward_follows_frame_rate() {
        let mut sim = simple();
        assert!(!sim.tick(1.0 / 60.0).unwrap().fast_forward);
        for _ in 0..6 {
            sim.apply(Control::SpeedUp).unwrap();
        }
        assert_eq!(sim.multiplier().get(), 64);
        assert!(sim.tick(1.0 / 60.0).unwrap().fast_forward);
    }

    #[test]
    fn vehicle_waits_for_schedule() {
        let goal = Point::new(300.0, 50.0);
        let mut sim = builder(test_config())
            .fleet(Variant::Manual, vec![truck_to("t", goal, "B")])
            .build()
            .unwrap();

        // Large steps run in fast-forward: legs finish on departure.
        let report = sim.tick(30.0).unwrap();
        assert!(report.fast_forward);
        assert!(report.legs.is_empty());
        assert_eq!(sim.vehicles()[0].position, Point::new(50.0, 50.0));

        let report = sim.tick(30.0).unwrap();
        assert_eq!(report.legs.len(), 1);
        assert_eq!(report.legs[0].time, 60.0);
        assert_eq!(sim.vehicles()[0].position, goal);
    }

    #[test]
    fn vehicle_drives_in_real_time() {
        let goal = Point::new(300.0, 50.0);
        let mut sim = builder(test_config())
            .fleet(Variant::Manual, vec![truck_to("t", goal, "A")])
            .build()
            .unwrap();

        sim.tick(0.05).unwrap();
        let view = &sim.vehicles()[0];
        assert!(!view.waypoints.is_empty());
        assert_eq!(view.waypoints.last(), Some(&goal));

        sim.run(0.05, 600, &mut Recorder::default()).unwrap();
        let view = &sim.vehicles()[0];
        assert_eq!(view.position, goal);
        assert!(view.waypoints.is_empty());
    }
}

// ── Controls ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod control_tests {
    use super::*;
    use apron_core::OpId;

    #[test]
    fn delay_shows_in_read_surface() {
        let mut sim = simple();
        let b = sim.scheduler().id_of("B").unwrap();
        sim.apply(Control::AdjustDelay { op: b, minutes: 10 }).unwrap();
        sim.apply(Control::AdjustDelay { op: b, minutes: -1 }).unwrap();
        assert_eq!(sim.operations()[1].delay_minutes, 9);

        sim.apply(Control::ResetDelays).unwrap();
        assert_eq!(sim.operations()[1].delay_minutes, 0);
    }

    #[test]
    fn unknown_operation_rejected() {
        let mut sim = simple();
        let err = sim.apply(Control::AdjustDelay { op: OpId(99), minutes: 1 }).unwrap_err();
        assert!(matches!(err, SimError::UnknownOperation(OpId(99))));
    }

    #[test]
    fn restart_keeps_delays_and_clears_progress() {
        let mut sim = simple();
        let a = sim.scheduler().id_of("A").unwrap();
        sim.apply(Control::AdjustDelay { op: a, minutes: 1 }).unwrap();
        sim.apply(Control::SpeedUp).unwrap();
        sim.tick(200.0).unwrap();
        assert!(sim.operations()[0].completed);

        sim.apply(Control::TogglePause).unwrap();
        sim.apply(Control::Restart).unwrap();
        assert_eq!(sim.now(), 0.0);
        assert_eq!(sim.ticks(), 0);
        assert!(!sim.is_paused());
        assert_eq!(sim.multiplier().get(), 2);
        let ops = sim.operations();
        assert!(!ops[0].completed);
        assert_eq!(ops[0].start_time, None);
        assert_eq!(ops[0].delay_minutes, 1);
    }

    #[test]
    fn toggle_variant_swaps_tables_and_fleets() {
        let mut sim = builder(test_config())
            .fleet(Variant::Manual, vec![truck_to("m", Point::new(300.0, 50.0), "B")])
            .fleet(
                Variant::Automated,
                vec![
                    truck_to("x", Point::new(300.0, 50.0), "C"),
                    truck_to("y", Point::new(300.0, 300.0), "D"),
                ],
            )
            .build()
            .unwrap();
        assert_eq!(sim.vehicles().len(), 1);

        let mut rec = Recorder::default();
        sim.apply_with(Control::ToggleVariant, &mut rec).unwrap();
        assert_eq!(sim.variant(), Variant::Automated);
        assert_eq!(sim.operations().len(), 3);
        let names: Vec<_> = sim.vehicles().into_iter().map(|v| v.name).collect();
        assert_eq!(names, ["x", "y"]);
        assert_eq!(rec.resets, vec![(Variant::Automated, 0.0)]);

        sim.apply(Control::ToggleVariant).unwrap();
        assert_eq!(sim.variant(), Variant::Manual);
        assert_eq!(sim.operations().len(), 2);
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;

    #[test]
    fn callbacks_match_tick_loop() {
        let mut sim = builder(test_config())
            .fleet(Variant::Manual, vec![truck_to("t", Point::new(300.0, 50.0), "B")])
            .snapshot_interval(2)
            .build()
            .unwrap();
        let mut rec = Recorder::default();

        // 10 s steps in fast-forward: A at 60, B at 90.
        let ticks = sim.run(10.0, 100, &mut rec).unwrap();
        assert_eq!(ticks, 9);
        assert!(sim.is_finished());
        assert_eq!(rec.starts, 9);
        assert_eq!(rec.ends, 9);
        assert_eq!(rec.snapshots, 4);
        assert_eq!(rec.completed, ["A", "B"]);
        assert_eq!(rec.legs, vec![("t".to_owned(), 0)]);
        assert!(rec.ended);
    }

    #[test]
    fn run_stops_at_max_ticks() {
        let mut sim = simple();
        let mut rec = Recorder::default();
        assert_eq!(sim.run(1.0, 5, &mut rec).unwrap(), 5);
        assert_eq!(sim.now(), 5.0);
        assert!(rec.completed.is_empty());
    }
}
