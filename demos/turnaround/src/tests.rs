use std::collections::HashMap;
use std::io::Cursor;

use clap::Parser;

use apron_core::FrameConfig;
use apron_mobility::{LegEvent, LegKind, Vehicle, VehicleSpec, load_fleet_reader};
use apron_schedule::{OperationTables, Scheduler, Variant, load_operations_reader};
use apron_sim::{Control, NoopObserver, SimObserver};
use apron_spatial::{GridPlanner, PathRequest, Planner};

use crate::{Args, apron, build_sim, mm_ss, parse_delay, tables};

fn args(extra: &[&str]) -> Args {
    Args::parse_from(std::iter::once("turnaround").chain(extra.iter().copied()))
}

fn op_tables() -> OperationTables {
    OperationTables {
        manual: Some(load_operations_reader(Cursor::new(tables::MANUAL_OPERATIONS)).unwrap()),
        automated: Some(load_operations_reader(Cursor::new(tables::AUTOMATED_OPERATIONS)).unwrap()),
    }
}

fn fleet(variant: Variant) -> Vec<VehicleSpec> {
    let csv = match variant {
        Variant::Manual => tables::MANUAL_FLEET,
        Variant::Automated => tables::AUTOMATED_FLEET,
    };
    load_fleet_reader(Cursor::new(csv)).unwrap()
}

// ── Embedded data ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod data_tests {
    use super::*;

    #[test]
    fn both_tables_resolve() {
        let manual = Scheduler::new(op_tables(), Variant::Manual).unwrap();
        assert_eq!(manual.len(), 19);
        assert!(manual.lookup("Toilet_Service").is_some());

        let automated = Scheduler::new(op_tables(), Variant::Automated).unwrap();
        assert_eq!(automated.len(), 17);
        assert!(automated.lookup("Toilet_Service").is_none());
        assert_eq!(automated.get(automated.id_of("Technical_Inspection").unwrap()).duration(), 1200.0);
    }

    #[test]
    fn fleets_group_legs_per_vehicle() {
        let manual = fleet(Variant::Manual);
        assert_eq!(manual.len(), 8);
        assert!(manual.iter().all(|v| v.legs.len() == 2));
        assert!(manual.iter().all(|v| v.legs[1].kind == LegKind::Return));

        let automated = fleet(Variant::Automated);
        assert_eq!(automated.len(), 7);
        let spot = automated.iter().find(|v| v.name == "Spot").unwrap();
        assert_eq!(spot.legs.len(), 8);
        assert_eq!(spot.legs[0].start_gate.as_deref(), Some("Technical_Inspection"));
        assert_eq!(spot.legs[7].end_gate.as_deref(), Some("Technical_Inspection"));
        assert!(spot.legs[..7].iter().all(|leg| leg.wait == 140.0));
    }

    #[test]
    fn every_leg_has_a_path() {
        let grids: HashMap<_, _> = apron::grids(&FrameConfig::default(), None).unwrap().into_iter().collect();
        let archetypes = apron::archetypes();
        let planner = GridPlanner::new(apron::service_road());

        for variant in [Variant::Manual, Variant::Automated] {
            for spec in fleet(variant) {
                let arch = archetypes.iter().find(|a| a.name == spec.archetype).unwrap();
                let (mut at, mut heading) = (spec.start, spec.start_heading);
                for (i, leg) in spec.legs.iter().enumerate() {
                    let grid = match leg.kind {
                        LegKind::Outbound => &grids[arch.outbound_grid.as_str()],
                        LegKind::Return => &grids[arch.return_grid.as_str()],
                    };
                    let request = PathRequest {
                        start: at,
                        start_heading: Some(heading),
                        goal: leg.goal,
                        goal_heading: leg.heading,
                        straighten: arch.straighten,
                        reverse: leg.reverse,
                    };
                    let path = planner.plan(grid, &request);
                    assert!(path.is_ok(), "{variant} {} leg {i}: {path:?}", spec.name);
                    heading = leg.heading.unwrap_or_else(|| at.bearing_to(leg.goal));
                    at = leg.goal;
                }
            }
        }
    }

    #[test]
    fn hydrant_return_grid_walls_off_the_hose() {
        let grids: HashMap<_, _> = apron::grids(&FrameConfig::default(), None).unwrap().into_iter().collect();
        let out = &grids[apron::HYDRANT_OUT];
        let back = &grids[apron::HYDRANT_RETURN];
        assert!(back.open_count() < out.open_count());
        assert_eq!(out.open_count(), grids[apron::APRON].open_count());
    }
}

// ── Command line ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn defaults() {
        let a = args(&[]);
        assert_eq!(a.variant, Variant::Manual);
        assert_eq!(a.speed, 8);
        assert_eq!(a.fps, 30.0);
        assert!(a.delay.is_empty());
        assert!(!a.compare);
    }

    #[test]
    fn variant_aliases() {
        assert_eq!(args(&["--variant", "auto"]).variant, Variant::Automated);
        assert_eq!(args(&["-v", "old"]).variant, Variant::Manual);
        assert!(Args::try_parse_from(["turnaround", "--variant", "robotic"]).is_err());
    }

    #[test]
    fn delay_arguments() {
        assert_eq!(parse_delay("Refueling=5").unwrap(), ("Refueling", 5));
        assert_eq!(parse_delay(" Boarding = -2 ").unwrap(), ("Boarding", -2));
        assert!(parse_delay("Refueling").is_err());
        assert!(parse_delay("Refueling=soon").is_err());
    }

    #[test]
    fn clock_labels() {
        assert_eq!(mm_ss(-120.0), "-02:00");
        assert_eq!(mm_ss(0.0), "00:00");
        assert_eq!(mm_ss(2280.4), "38:00");
    }
}

// ── Whole runs ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[derive(Default)]
    struct Legs(Vec<String>);

    impl SimObserver for Legs {
        fn on_leg_completed(&mut self, _event: &LegEvent, vehicle: &Vehicle) {
            self.0.push(vehicle.name().to_owned());
        }
    }

    #[test]
    fn builds_with_controls_applied() {
        let sim = build_sim(&args(&["--speed", "100", "--delay", "Refueling=5"])).unwrap();
        assert_eq!(sim.multiplier().get(), 64);
        assert_eq!(sim.now(), -120.0);
        assert_eq!(sim.fleet().len(), 8);

        let refueling = sim.operations().into_iter().find(|op| op.name == "Refueling").unwrap();
        assert_eq!(refueling.delay_minutes, 5);
    }

    #[test]
    fn rejects_bad_setup() {
        assert!(build_sim(&args(&["--fps", "0"])).is_err());
        assert!(build_sim(&args(&["--delay", "Teleport=3"])).is_err());
        assert!(build_sim(&args(&["--config", "/nonexistent/turnaround.json"])).is_err());
    }

    #[test]
    fn fast_forward_finishes_the_manual_turnaround() {
        let mut sim = build_sim(&args(&["--speed", "1024", "--snapshot", "0"])).unwrap();
        sim.run(1.0 / 30.0, 10_000, &mut NoopObserver).unwrap();

        assert!(sim.is_finished());
        let pushback = sim.operations().into_iter().find(|op| op.name == "Pushback").unwrap();
        // Parking, Deboarding, Catering, Boarding, Pushback on the critical path.
        assert!(pushback.completion_time.unwrap() >= 2280.0);
    }

    #[test]
    fn vehicles_drive_at_moderate_speed() {
        let mut sim = build_sim(&args(&["--speed", "8", "--no-path", "hold"])).unwrap();
        let mut legs = Legs::default();
        sim.run(1.0 / 30.0, 20_000, &mut legs).unwrap();

        assert!(sim.is_finished());
        assert!(!legs.0.is_empty());
    }

    #[test]
    fn toggle_switches_to_the_automated_fleet() {
        let mut sim = build_sim(&args(&[])).unwrap();
        sim.apply(Control::ToggleVariant).unwrap();

        assert_eq!(sim.variant(), Variant::Automated);
        assert_eq!(sim.scheduler().len(), 17);
        assert!(sim.vehicles().iter().any(|v| v.name == "Spot"));
        assert_eq!(sim.now(), -120.0);
    }
}
