//! Unit tests for apron-schedule.

use crate::{OperationDef, OperationTables, Scheduler, Variant};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `A` (60 s) → `B` (30 s).
fn a_then_b() -> Scheduler {
    Scheduler::from_defs(vec![
        OperationDef::new("A", 60.0),
        OperationDef::new("B", 30.0).after(&["A"]),
    ])
    .unwrap()
}

/// Advance in fixed steps until `t_end`, returning the final time.
fn run(s: &mut Scheduler, mut t: f64, dt: f64, t_end: f64) -> f64 {
    while t < t_end - 1e-9 {
        t += dt;
        s.advance(dt, t);
    }
    t
}

// ── Timer semantics ───────────────────────────────────────────────────────────

#[cfg(test)]
mod advance {
    use super::*;

    #[test]
    fn two_step_scenario() {
        let mut s = a_then_b();
        let a = s.id_of("A").unwrap();
        let b = s.id_of("B").unwrap();

        let done = s.advance(60.0, 60.0);
        assert_eq!(done, vec![a]);
        assert!(s.is_completed(a));
        assert_eq!(s.get(a).completion_time(), Some(60.0));
        assert_eq!(s.get(a).start_time(), Some(0.0));
        assert_eq!(s.get(b).start_time(), Some(60.0));
        assert_eq!(s.get(b).time_left(), 30.0);
        assert!(!s.is_finished());

        s.advance(30.0, 90.0);
        assert!(s.is_completed(b));
        assert_eq!(s.get(b).completion_time(), Some(90.0));
        assert!(s.is_finished());
    }

    #[test]
    fn root_is_always_ready() {
        let s = a_then_b();
        assert!(s.is_ready(s.id_of("A").unwrap()));
        assert!(!s.is_ready(s.id_of("B").unwrap()));
    }

    #[test]
    fn positive_delay_postpones_completion() {
        let mut s = Scheduler::from_defs(vec![OperationDef::new("A", 60.0).with_delay(1)]).unwrap();
        let a = s.id_of("A").unwrap();
        run(&mut s, 0.0, 10.0, 60.0);
        assert!(!s.is_completed(a));
        run(&mut s, 60.0, 10.0, 120.0);
        assert!(s.is_completed(a));
        assert_eq!(s.get(a).completion_time(), Some(120.0));
    }

    #[test]
    fn negative_delay_shortens() {
        let mut s = Scheduler::from_defs(vec![OperationDef::new("A", 120.0).with_delay(-1)]).unwrap();
        run(&mut s, 0.0, 10.0, 60.0);
        assert!(s.is_completed(s.id_of("A").unwrap()));
    }

    #[test]
    fn completion_is_monotonic_under_delay_increase() {
        let mut s = a_then_b();
        let a = s.id_of("A").unwrap();
        s.advance(60.0, 60.0);
        s.adjust_delay(a, 10);
        s.advance(1.0, 61.0);
        assert!(s.is_completed(a));
    }

    #[test]
    fn blocked_operation_never_starts() {
        let mut s = a_then_b();
        let b = s.id_of("B").unwrap();
        s.advance(30.0, 30.0);
        assert_eq!(s.get(b).start_time(), None);
        assert_eq!(s.get(b).time_left(), 30.0);
    }

    #[test]
    fn result_independent_of_table_order() {
        let forward = vec![
            OperationDef::new("A", 60.0),
            OperationDef::new("B", 30.0).after(&["A"]),
            OperationDef::new("C", 10.0).after(&["B"]),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let mut s1 = Scheduler::from_defs(forward).unwrap();
        let mut s2 = Scheduler::from_defs(backward).unwrap();
        run(&mut s1, 0.0, 7.0, 140.0);
        run(&mut s2, 0.0, 7.0, 140.0);
        for name in ["A", "B", "C"] {
            let t1 = s1.get(s1.id_of(name).unwrap()).completion_time();
            let t2 = s2.get(s2.id_of(name).unwrap()).completion_time();
            assert_eq!(t1, t2, "{name}");
        }
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod validation {
    use super::*;
    use crate::ScheduleError;

    #[test]
    fn duplicate_name_is_fatal() {
        let err = Scheduler::from_defs(vec![OperationDef::new("A", 1.0), OperationDef::new("A", 2.0)])
            .unwrap_err();
        assert!(matches!(err, ScheduleError::DuplicateOperation(n) if n == "A"));
    }

    #[test]
    fn unknown_dependency_is_fatal() {
        let err = Scheduler::from_defs(vec![OperationDef::new("A", 1.0).after(&["Ghost"])]).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::UnknownDependency { operation, dependency }
                if operation == "A" && dependency == "Ghost"
        ));
    }

    #[test]
    fn cycle_is_fatal() {
        let err = Scheduler::from_defs(vec![
            OperationDef::new("Root", 1.0),
            OperationDef::new("A", 1.0).after(&["Root", "B"]),
            OperationDef::new("B", 1.0).after(&["A"]),
        ])
        .unwrap_err();
        match err {
            ScheduleError::CycleDetected(names) => assert_eq!(names, vec!["A", "B"]),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let err = Scheduler::from_defs(vec![OperationDef::new("A", 1.0).after(&["A"])]).unwrap_err();
        assert!(matches!(err, ScheduleError::CycleDetected(_)));
    }

    #[test]
    fn forward_reference_resolves() {
        let s = Scheduler::from_defs(vec![
            OperationDef::new("B", 1.0).after(&["A"]),
            OperationDef::new("A", 1.0),
        ])
        .unwrap();
        assert_eq!(s.get(s.id_of("B").unwrap()).deps(), &[s.id_of("A").unwrap()]);
    }

    #[test]
    fn invalid_alternate_table_fails_at_construction() {
        let tables = OperationTables {
            manual: Some(vec![OperationDef::new("A", 1.0)]),
            automated: Some(vec![OperationDef::new("X", 1.0).after(&["Y"])]),
        };
        assert!(Scheduler::new(tables, Variant::Manual).is_err());
    }

    #[test]
    fn missing_variant_table() {
        let tables = OperationTables::single(Variant::Manual, vec![OperationDef::new("A", 1.0)]);
        let err = Scheduler::new(tables, Variant::Automated).unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownVariant(_)));
    }

    #[test]
    fn variant_names() {
        assert_eq!("old".parse::<Variant>().unwrap(), Variant::Manual);
        assert_eq!("New".parse::<Variant>().unwrap(), Variant::Automated);
        assert_eq!("automated".parse::<Variant>().unwrap(), Variant::Automated);
        assert!("hybrid".parse::<Variant>().is_err());
        assert_eq!(Variant::Manual.toggled(), Variant::Automated);
    }
}

// ── Reset ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reset {
    use super::*;

    #[test]
    fn same_variant_keeps_delays() {
        let mut s = a_then_b();
        let a = s.id_of("A").unwrap();
        s.adjust_delay(a, 3);
        run(&mut s, 0.0, 60.0, 600.0);
        assert!(s.is_finished());

        s.reset(Variant::Manual).unwrap();
        assert!(!s.is_finished());
        assert!(!s.is_completed(a));
        assert_eq!(s.get(a).start_time(), None);
        assert_eq!(s.get(a).time_left(), 60.0);
        assert_eq!(s.get(a).delay_minutes(), 3);
    }

    #[test]
    fn reset_delays_zeroes_all() {
        let mut s = a_then_b();
        for id in s.ids().collect::<Vec<_>>() {
            s.adjust_delay(id, 10);
        }
        s.reset_delays();
        assert!(s.operations().iter().all(|op| op.delay_minutes() == 0));
    }

    #[test]
    fn variant_switch_reloads_table() {
        let tables = OperationTables {
            manual: Some(vec![OperationDef::new("A", 60.0)]),
            automated: Some(vec![OperationDef::new("X", 10.0), OperationDef::new("Y", 5.0)]),
        };
        let mut s = Scheduler::new(tables, Variant::Manual).unwrap();
        s.adjust_delay(s.id_of("A").unwrap(), 4);

        s.reset(Variant::Automated).unwrap();
        assert_eq!(s.variant(), Variant::Automated);
        assert_eq!(s.len(), 2);
        assert!(s.lookup("A").is_none());

        s.reset(Variant::Manual).unwrap();
        assert_eq!(s.get(s.id_of("A").unwrap()).delay_minutes(), 0);
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use apron_core::Point;

    use crate::{ScheduleError, Scheduler, load_operations_reader};

    const HEADER: &str =
        "name,duration_min,dep_1,dep_2,dep_3,dep_4,dep_5,dep_6,loc_1_x,loc_1_y,loc_2_x,loc_2_y,delay_min\n";

    #[test]
    fn parses_rows() {
        let csv = format!(
            "{HEADER}\
             Parking,2,,,,,,,,,,,0\n\
             Boarding,15,Connect_Bridge,,,,,,820,140,900,140,1.6\n\
             Connect_Bridge,1.5,Parking,,,,,,820,140,,,\n"
        );
        let defs = load_operations_reader(Cursor::new(csv)).unwrap();
        assert_eq!(defs.len(), 3);
        assert_eq!(defs[0].duration, 120.0);
        assert_eq!(defs[1].deps, vec!["Connect_Bridge"]);
        assert_eq!(defs[1].locations, vec![Point::new(820.0, 140.0), Point::new(900.0, 140.0)]);
        assert_eq!(defs[1].delay_minutes, 2);
        assert_eq!(defs[2].duration, 90.0);
        assert_eq!(defs[2].locations.len(), 1);
        assert_eq!(defs[2].delay_minutes, 0);

        // Forward reference from Boarding to Connect_Bridge resolves.
        assert!(Scheduler::from_defs(defs).is_ok());
    }

    #[test]
    fn half_location_is_dropped() {
        let csv = format!("{HEADER}A,1,,,,,,,10,,,,0\n");
        let defs = load_operations_reader(Cursor::new(csv)).unwrap();
        assert!(defs[0].locations.is_empty());
    }

    #[test]
    fn bad_duration_is_parse_error() {
        let csv = format!("{HEADER}A,soon,,,,,,,,,,,0\n");
        assert!(matches!(
            load_operations_reader(Cursor::new(csv)),
            Err(ScheduleError::Parse(_))
        ));
    }

    #[test]
    fn negative_duration_rejected() {
        let csv = format!("{HEADER}A,-1,,,,,,,,,,,0\n");
        assert!(load_operations_reader(Cursor::new(csv)).is_err());
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    /// Operations `op0..opN` where each may depend on any earlier one.
    fn dag() -> impl Strategy<Value = Vec<OperationDef>> {
        (1usize..10).prop_flat_map(|n| {
            (
                proptest::collection::vec(0u32..600, n),
                proptest::collection::vec(proptest::collection::vec(any::<bool>(), n), n),
            )
                .prop_map(|(durations, edges)| {
                    durations
                        .iter()
                        .enumerate()
                        .map(|(i, &d)| {
                            let mut def = OperationDef::new(format!("op{i}"), f64::from(d));
                            def.deps = (0..i).filter(|&j| edges[i][j]).map(|j| format!("op{j}")).collect();
                            def
                        })
                        .collect()
                })
        })
    }

    /// Tick with `steps` repeated until finished; returns each completion time in table order.
    fn completions(defs: Vec<OperationDef>, steps: &[f64]) -> Vec<Option<f64>> {
        let mut s = Scheduler::from_defs(defs).unwrap();
        let mut now = 0.0;
        for &dt in steps.iter().cycle().take(100_000) {
            if s.is_finished() {
                break;
            }
            now += dt;
            s.advance(dt, now);
        }
        assert!(s.is_finished());
        s.operations().iter().map(|op| op.completion_time()).collect()
    }

    proptest! {
        #[test]
        fn dependents_complete_after_their_dependencies(
            defs in dag(),
            steps in proptest::collection::vec(0.5f64..30.0, 1..20),
        ) {
            let s = Scheduler::from_defs(defs.clone()).unwrap();
            let times = completions(defs, &steps);
            for (i, op) in s.operations().iter().enumerate() {
                for dep in op.deps() {
                    prop_assert!(
                        times[i] >= times[dep.index()],
                        "{} at {:?} before {} at {:?}",
                        op.name(), times[i], s.get(*dep).name(), times[dep.index()],
                    );
                }
            }
        }

        #[test]
        fn identical_steps_give_identical_results(
            defs in dag(),
            steps in proptest::collection::vec(0.5f64..30.0, 1..20),
        ) {
            let first = completions(defs.clone(), &steps);
            let second = completions(defs, &steps);
            prop_assert_eq!(first, second);
        }
    }
}
