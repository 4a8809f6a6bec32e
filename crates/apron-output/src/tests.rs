//! Integration tests for apron-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use apron_schedule::Variant;

    use crate::csv::CsvWriter;
    use crate::row::{LegRow, OperationRow, TrackRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(path: &std::path::Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    fn track(vehicle: &str, tick: u64) -> TrackRow {
        TrackRow {
            run: 0,
            tick,
            time: tick as f64 * 0.5,
            vehicle: vehicle.to_owned(),
            x: 100.0,
            y: 200.3,
            heading: -90.0,
            speed: -1.0,
            state: "en_route",
            stopped: false,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("operations.csv").exists());
        assert!(dir.path().join("legs.csv").exists());
        assert!(dir.path().join("vehicle_tracks.csv").exists());
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("a").join("b");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("operations.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(
            headers(&dir.path().join("operations.csv")),
            ["run", "variant", "operation", "start_time", "completion_time", "delay_min"]
        );
        assert_eq!(headers(&dir.path().join("legs.csv")), ["run", "vehicle", "leg", "time", "x", "y", "departed"]);
        assert_eq!(
            headers(&dir.path().join("vehicle_tracks.csv")),
            ["run", "tick", "time", "vehicle", "x", "y", "heading", "speed", "state", "stopped"]
        );
    }

    #[test]
    fn operation_row_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_operation(&OperationRow {
            run: 2,
            variant: Variant::Automated,
            name: "Refuel".into(),
            start_time: -30.0,
            completion_time: 570.5,
            delay_minutes: -1,
        })
        .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("operations.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "2");
        assert_eq!(&rows[0][1], "automated");
        assert_eq!(&rows[0][2], "Refuel");
        assert_eq!(&rows[0][3], "-30.000");
        assert_eq!(&rows[0][4], "570.500");
        assert_eq!(&rows[0][5], "-1");
    }

    #[test]
    fn track_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tracks(&[track("a", 1), track("b", 1)]).unwrap();
        w.write_leg(&LegRow { run: 0, vehicle: "a".into(), leg: 1, time: 3.0, x: 1.0, y: 2.0, departed: true })
            .unwrap();
        w.finish().unwrap();
        // Idempotent.
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("vehicle_tracks.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][3], "b");
        assert_eq!(&rows[0][5], "200.3");
        assert_eq!(&rows[0][7], "-1.00");
        assert_eq!(&rows[0][8], "en_route");

        let mut rdr = csv::Reader::from_path(dir.path().join("legs.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][6], "1");
    }
}

#[cfg(test)]
mod observer_tests {
    use apron_core::{Point, SimConfig};
    use apron_mobility::{Archetype, LegSpec, VehicleSpec};
    use apron_schedule::{OperationDef, OperationTables, Variant};
    use apron_sim::{Control, SimBuilder, SimObserver, Simulation};
    use apron_spatial::{GridFrame, GridMap, GridPlanner};

    use crate::{CsvWriter, LegRow, OperationRow, OutputError, OutputResult, OutputWriter, SimOutputObserver, TrackRow};

    fn sim() -> Simulation {
        let mut config = SimConfig::default();
        config.clock.origin_operation = None;
        let tables = OperationTables::single(
            Variant::Manual,
            vec![OperationDef::new("A", 60.0), OperationDef::new("B", 30.0).after(&["A"])],
        );
        let grid = GridMap::open(50, 50, GridFrame { cell_size: 10.0, row_offset: 0, col_offset: 0 }).unwrap();
        let truck = VehicleSpec::new("truck_1", "truck", Point::new(50.0, 50.0), 0.0)
            .leg(LegSpec::to(Point::new(300.0, 50.0)).when_ready("B"));
        SimBuilder::new(config, tables, GridPlanner::default())
            .grid("apron", grid)
            .archetype(Archetype::new("truck", "apron"))
            .fleet(Variant::Manual, vec![truck])
            .snapshot_interval(1)
            .build()
            .unwrap()
    }

    #[derive(Default)]
    struct Memory {
        operations: Vec<OperationRow>,
        legs: Vec<LegRow>,
        tracks: Vec<TrackRow>,
        finished: usize,
    }

    impl OutputWriter for Memory {
        fn write_operation(&mut self, row: &OperationRow) -> OutputResult<()> {
            self.operations.push(row.clone());
            Ok(())
        }
        fn write_leg(&mut self, row: &LegRow) -> OutputResult<()> {
            self.legs.push(row.clone());
            Ok(())
        }
        fn write_tracks(&mut self, rows: &[TrackRow]) -> OutputResult<()> {
            self.tracks.extend_from_slice(rows);
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    struct Broken;

    impl OutputWriter for Broken {
        fn write_operation(&mut self, _row: &OperationRow) -> OutputResult<()> {
            Err(OutputError::Io(std::io::Error::other("disk full")))
        }
        fn write_leg(&mut self, _row: &LegRow) -> OutputResult<()> {
            Ok(())
        }
        fn write_tracks(&mut self, _rows: &[TrackRow]) -> OutputResult<()> {
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn records_a_full_run() {
        let mut sim = sim();
        let mut obs = SimOutputObserver::new(Memory::default(), sim.variant());
        let ticks = sim.run(10.0, 100, &mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let mem = obs.into_writer();
        let names: Vec<_> = mem.operations.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(mem.operations[0].start_time, 0.0);
        assert_eq!(mem.operations[0].completion_time, 60.0);
        assert_eq!(mem.operations[1].start_time, 60.0);
        assert_eq!(mem.operations[1].completion_time, 90.0);

        assert_eq!(mem.legs.len(), 1);
        assert_eq!(mem.legs[0].vehicle, "truck_1");
        assert!(mem.legs[0].departed);

        assert_eq!(mem.tracks.len() as u64, ticks);
        assert_eq!(mem.tracks.last().map(|t| t.state), Some("departed"));
        assert_eq!(mem.finished, 1);
    }

    #[test]
    fn reset_starts_a_new_run() {
        let mut sim = sim();
        let mut obs = SimOutputObserver::new(Memory::default(), sim.variant());
        sim.run(10.0, 100, &mut obs).unwrap();
        sim.apply_with(Control::Restart, &mut obs).unwrap();
        assert_eq!(obs.run(), 1);
        sim.run(10.0, 100, &mut obs).unwrap();

        let mem = obs.into_writer();
        let runs: Vec<_> = mem.operations.iter().map(|r| r.run).collect();
        assert_eq!(runs, [0, 0, 1, 1]);
    }

    #[test]
    fn first_write_error_kept() {
        let mut sim = sim();
        let mut obs = SimOutputObserver::new(Broken, sim.variant());
        sim.run(10.0, 100, &mut obs).unwrap();
        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn csv_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut sim = sim();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap(), sim.variant());
        sim.run(10.0, 100, &mut obs).unwrap();
        obs.on_sim_end(sim.now());
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("operations.csv")).unwrap();
        assert_eq!(rdr.records().count(), 2);
        let mut rdr = csv::Reader::from_path(dir.path().join("vehicle_tracks.csv")).unwrap();
        assert!(rdr.records().count() > 0);
    }
}
