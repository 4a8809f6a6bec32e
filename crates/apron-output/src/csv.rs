//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `operations.csv`
//! - `legs.csv`
//! - `vehicle_tracks.csv`
//!
//! Times are simulated seconds with millisecond precision.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{LegRow, OperationRow, OutputResult, TrackRow};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    operations: Writer<File>,
    legs:       Writer<File>,
    tracks:     Writer<File>,
}

impl CsvWriter {
    /// Create the output directory if needed, open the three CSV files and
    /// write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut operations = Writer::from_path(dir.join("operations.csv"))?;
        operations.write_record(["run", "variant", "operation", "start_time", "completion_time", "delay_min"])?;

        let mut legs = Writer::from_path(dir.join("legs.csv"))?;
        legs.write_record(["run", "vehicle", "leg", "time", "x", "y", "departed"])?;

        let mut tracks = Writer::from_path(dir.join("vehicle_tracks.csv"))?;
        tracks.write_record(["run", "tick", "time", "vehicle", "x", "y", "heading", "speed", "state", "stopped"])?;

        Ok(Self { operations, legs, tracks })
    }
}

fn secs(t: f64) -> String {
    format!("{t:.3}")
}

impl OutputWriter for CsvWriter {
    fn write_operation(&mut self, row: &OperationRow) -> OutputResult<()> {
        self.operations.write_record(&[
            row.run.to_string(),
            row.variant.to_string(),
            row.name.clone(),
            secs(row.start_time),
            secs(row.completion_time),
            row.delay_minutes.to_string(),
        ])?;
        Ok(())
    }

    fn write_leg(&mut self, row: &LegRow) -> OutputResult<()> {
        self.legs.write_record(&[
            row.run.to_string(),
            row.vehicle.clone(),
            row.leg.to_string(),
            secs(row.time),
            format!("{:.1}", row.x),
            format!("{:.1}", row.y),
            (row.departed as u8).to_string(),
        ])?;
        Ok(())
    }

    fn write_tracks(&mut self, rows: &[TrackRow]) -> OutputResult<()> {
        for row in rows {
            self.tracks.write_record(&[
                row.run.to_string(),
                row.tick.to_string(),
                secs(row.time),
                row.vehicle.clone(),
                format!("{:.1}", row.x),
                format!("{:.1}", row.y),
                format!("{:.1}", row.heading),
                format!("{:.2}", row.speed),
                row.state.to_owned(),
                (row.stopped as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.operations.flush()?;
        self.legs.flush()?;
        self.tracks.flush()?;
        Ok(())
    }
}
