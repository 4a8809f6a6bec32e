//! The `OutputWriter` trait implemented by backend writers.

use crate::{LegRow, OperationRow, OutputResult, TrackRow};

/// Trait implemented by output backends.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    fn write_operation(&mut self, row: &OperationRow) -> OutputResult<()>;

    fn write_leg(&mut self, row: &LegRow) -> OutputResult<()>;

    /// Write a batch of track points from one snapshot.
    fn write_tracks(&mut self, rows: &[TrackRow]) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Called at the end of every run; rows may still follow after a restart.
    fn finish(&mut self) -> OutputResult<()>;
}
