//! Spatial-subsystem error type.

use thiserror::Error;

use apron_core::Point;

use crate::grid::Cell;

/// Errors produced by `apron-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The search exhausted every reachable cell without finding the goal.
    #[error("no path from {from} to {to}")]
    NoPath { from: Cell, to: Cell },

    /// Start and goal fall in the same cell; there is nothing to search.
    #[error("start and goal are both in cell {0}")]
    SameCell(Cell),

    #[error("point {point} lies outside the grid")]
    OutOfBounds { point: Point },

    #[error("grid has no cells")]
    EmptyGrid,

    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid { row: usize, expected: usize, found: usize },

    #[error("grid parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
