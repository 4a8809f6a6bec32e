//! Occupancy grids and the continuous ↔ cell coordinate mapping.
//!
//! # Coordinate frame
//!
//! ```text
//! row = floor(y / cell_size) + row_offset
//! col = floor(x / cell_size) + col_offset
//!
//! x = (col - col_offset) * cell_size + cell_size / 2
//! y = (row - row_offset) * cell_size + cell_size / 2
//! ```
//!
//! Mapping a point to its cell and back lands on the cell centre, so the
//! round-trip error is at most half a cell diagonal.
//!
//! # CSV format
//!
//! Header-less, one line per grid row, `1` for traversable and `0` for
//! blocked:
//!
//! ```csv
//! 1,1,1,0,1,1
//! 1,0,1,0,1,1
//! ```

use std::fmt;
use std::io::Read;

use apron_core::{FrameConfig, Point};

use crate::{SpatialError, SpatialResult};

// ── Cell ──────────────────────────────────────────────────────────────────────

/// A grid cell.  Ordered row-major so heaps tie-break deterministically.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance.
    #[inline]
    pub fn manhattan(self, other: Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

// ── GridFrame ─────────────────────────────────────────────────────────────────

/// Affine map between continuous apron coordinates and grid indices.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridFrame {
    pub cell_size: f32,
    pub row_offset: i64,
    pub col_offset: i64,
}

impl GridFrame {
    /// Signed `(row, col)` for `p`; may be negative or past the grid edge.
    #[inline]
    pub fn raw_cell(&self, p: Point) -> (i64, i64) {
        let row = (p.y / self.cell_size).floor() as i64 + self.row_offset;
        let col = (p.x / self.cell_size).floor() as i64 + self.col_offset;
        (row, col)
    }

    /// Centre of `cell` in continuous coordinates.
    #[inline]
    pub fn center(&self, cell: Cell) -> Point {
        let half = self.cell_size / 2.0;
        Point::new(
            (cell.col as i64 - self.col_offset) as f32 * self.cell_size + half,
            (cell.row as i64 - self.row_offset) as f32 * self.cell_size + half,
        )
    }
}

impl Default for GridFrame {
    fn default() -> Self {
        GridFrame::from(&FrameConfig::default())
    }
}

impl From<&FrameConfig> for GridFrame {
    fn from(c: &FrameConfig) -> Self {
        Self {
            cell_size: c.cell_size,
            row_offset: c.row_offset as i64,
            col_offset: c.col_offset as i64,
        }
    }
}

// ── GridMap ───────────────────────────────────────────────────────────────────

/// Immutable 2-D traversability grid, stored row-major.
#[derive(Clone, Debug)]
pub struct GridMap {
    rows: usize,
    cols: usize,
    open: Vec<bool>,
    frame: GridFrame,
}

impl GridMap {
    /// A grid with every cell traversable.
    pub fn open(rows: usize, cols: usize, frame: GridFrame) -> SpatialResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(SpatialError::EmptyGrid);
        }
        Ok(Self { rows, cols, open: vec![true; rows * cols], frame })
    }

    /// Build from nested rows (`true` = traversable).  Rows must be equal length.
    pub fn from_rows(rows: Vec<Vec<bool>>, frame: GridFrame) -> SpatialResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(SpatialError::EmptyGrid);
        }
        let mut open = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(SpatialError::RaggedGrid { row: i, expected: cols, found: row.len() });
            }
            open.extend_from_slice(row);
        }
        Ok(Self { rows: rows.len(), cols, open, frame })
    }

    /// Mark every cell whose centre falls inside the continuous rectangle
    /// `[min, max]` as blocked.
    pub fn block_rect(&mut self, min: Point, max: Point) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let c = self.frame.center(Cell::new(row, col));
                if c.x >= min.x && c.x <= max.x && c.y >= min.y && c.y <= max.y {
                    self.open[row * self.cols + col] = false;
                }
            }
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn frame(&self) -> &GridFrame {
        &self.frame
    }

    #[inline]
    pub fn in_bounds(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// `true` if `cell` is inside the grid and traversable.
    #[inline]
    pub fn is_open(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols && self.open[cell.row * self.cols + cell.col]
    }

    /// The cell containing `p`, or `OutOfBounds`.
    pub fn cell_of(&self, p: Point) -> SpatialResult<Cell> {
        let (row, col) = self.frame.raw_cell(p);
        if self.in_bounds(row, col) {
            Ok(Cell::new(row as usize, col as usize))
        } else {
            Err(SpatialError::OutOfBounds { point: p })
        }
    }

    #[inline]
    pub fn center(&self, cell: Cell) -> Point {
        self.frame.center(cell)
    }

    /// `true` if the rasterised segment `a → b` touches a blocked cell.
    ///
    /// Uses Bresenham's line algorithm over both endpoints inclusive.  The
    /// result does not depend on the order of `a` and `b`.
    pub fn has_obstacle(&self, a: Cell, b: Cell) -> bool {
        let (mut x1, mut y1) = (a.row as i64, a.col as i64);
        let (mut x2, mut y2) = (b.row as i64, b.col as i64);

        let steep = (y2 - y1).abs() > (x2 - x1).abs();
        if steep {
            std::mem::swap(&mut x1, &mut y1);
            std::mem::swap(&mut x2, &mut y2);
        }
        if x1 > x2 {
            std::mem::swap(&mut x1, &mut x2);
            std::mem::swap(&mut y1, &mut y2);
        }

        let dx = x2 - x1;
        let dy = (y2 - y1).abs();
        let ystep = if y1 < y2 { 1 } else { -1 };
        // Doubled error term keeps the arithmetic integral.
        let mut error = dx;
        let mut y = y1;

        for x in x1..=x2 {
            let (row, col) = if steep { (y, x) } else { (x, y) };
            if !self.in_bounds(row, col) || !self.open[row as usize * self.cols + col as usize] {
                return true;
            }
            error -= 2 * dy;
            if error < 0 {
                y += ystep;
                error += 2 * dx;
            }
        }
        false
    }

    /// Number of traversable cells.
    pub fn open_count(&self) -> usize {
        self.open.iter().filter(|&&o| o).count()
    }
}

// ── CSV loading ───────────────────────────────────────────────────────────────

/// Load a grid from a header-less 0/1 CSV file.
pub fn load_grid_csv(path: &std::path::Path, frame: GridFrame) -> SpatialResult<GridMap> {
    let file = std::fs::File::open(path).map_err(SpatialError::Io)?;
    load_grid_reader(file, frame)
}

/// Like [`load_grid_csv`] but accepts any `Read` source.
pub fn load_grid_reader<R: Read>(reader: R, frame: GridFrame) -> SpatialResult<GridMap> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows: Vec<Vec<bool>> = Vec::new();
    for (i, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let row = record
            .iter()
            .map(|field| match field {
                "1" => Ok(true),
                "0" => Ok(false),
                other => Err(SpatialError::Parse(format!(
                    "row {i}: expected 0 or 1, found {other:?}"
                ))),
            })
            .collect::<SpatialResult<Vec<bool>>>()?;
        rows.push(row);
    }
    GridMap::from_rows(rows, frame)
}
