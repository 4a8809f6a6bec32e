//! Grid search and line-of-sight smoothing.
//!
//! [`astar`] finds a shortest four-connected cell path; [`smooth`] then
//! reduces it to the few cells between which straight travel is clear.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::grid::{Cell, GridMap};
use crate::{SpatialError, SpatialResult};

/// Neighbour offsets in expansion order: right, left, down, up.
const NEIGHBOURS: [(i64, i64); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

const UNREACHED: usize = usize::MAX;

/// Four-connected A* with unit step cost and a Manhattan heuristic.
///
/// The start cell itself may be blocked (a vehicle parked against an
/// obstacle); every other cell on the path is traversable.  Returns the cell
/// sequence from `start` to `goal` inclusive.
///
/// # Errors
///
/// * `SameCell` if `start == goal`.
/// * `NoPath` if `goal` is unreachable.
pub fn astar(grid: &GridMap, start: Cell, goal: Cell) -> SpatialResult<Vec<Cell>> {
    if start == goal {
        return Err(SpatialError::SameCell(start));
    }

    let cols = grid.cols();
    let n = grid.rows() * cols;
    let idx = |c: Cell| c.row * cols + c.col;

    // cost[i] = best known step count to reach cell i.
    let mut cost = vec![UNREACHED; n];
    // prev[i] = flat index of the predecessor; UNREACHED for the start.
    let mut prev = vec![UNREACHED; n];
    let mut closed = vec![false; n];

    cost[idx(start)] = 0;

    // Min-heap on (f = g + h, cell).  Ties break on the cell's row-major order.
    let mut heap: BinaryHeap<Reverse<(usize, Cell)>> = BinaryHeap::new();
    heap.push(Reverse((start.manhattan(goal), start)));

    while let Some(Reverse((_, cell))) = heap.pop() {
        if cell == goal {
            return Ok(reconstruct(&prev, goal, cols));
        }
        let ci = idx(cell);
        if closed[ci] {
            continue;
        }
        closed[ci] = true;

        for (dr, dc) in NEIGHBOURS {
            let (r, c) = (cell.row as i64 + dr, cell.col as i64 + dc);
            if !grid.in_bounds(r, c) {
                continue;
            }
            let next = Cell::new(r as usize, c as usize);
            if !grid.is_open(next) {
                continue;
            }
            let ni = idx(next);
            let new_cost = cost[ci] + 1;
            if new_cost < cost[ni] {
                cost[ni] = new_cost;
                prev[ni] = ci;
                heap.push(Reverse((new_cost + next.manhattan(goal), next)));
            }
        }
    }

    Err(SpatialError::NoPath { from: start, to: goal })
}

fn reconstruct(prev: &[usize], goal: Cell, cols: usize) -> Vec<Cell> {
    let mut cells = vec![goal];
    let mut cur = goal.row * cols + goal.col;
    while prev[cur] != UNREACHED {
        cur = prev[cur];
        cells.push(Cell::new(cur / cols, cur % cols));
    }
    cells.reverse();
    cells
}

/// Greedy farthest-visible smoothing.
///
/// From the current anchor, scan the remaining cells from the end backwards
/// and jump to the first one with clear line of sight; if none is visible,
/// step to the next cell.  Endpoints are preserved and every consecutive
/// pair of the result is mutually visible (or adjacent).
///
/// A blocked first cell sees nothing, so the first hop is always to its
/// neighbour on the search path.
pub fn smooth(grid: &GridMap, cells: &[Cell]) -> Vec<Cell> {
    let Some(&first) = cells.first() else {
        return Vec::new();
    };
    let mut out = vec![first];
    let mut anchor = 0;
    let last = cells.len() - 1;

    while anchor < last {
        let next = (anchor + 2..=last)
            .rev()
            .find(|&j| !grid.has_obstacle(cells[anchor], cells[j]))
            .unwrap_or(anchor + 1);
        out.push(cells[next]);
        anchor = next;
    }
    out
}
