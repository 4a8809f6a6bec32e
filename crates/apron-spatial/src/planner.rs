//! Path planning: request type, `Planner` trait, and the grid planner.
//!
//! # Pluggability
//!
//! `apron-mobility` asks for paths through the [`Planner`] trait, so a
//! simulation can swap in a different planner (a visibility graph, a
//! recorded replay) without touching vehicle code.  [`GridPlanner`] is the
//! default: [`find_path`] on an occupancy grid plus depot handling through a
//! [`ServiceRoad`].
//!
//! # Path shape
//!
//! ```text
//!  start ── [back-out] ── smoothed search path ── search goal ── [approach] ── goal
//! ```
//!
//! * **back-out**: only for reverse requests with a known start heading; a
//!   straight segment opposite that heading, driven in reverse.  Dropped
//!   when it would cross a blocked cell or leave the grid.
//! * **approach**: only when a goal heading and a straighten distance are
//!   given; the search targets a point `straighten` units before the goal
//!   and the final stretch is filled with points one cell apart along the
//!   heading.

use tracing::debug;

use apron_core::Point;

use crate::grid::GridMap;
use crate::path::Path;
use crate::search::{astar, smooth};
use crate::{SpatialError, SpatialResult};

// ── PathRequest ───────────────────────────────────────────────────────────────

/// Everything needed to plan one itinerary leg.
#[derive(Clone, Debug, PartialEq)]
pub struct PathRequest {
    pub start: Point,
    /// Heading of the vehicle at `start`; needed for reverse back-outs.
    pub start_heading: Option<f32>,
    pub goal: Point,
    /// Heading the vehicle should have on arrival.
    pub goal_heading: Option<f32>,
    /// Length of the straight final approach (and of a reverse back-out).
    pub straighten: f32,
    pub reverse: bool,
}

impl PathRequest {
    pub fn new(start: Point, goal: Point) -> Self {
        Self { start, start_heading: None, goal, goal_heading: None, straighten: 0.0, reverse: false }
    }

    pub fn arriving_at(mut self, heading: Option<f32>, straighten: f32) -> Self {
        self.goal_heading = heading;
        self.straighten = straighten;
        self
    }

    pub fn reversing_from(mut self, heading: f32) -> Self {
        self.start_heading = Some(heading);
        self.reverse = true;
        self
    }
}

// ── Planner trait ─────────────────────────────────────────────────────────────

/// Pluggable path planner.
pub trait Planner: Send + Sync {
    /// Plan a path on `grid`.
    ///
    /// `SameCell` and `NoPath` are distinct signals; neither is an empty
    /// path.
    fn plan(&self, grid: &GridMap, request: &PathRequest) -> SpatialResult<Path>;
}

// ── find_path ─────────────────────────────────────────────────────────────────

/// Plan a path on `grid` without any depot handling.
///
/// # Errors
///
/// * `OutOfBounds` if the start or the search goal is off the grid.
/// * `SameCell` if start and goal share a cell and there is no back-out.
/// * `NoPath` if the search goal is unreachable.
pub fn find_path(grid: &GridMap, req: &PathRequest) -> SpatialResult<Path> {
    let cell_size = grid.frame().cell_size;

    // ── Reverse back-out ──────────────────────────────────────────────────
    let mut lead: Vec<Point> = Vec::new();
    if req.reverse && req.straighten > 0.0 {
        if let Some(heading) = req.start_heading {
            let back = Point::from_heading(heading) * -1.0;
            lead = segment(req.start, back, req.straighten, cell_size);
            if !clear_back_out(grid, req.start, &lead) {
                debug!(from = %req.start, "back-out blocked; planning without it");
                lead.clear();
            }
        }
    }
    let search_start = lead.last().copied().unwrap_or(req.start);

    // ── Straightened approach ─────────────────────────────────────────────
    let (search_goal, approach) = match req.goal_heading {
        Some(heading) if req.straighten > 0.0 => {
            let dir = Point::from_heading(heading);
            let search_goal = req.goal - dir * req.straighten;
            let mut approach = segment(search_goal, dir, req.straighten, cell_size);
            if let Some(last) = approach.last_mut() {
                *last = req.goal;
            }
            (search_goal, approach)
        }
        _ => (req.goal, Vec::new()),
    };

    let start_cell = grid.cell_of(search_start)?;
    let goal_cell = grid.cell_of(search_goal)?;
    let frame = grid.frame();
    if lead.is_empty() && frame.raw_cell(req.start) == frame.raw_cell(req.goal) {
        return Err(SpatialError::SameCell(start_cell));
    }

    // ── Search and smooth ─────────────────────────────────────────────────
    let mut middle: Vec<Point> = match astar(grid, start_cell, goal_cell) {
        Ok(cells) => smooth(grid, &cells)
            .into_iter()
            .skip(1)
            .map(|c| grid.center(c))
            .collect(),
        Err(SpatialError::SameCell(_)) => Vec::new(),
        Err(e) => return Err(e),
    };
    match middle.last_mut() {
        Some(last) => *last = search_goal,
        None => middle.push(search_goal),
    }

    let reverse_prefix = lead.len();
    let approach_len = approach.len();
    let mut points = lead;
    points.extend(middle);
    points.extend(approach);
    Ok(Path::with_sections(points, reverse_prefix, approach_len))
}

/// `true` if every cell the back-out crosses after leaving the start cell is
/// on the grid and open.  The start cell itself may be blocked.
fn clear_back_out(grid: &GridMap, start: Point, lead: &[Point]) -> bool {
    let Ok(start_cell) = grid.cell_of(start) else {
        return false;
    };
    let Ok(cells) = lead.iter().map(|&p| grid.cell_of(p)).collect::<SpatialResult<Vec<_>>>() else {
        return false;
    };
    let crossed: Vec<_> = cells.into_iter().filter(|&c| c != start_cell).collect();
    crossed.iter().all(|&c| grid.is_open(c)) && crossed.windows(2).all(|w| !grid.has_obstacle(w[0], w[1]))
}

/// Points spaced about one cell apart from `from` (exclusive) along `dir`
/// for `length` units.
fn segment(from: Point, dir: Point, length: f32, cell_size: f32) -> Vec<Point> {
    let steps = ((length / cell_size).round() as usize).max(1);
    let step = length / steps as f32;
    (1..=steps).map(|k| from + dir * (step * k as f32)).collect()
}

// ── Service road ──────────────────────────────────────────────────────────────

/// One depot lane: an off-grid depot point joined to an on-grid access point
/// on the apron.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lane {
    pub depot: Point,
    pub apron: Point,
}

impl Lane {
    pub fn new(depot: Point, apron: Point) -> Self {
        Self { depot, apron }
    }

    fn midpoint(&self) -> Point {
        self.depot.lerp(self.apron, 0.5)
    }
}

/// The depot lanes shared by every vehicle.
#[derive(Clone, Debug, Default)]
pub struct ServiceRoad {
    lanes: Vec<Lane>,
}

impl ServiceRoad {
    pub fn new(lanes: Vec<Lane>) -> Self {
        Self { lanes }
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// The lane whose depot point is at `p` (within a small tolerance).
    pub fn lane_at(&self, p: Point) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.depot.distance(p) < 1.0)
    }
}

// ── GridPlanner ───────────────────────────────────────────────────────────────

/// [`find_path`] plus depot routing.
///
/// A leg that starts at a depot point drives up its lane to the access point
/// before the search begins; a leg that ends at a depot point searches to the
/// lane's access point and then drives down the lane.  Depot points are never
/// looked up on the grid.
#[derive(Clone, Debug, Default)]
pub struct GridPlanner {
    pub road: ServiceRoad,
}

impl GridPlanner {
    pub fn new(road: ServiceRoad) -> Self {
        Self { road }
    }
}

impl Planner for GridPlanner {
    fn plan(&self, grid: &GridMap, request: &PathRequest) -> SpatialResult<Path> {
        let mut req = request.clone();
        let mut prefix: Vec<Point> = Vec::new();
        let mut suffix: Vec<Point> = Vec::new();

        if let Some(lane) = self.road.lane_at(request.start) {
            prefix = vec![lane.midpoint(), lane.apron];
            req.start = lane.apron;
            req.start_heading = Some(lane.depot.bearing_to(lane.apron));
            req.reverse = false;
        }
        if let Some(lane) = self.road.lane_at(request.goal) {
            suffix = vec![lane.midpoint(), lane.depot];
            req.goal = lane.apron;
            req.goal_heading = None;
            if !req.reverse {
                req.straighten = 0.0;
            }
        }

        let lane_leg = !prefix.is_empty() || !suffix.is_empty();
        let mut path = match find_path(grid, &req) {
            Ok(path) => path,
            Err(SpatialError::SameCell(_)) if lane_leg => Path::new(vec![req.goal]),
            Err(e) => return Err(e),
        };
        path.prepend(&prefix);
        path.extend(&suffix);

        debug!(
            from = %request.start,
            to = %request.goal,
            waypoints = path.len(),
            reversing = path.reverse_prefix(),
            "planned path"
        );
        Ok(path)
    }
}
