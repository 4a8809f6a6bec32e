//! A planned path, consumed front-first as the vehicle passes waypoints.

use std::collections::VecDeque;

use apron_core::Point;

/// Ordered continuous waypoints for one itinerary leg.
///
/// The vehicle's current position is implicit and not part of the path.
/// Waypoints are dropped from the front once passed; a partly consumed path
/// cannot be rewound.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    points: VecDeque<Point>,
    /// Leading waypoints that are driven in reverse.
    reverse_prefix: usize,
    /// Trailing waypoints that form the straightened final approach.
    approach_len: usize,
}

impl Path {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points: points.into(), reverse_prefix: 0, approach_len: 0 }
    }

    pub(crate) fn with_sections(points: Vec<Point>, reverse_prefix: usize, approach_len: usize) -> Self {
        let len = points.len();
        Self {
            points: points.into(),
            reverse_prefix: reverse_prefix.min(len),
            approach_len: approach_len.min(len),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The waypoint currently being driven towards.
    #[inline]
    pub fn next(&self) -> Option<Point> {
        self.points.front().copied()
    }

    /// The leg's final waypoint.
    #[inline]
    pub fn destination(&self) -> Option<Point> {
        self.points.back().copied()
    }

    /// Drop the front waypoint once it has been passed.
    pub fn advance(&mut self) -> Option<Point> {
        let p = self.points.pop_front()?;
        self.reverse_prefix = self.reverse_prefix.saturating_sub(1);
        self.approach_len = self.approach_len.min(self.points.len());
        Some(p)
    }

    /// `true` while the vehicle should be backing towards the front waypoint.
    #[inline]
    pub fn is_reversing(&self) -> bool {
        self.reverse_prefix > 0
    }

    pub fn reverse_prefix(&self) -> usize {
        self.reverse_prefix
    }

    pub fn approach_len(&self) -> usize {
        self.approach_len
    }

    /// `true` once the remaining waypoints lie within the straightened
    /// approach (or one waypoint before it).
    #[inline]
    pub fn in_approach(&self) -> bool {
        self.approach_len > 0 && self.points.len() <= self.approach_len + 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<Point> {
        self.points.iter().copied().collect()
    }

    /// Insert waypoints before the current front.  Clears the reverse prefix,
    /// which only applies to leading waypoints.
    pub(crate) fn prepend(&mut self, points: &[Point]) {
        if points.is_empty() {
            return;
        }
        for p in points.iter().rev() {
            self.points.push_front(*p);
        }
        self.reverse_prefix = 0;
    }

    /// Append waypoints after the current destination.  Clears the approach,
    /// which only applies to trailing waypoints.
    pub(crate) fn extend(&mut self, points: &[Point]) {
        if points.is_empty() {
            return;
        }
        self.points.extend(points.iter().copied());
        self.approach_len = 0;
    }
}
