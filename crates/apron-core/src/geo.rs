//! Planar coordinates and heading math.
//!
//! Positions live in the apron's continuous coordinate space (the original
//! screen space: `x` grows to the right, `y` grows downwards).  Headings are
//! degrees measured from `+x` towards `+y`, so 90° points "down" the apron.

use std::ops::{Add, Mul, Sub};

/// A point (or vector) in continuous apron coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `heading_deg`.
    #[inline]
    pub fn from_heading(heading_deg: f32) -> Self {
        let r = heading_deg.to_radians();
        Self { x: r.cos(), y: r.sin() }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        (other - self).length()
    }

    #[inline]
    pub fn dot(self, other: Point) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Heading in degrees from `self` towards `other`, in `(-180, 180]`.
    #[inline]
    pub fn bearing_to(self, other: Point) -> f32 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }

    /// Unit vector in the same direction, or the zero vector if `self` is zero.
    pub fn normalized(self) -> Point {
        let len = self.length();
        if len > f32::EPSILON {
            Point::new(self.x / len, self.y / len)
        } else {
            Point::default()
        }
    }

    /// Linear interpolation; `t = 0` gives `self`, `t = 1` gives `other`.
    #[inline]
    pub fn lerp(self, other: Point, t: f32) -> Point {
        self + (other - self) * t
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

// ── Angles ────────────────────────────────────────────────────────────────────

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn normalize_angle(deg: f32) -> f32 {
    let mut a = deg % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Signed shortest rotation from `from` to `to`, in `(-180, 180]`.
#[inline]
pub fn angle_between(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Interpolate between two headings along the shorter arc.
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    normalize_angle(from + angle_between(from, to) * t)
}
