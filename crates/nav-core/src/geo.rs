//! Planar geometry primitives in metres.
//!
//! Everything is `f64`: floor-field grids at `delta_h = 0.0625` m over a
//! 100 m room already need sub-millimetre stability in the Eikonal update.

use std::ops::{Add, Mul, Sub};

/// Tolerance for "same point" and collinearity checks.
pub const GEO_EPS: f64 = 1e-9;

// ── Point ─────────────────────────────────────────────────────────────────────

/// A 2-D point (or vector) in building coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self - other).norm()
    }

    #[inline]
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3-D cross product.
    #[inline]
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Unit vector in the same direction, or `ZERO` for a zero vector.
    pub fn normalized(self) -> Point {
        let n = self.norm();
        if n < GEO_EPS { Point::ZERO } else { Point::new(self.x / n, self.y / n) }
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

impl Mul<f64> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

// ── Line ──────────────────────────────────────────────────────────────────────

/// A finite line segment between two points.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub p1: Point,
    pub p2: Point,
}

impl Line {
    #[inline]
    pub const fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    #[inline]
    pub fn centre(&self) -> Point {
        (self.p1 + self.p2) * 0.5
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.p1.distance(self.p2)
    }

    /// Unit normal (left of `p1 → p2`).
    pub fn normal(&self) -> Point {
        let d = (self.p2 - self.p1).normalized();
        Point::new(-d.y, d.x)
    }

    /// Closest point on the segment to `p`.
    pub fn closest_point(&self, p: Point) -> Point {
        let d = self.p2 - self.p1;
        let len2 = d.dot(d);
        if len2 < GEO_EPS {
            return self.p1;
        }
        let t = ((p - self.p1).dot(d) / len2).clamp(0.0, 1.0);
        self.p1 + d * t
    }

    #[inline]
    pub fn distance_to(&self, p: Point) -> f64 {
        self.closest_point(p).distance(p)
    }

    /// `true` if the two segments cross at a single interior point of both.
    ///
    /// Touching at an endpoint and collinear overlap do not count: a sight
    /// line grazing a wall corner or running along a wall is not blocked.
    pub fn crosses(&self, other: &Line) -> bool {
        let d1 = orientation(other.p1, other.p2, self.p1);
        let d2 = orientation(other.p1, other.p2, self.p2);
        let d3 = orientation(self.p1, self.p2, other.p1);
        let d4 = orientation(self.p1, self.p2, other.p2);
        d1 * d2 < 0.0 && d3 * d4 < 0.0
    }

    /// Parameter interval `[t0, t1]` (in `self`'s `0..=1` parametrisation)
    /// covered by `other`, if the two are collinear and overlap.
    pub fn collinear_overlap(&self, other: &Line) -> Option<(f64, f64)> {
        let d = self.p2 - self.p1;
        let len2 = d.dot(d);
        if len2 < GEO_EPS {
            return None;
        }
        let tol = 1e-6 * len2.sqrt().max(1.0);
        if orientation(self.p1, self.p2, other.p1).abs() > tol
            || orientation(self.p1, self.p2, other.p2).abs() > tol
        {
            return None;
        }
        let a = (other.p1 - self.p1).dot(d) / len2;
        let b = (other.p2 - self.p1).dot(d) / len2;
        let (lo, hi) = (a.min(b).max(0.0), a.max(b).min(1.0));
        (hi - lo > GEO_EPS).then_some((lo, hi))
    }

    /// Point at parameter `t` along the segment.
    #[inline]
    pub fn at(&self, t: f64) -> Point {
        self.p1 + (self.p2 - self.p1) * t
    }
}

/// Signed area of the triangle `(a, b, c)`, times two.
#[inline]
fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

// ── Polygons ──────────────────────────────────────────────────────────────────

/// Even-odd ray-casting containment test.  Points exactly on the boundary
/// may land on either side.
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Vertex-average centre of a polygon.  Empty input yields the origin.
pub fn polygon_centre(polygon: &[Point]) -> Point {
    if polygon.is_empty() {
        return Point::ZERO;
    }
    let sum = polygon.iter().fold(Point::ZERO, |acc, &p| acc + p);
    sum * (1.0 / polygon.len() as f64)
}

/// Closed-ring edges of a polygon (`last → first` included).
pub fn polygon_edges(polygon: &[Point]) -> impl Iterator<Item = Line> + '_ {
    let n = polygon.len();
    (0..n).filter(move |_| n >= 2).map(move |i| Line::new(polygon[i], polygon[(i + 1) % n]))
}

/// Axis-aligned bounding box `(min, max)` of a set of points.
pub fn bounding_box(points: impl IntoIterator<Item = Point>) -> Option<(Point, Point)> {
    let mut it = points.into_iter();
    let first = it.next()?;
    Some(it.fold((first, first), |(lo, hi), p| {
        (Point::new(lo.x.min(p.x), lo.y.min(p.y)), Point::new(hi.x.max(p.x), hi.y.max(p.y)))
    }))
}
