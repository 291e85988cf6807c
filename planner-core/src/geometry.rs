//! Plane geometry helpers shared by hit-testing, transforms and rendering.

use serde::{Deserialize, Serialize};

/// A point in plan space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Offset by a delta.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Rotate this point by `angle` radians about `pivot`.
    #[must_use]
    pub fn rotate_about(self, pivot: Self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Self::new(pivot.x + dx * cos - dy * sin, pivot.y + dx * sin + dy * cos)
    }

    /// Express this point in a frame centered on `pivot` and rotated by `angle`.
    ///
    /// The result is relative to the pivot (the pivot maps to the origin).
    #[must_use]
    pub fn to_local(self, pivot: Self, angle: f64) -> Self {
        let (sin, cos) = (-angle).sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Self::new(dx * cos - dy * sin, dx * sin + dy * cos)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Bounds {
    /// Create bounds from origin and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest bounds enclosing every point. `None` for an empty slice.
    #[must_use]
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Point at fractional position (`fx`, `fy`) inside the box.
    #[must_use]
    pub fn at(&self, fx: f64, fy: f64) -> Point {
        Point::new(self.x + self.width * fx, self.y + self.height * fy)
    }

    /// Whether `p` lies inside the box grown by `padding` on each side.
    #[must_use]
    pub fn contains(&self, p: Point, padding: f64) -> bool {
        p.x >= self.x - padding
            && p.x <= self.x + self.width + padding
            && p.y >= self.y - padding
            && p.y <= self.y + self.height + padding
    }
}

/// Shortest distance from `p` to the segment `a`-`b`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let cx = b.x - a.x;
    let cy = b.y - a.y;
    let len_sq = cx * cx + cy * cy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * cx + (p.y - a.y) * cy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * cx, a.y + t * cy))
}

/// Whether `p` is strictly closer than `radius` to the segment `a`-`b`.
#[must_use]
pub fn near_segment(p: Point, a: Point, b: Point, radius: f64) -> bool {
    distance_to_segment(p, a, b) < radius
}

/// Whether `p` is near any segment of the polyline. A single point is tested directly.
#[must_use]
pub fn near_polyline(p: Point, points: &[Point], radius: f64) -> bool {
    match points {
        [] => false,
        [only] => p.distance(*only) < radius,
        _ => points
            .windows(2)
            .any(|pair| near_segment(p, pair[0], pair[1], radius)),
    }
}

/// Whether `p` lies inside the circle grown by `padding`.
#[must_use]
pub fn in_circle(p: Point, center: Point, radius: f64, padding: f64) -> bool {
    p.distance(center) <= radius + padding
}
