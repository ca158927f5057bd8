//! Axis-aligned geometry and intersection primitives shared by systems.

use glam::Vec2;

/// Determinant magnitude below which two directions are treated as parallel.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Axis-aligned rectangle anchored at its upper-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    origin: Vec2,
    size: Vec2,
}

impl Rect {
    /// Creates a rectangle from its upper-left corner and extent.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Creates a rectangle from scalar components.
    #[must_use]
    pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(width, height))
    }

    /// Upper-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Extent of the rectangle along both axes.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Width measured in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.size.x
    }

    /// Height measured in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.size.y
    }

    /// Minimum corner (upper-left).
    #[must_use]
    pub fn min(&self) -> Vec2 {
        self.origin
    }

    /// Maximum corner (lower-right).
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    /// Geometric center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Reports whether the rectangle has no area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }

    /// Reports whether the two rectangles overlap with a positive area.
    ///
    /// Rectangles that only share an edge or a corner do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        let low = self.min().max(other.min());
        let high = self.max().min(other.max());
        low.x < high.x && low.y < high.y
    }

    /// Smallest rectangle covering both rectangles.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let min = self.min().min(other.min());
        Rect::new(min, self.max().max(other.max()) - min)
    }

    /// Closest point of the rectangle to `point`, found by clamping each axis.
    #[must_use]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let max = self.max();
        Vec2::new(
            point.x.max(self.origin.x).min(max.x),
            point.y.max(self.origin.y).min(max.y),
        )
    }

    /// Returns a copy of the rectangle shifted by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.origin + offset, self.size)
    }

    /// Corners in clockwise order starting from the upper-left.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        let max = self.max();
        [
            self.origin,
            Vec2::new(max.x, self.origin.y),
            max,
            Vec2::new(self.origin.x, max.y),
        ]
    }

    /// The four boundary edges, each running from one corner to the next.
    #[must_use]
    pub fn edges(&self) -> [Segment; 4] {
        let [a, b, c, d] = self.corners();
        [
            Segment::new(a, b),
            Segment::new(b, c),
            Segment::new(c, d),
            Segment::new(d, a),
        ]
    }
}

/// Directed line segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Point where the segment begins.
    pub start: Vec2,
    /// Point where the segment ends.
    pub end: Vec2,
}

impl Segment {
    /// Creates a segment running from `start` to `end`.
    #[must_use]
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Vector from the start to the end of the segment.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }

    /// Point located at parameter `t` along the segment.
    #[must_use]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.start + self.delta() * t
    }
}

/// Intersects a ray with a segment.
///
/// Returns the ray parameter `t >= 0` of the hit, or `None` when the ray is
/// parallel to the segment or misses its open interior (`0 < u < 1`). The hit
/// point is `origin + direction * t`.
#[must_use]
pub fn ray_segment_intersection(origin: Vec2, direction: Vec2, segment: Segment) -> Option<f32> {
    let edge = segment.delta();
    let det = direction.perp_dot(edge);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }

    let offset = segment.start - origin;
    let t = offset.perp_dot(edge) / det;
    let u = offset.perp_dot(direction) / det;

    if t >= 0.0 && u > 0.0 && u < 1.0 {
        Some(t)
    } else {
        None
    }
}

/// Intersects two segments, excluding their endpoints.
///
/// Returns the parameter along `first` when both parameters lie strictly
/// inside `(0, 1)`. Parallel and collinear segments never intersect.
#[must_use]
pub fn segment_intersection(first: Segment, second: Segment) -> Option<f32> {
    let direction = first.delta();
    let edge = second.delta();
    let det = direction.perp_dot(edge);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }

    let offset = second.start - first.start;
    let t = offset.perp_dot(edge) / det;
    let u = offset.perp_dot(direction) / det;

    if t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0 {
        Some(t)
    } else {
        None
    }
}
