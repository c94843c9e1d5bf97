//! Points and the shapes used as node boundaries and query ranges.

use crate::error::QuadTreeError;

/// A 2D position carrying a caller-owned payload.
///
/// The index never looks at `data`; it is stored alongside the coordinates and
/// handed back by queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<P = ()> {
    pub x: f32,
    pub y: f32,
    pub data: P,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, data: () }
    }
}

impl<P> Point<P> {
    pub fn with_data(x: f32, y: f32, data: P) -> Self {
        Self { x, y, data }
    }
}

/// Axis-aligned rectangle, stored as its top-left and bottom-right corners.
///
/// Subdivided cells share their outer edges bit-for-bit with their parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Rect {
    /// Build a rectangle, rejecting negative or non-finite parameters.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, QuadTreeError> {
        if ![x, y, width, height].iter().all(|v| v.is_finite()) {
            return Err(QuadTreeError::NonFinite);
        }
        if width < 0.0 || height < 0.0 {
            return Err(QuadTreeError::NegativeExtent { width, height });
        }
        Self::checked_edges(x, y, x + width, y + height)
    }

    /// Rectangle spanned by two opposite corners given in any order.
    pub fn from_corners(a: (f32, f32), b: (f32, f32)) -> Result<Self, QuadTreeError> {
        if ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()) {
            return Err(QuadTreeError::NonFinite);
        }
        Self::checked_edges(a.0.min(b.0), a.1.min(b.1), a.0.max(b.0), a.1.max(b.1))
    }

    /// Square of side `2 * half_extent` centered on `(cx, cy)`.
    pub fn around(cx: f32, cy: f32, half_extent: f32) -> Result<Self, QuadTreeError> {
        Self::new(
            cx - half_extent,
            cy - half_extent,
            half_extent * 2.0,
            half_extent * 2.0,
        )
    }

    fn checked_edges(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Result<Self, QuadTreeError> {
        if !(max_x.is_finite() && max_y.is_finite()) {
            return Err(QuadTreeError::NonFinite);
        }
        Ok(Self::from_edges(min_x, min_y, max_x, max_y))
    }

    /// Callers guarantee finite edges with `min <= max` on both axes.
    pub(crate) const fn from_edges(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.min_x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.min_y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max_x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max_y
    }

    /// Midpoint of the rectangle. Quadrant splits happen exactly here, and it
    /// never falls outside the edges.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (
            self.min_x * 0.5 + self.max_x * 0.5,
            self.min_y * 0.5 + self.max_y * 0.5,
        )
    }

    /// Inclusive on all four edges.
    #[inline]
    pub fn contains<P>(&self, point: &Point<P>) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Closed-interval overlap: rectangles sharing only an edge or a corner
    /// still overlap. Contrast with [`Rect::intersects`], which is strict.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Open-interval test: touching along an edge or corner is not an intersection.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    #[inline]
    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        let closest_x = circle.x.clamp(self.min_x, self.max_x);
        let closest_y = circle.y.clamp(self.min_y, self.max_y);
        let dx = closest_x - circle.x;
        let dy = closest_y - circle.y;
        dx * dx + dy * dy <= circle.radius * circle.radius
    }
}

/// Circle given by its center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    x: f32,
    y: f32,
    radius: f32,
}

impl Circle {
    pub fn new(x: f32, y: f32, radius: f32) -> Result<Self, QuadTreeError> {
        if ![x, y, radius].iter().all(|v| v.is_finite()) {
            return Err(QuadTreeError::NonFinite);
        }
        if radius < 0.0 {
            return Err(QuadTreeError::NegativeRadius(radius));
        }
        Ok(Self { x, y, radius })
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Inclusive: a point exactly `radius` away is inside.
    #[inline]
    pub fn contains<P>(&self, point: &Point<P>) -> bool {
        let dx = point.x - self.x;
        let dy = point.y - self.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    #[inline]
    pub fn intersects(&self, other: &Circle) -> bool {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let reach = self.radius + other.radius;
        dx * dx + dy * dy <= reach * reach
    }

    #[inline]
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        rect.intersects_circle(self)
    }
}

/// Query range accepted by the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    Rect(Rect),
    Circle(Circle),
}

impl Region {
    #[inline]
    pub fn contains<P>(&self, point: &Point<P>) -> bool {
        match self {
            Region::Rect(rect) => rect.contains(point),
            Region::Circle(circle) => circle.contains(point),
        }
    }

    /// Whether any point inside `boundary` could be contained by this region.
    ///
    /// Both arms are closed tests, matching the inclusive `contains`.
    #[inline]
    pub fn overlaps(&self, boundary: &Rect) -> bool {
        match self {
            Region::Rect(rect) => rect.overlaps(boundary),
            Region::Circle(circle) => boundary.intersects_circle(circle),
        }
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Region::Rect(rect)
    }
}

impl From<Circle> for Region {
    fn from(circle: Circle) -> Self {
        Region::Circle(circle)
    }
}
