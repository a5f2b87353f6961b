//! Shared geometry types for the stakeline playfield engine.

use geo::line_measures::Distance;
use geo::{Closest, ClosestPoint, Euclidean, Line, LineLocatePoint};
use serde::{Deserialize, Serialize};

/// A 2D point in field (screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (units from the left of the screen).
    pub x: f64,
    /// Vertical position (units from the top of the screen).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        Euclidean.distance(&geo::Point::from(self), &geo::Point::from(other))
    }

    /// Returns `true` if both coordinates differ from `other` by less
    /// than `tolerance`.
    #[must_use]
    pub fn coincides(self, other: Self, tolerance: f64) -> bool {
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }

    /// The point displaced by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Linear interpolation towards `other` by parameter `t`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            t.mul_add(other.x - self.x, self.x),
            t.mul_add(other.y - self.y, self.y),
        )
    }
}

impl From<Point> for geo::Coord<f64> {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Point> for geo::Point<f64> {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<geo::Point<f64>> for Point {
    fn from(p: geo::Point<f64>) -> Self {
        Self::new(p.x(), p.y())
    }
}

/// A straight line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First endpoint.
    pub start: Point,
    /// Second endpoint.
    pub end: Point,
}

impl Segment {
    /// Create a new segment.
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// The segment as a `geo` line.
    #[must_use]
    pub fn line(&self) -> Line<f64> {
        Line::new(self.start, self.end)
    }

    /// Length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Returns `true` if both endpoints are the same point.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.start.coincides(self.end, f64::EPSILON)
    }

    /// Returns `true` if the segment runs (almost) straight up or down.
    #[must_use]
    pub fn is_vertical(&self) -> bool {
        (self.start.x - self.end.x).abs() < 1.0
    }

    /// Returns `true` if the segment runs (almost) straight left or right.
    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        (self.start.y - self.end.y).abs() < 1.0
    }

    /// Project `p` onto the segment.
    ///
    /// Returns the clamped parameter `t` in `[0, 1]` and the closest
    /// point of the segment (`p` itself when it already lies on the
    /// segment). Returns `None` for a zero-length segment.
    #[must_use]
    pub fn project(&self, p: Point) -> Option<(f64, Point)> {
        if self.is_degenerate() {
            return None;
        }
        let line = self.line();
        let query = geo::Point::from(p);
        let t = line.line_locate_point(&query)?;
        match line.closest_point(&query) {
            Closest::Intersection(_) => Some((t, p)),
            Closest::SinglePoint(foot) => Some((t, foot.into())),
            Closest::Indeterminate => None,
        }
    }

    /// Distance from `p` to the closest point of the segment.
    #[must_use]
    pub fn distance_to(&self, p: Point) -> f64 {
        if self.is_degenerate() {
            return p.distance(self.start);
        }
        Euclidean.distance(&geo::Point::from(p), &self.line())
    }

    /// Collinear on-segment test.
    ///
    /// `p` must lie inside the segment's bounding box grown by
    /// `tolerance`, the cross product must be near zero (scaled by the
    /// segment's Manhattan length), and `p` must not lie beyond either
    /// endpoint.
    #[must_use]
    pub fn contains(&self, p: Point, tolerance: f64) -> bool {
        let (a, b) = (self.start, self.end);
        let in_box = p.x >= a.x.min(b.x) - tolerance
            && p.x <= a.x.max(b.x) + tolerance
            && p.y >= a.y.min(b.y) - tolerance
            && p.y <= a.y.max(b.y) + tolerance;
        if !in_box {
            return false;
        }
        let cross = (p.x - a.x).mul_add(b.y - a.y, -((p.y - a.y) * (b.x - a.x)));
        let scale = 1.0_f64.max((b.x - a.x).abs() + (b.y - a.y).abs());
        if cross.abs() > tolerance * scale {
            return false;
        }
        let dot = (p.x - a.x).mul_add(p.x - b.x, (p.y - a.y) * (p.y - b.y));
        dot <= tolerance
    }
}

/// Orientation of a boundary edge the player can be anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// A left-right edge (top or bottom side).
    Horizontal,
    /// An up-down edge (left or right side).
    Vertical,
}

/// One of the four axis-aligned movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards negative y.
    Up,
    /// Towards positive y.
    Down,
    /// Towards negative x.
    Left,
    /// Towards positive x.
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Normalize a raw input delta to a direction.
    ///
    /// Horizontal input wins when both components are non-zero. A zero
    /// delta has no direction.
    #[must_use]
    pub fn from_delta(dx: f64, dy: f64) -> Option<Self> {
        if dx > 0.0 {
            Some(Self::Right)
        } else if dx < 0.0 {
            Some(Self::Left)
        } else if dy > 0.0 {
            Some(Self::Down)
        } else if dy < 0.0 {
            Some(Self::Up)
        } else {
            None
        }
    }

    /// Unit vector for this direction.
    #[must_use]
    pub const fn delta(self) -> (f64, f64) {
        match self {
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
        }
    }

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The axis this direction moves along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }
}

/// The playfield rectangle, fixed for the lifetime of a level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in field units (one unit per occupancy cell).
    pub width: f64,
    /// Height in field units (one unit per occupancy cell).
    pub height: f64,
}

impl FieldRect {
    /// Create a validated rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidDimensions`] if either dimension is
    /// smaller than one cell or not finite, or if the origin is not
    /// finite.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, FieldError> {
        let rect = Self {
            x,
            y,
            width,
            height,
        };
        rect.validate()?;
        Ok(rect)
    }

    /// Check that the rectangle can back an occupancy grid.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidDimensions`] when the rectangle is
    /// malformed.
    pub fn validate(&self) -> Result<(), FieldError> {
        let finite = self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite();
        if !finite || self.width < 1.0 || self.height < 1.0 {
            return Err(FieldError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        self.x <= p.x && p.x <= self.right() && self.y <= p.y && p.y <= self.bottom()
    }

    /// The four corners, clockwise from the top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }
}

/// Errors raised while constructing a field or level.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// The field rectangle cannot back an occupancy grid.
    #[error("invalid field dimensions {width}x{height}: both must be finite and at least 1")]
    InvalidDimensions {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },

    /// A configuration scalar is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // --- Point tests ---

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_coincides_within_tolerance() {
        let a = Point::new(10.0, 10.0);
        assert!(a.coincides(Point::new(10.05, 9.95), 0.1));
        assert!(!a.coincides(Point::new(10.2, 10.0), 0.1));
    }

    #[test]
    fn point_lerp_midpoint() {
        let mid = Point::new(0.0, 0.0).lerp(Point::new(10.0, 20.0), 0.5);
        assert_eq!(mid, Point::new(5.0, 10.0));
    }

    // --- Segment tests ---

    #[test]
    fn segment_projection_is_clamped() {
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let (t, foot) = s.project(Point::new(15.0, 3.0)).unwrap();
        assert!((t - 1.0).abs() < f64::EPSILON);
        assert_eq!(foot, Point::new(10.0, 0.0));
    }

    #[test]
    fn segment_projection_interior() {
        let s = Segment::new(Point::new(100.0, 0.0), Point::new(100.0, 100.0));
        let (t, foot) = s.project(Point::new(95.0, 40.0)).unwrap();
        assert!((t - 0.4).abs() < 1e-12);
        assert!(foot.coincides(Point::new(100.0, 40.0), 1e-9));
        assert!((s.distance_to(Point::new(95.0, 40.0)) - 5.0).abs() < 1e-9);
        assert!((s.distance_to(Point::new(100.0, 103.0)) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn diagonal_segment_distance() {
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let d = s.distance_to(Point::new(0.0, 10.0));
        assert!((d - 50.0_f64.sqrt()).abs() < 1e-9);
        assert!((s.length() - 200.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn zero_length_segment_has_no_projection() {
        let p = Point::new(1.0, 1.0);
        assert!(Segment::new(p, p).project(Point::new(2.0, 2.0)).is_none());
        assert!((Segment::new(p, p).distance_to(Point::new(4.0, 5.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn segment_contains_collinear_interior_point() {
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(s.contains(Point::new(50.0, 0.0), 0.1));
        assert!(s.contains(Point::new(0.0, 0.0), 0.1));
        assert!(!s.contains(Point::new(50.0, 2.0), 0.1));
        assert!(!s.contains(Point::new(101.0, 0.0), 0.1));
    }

    // --- Direction tests ---

    #[test]
    fn horizontal_input_wins() {
        assert_eq!(Direction::from_delta(1.0, 1.0), Some(Direction::Right));
        assert_eq!(Direction::from_delta(0.0, -2.0), Some(Direction::Up));
        assert_eq!(Direction::from_delta(0.0, 0.0), None);
    }

    #[test]
    fn opposite_round_trips() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
            assert_eq!(dir.opposite().axis(), dir.axis());
        }
    }

    // --- FieldRect tests ---

    #[test]
    fn rect_rejects_non_positive_dimensions() {
        assert!(matches!(
            FieldRect::new(0.0, 0.0, 0.0, 10.0),
            Err(FieldError::InvalidDimensions { .. })
        ));
        assert!(FieldRect::new(0.0, 0.0, 10.0, -5.0).is_err());
        assert!(FieldRect::new(0.0, 0.0, f64::NAN, 5.0).is_err());
        assert!(FieldRect::new(0.0, 0.0, 10.0, 10.0).is_ok());
    }

    #[test]
    fn rect_contains_is_inclusive() {
        let rect = FieldRect {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
        };
        assert!(rect.contains(Point::new(10.0, 20.0)));
        assert!(rect.contains(Point::new(110.0, 70.0)));
        assert!(!rect.contains(Point::new(110.1, 70.0)));
    }
}
