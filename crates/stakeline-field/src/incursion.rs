//! The in-progress incursion trace.

use geo::Euclidean;
use geo::line_measures::Distance;

use crate::types::{Point, Segment};

/// Segments shorter than this are ignored by collision checks.
const MIN_SEGMENT_LENGTH: f64 = 0.1;

/// Ordered points of the active incursion.
///
/// Empty when no incursion is active. The first point is the snapped
/// push-start position on the boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncursionTrace {
    points: Vec<Point>,
}

impl IncursionTrace {
    /// Begin a new trace at `start`, discarding any previous one.
    pub fn start(&mut self, start: Point) {
        self.points.clear();
        self.points.push(start);
    }

    /// Append a point.
    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    /// Discard the trace, returning its start point.
    pub fn cancel(&mut self) -> Option<Point> {
        let start = self.points.first().copied();
        self.points.clear();
        start
    }

    /// Take the points out, leaving the trace empty.
    pub fn take(&mut self) -> Vec<Point> {
        std::mem::take(&mut self.points)
    }

    /// The trace's points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns `true` if no incursion is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns `true` if `p` is closer than `threshold` to any trace
    /// segment, ignoring the `skip_tail_segments` most recent ones.
    #[must_use]
    pub fn collides(&self, p: Point, threshold: f64, skip_tail_segments: usize) -> bool {
        if self.points.len() < 2 {
            return false;
        }
        let query = geo::Point::from(p);
        let limit = (self.points.len() - 1).saturating_sub(skip_tail_segments);
        self.points[..=limit]
            .windows(2)
            .map(|pair| Segment::new(pair[0], pair[1]))
            .filter(|segment| segment.length() >= MIN_SEGMENT_LENGTH)
            .any(|segment| Euclidean.distance(&query, &segment.line()) < threshold)
    }
}
