//! Boundary-following movement.
//!
//! An [`EdgeCrawler`] keeps a scalar arc-length position along the live
//! boundary. Per-edge lengths are cached and stamped with the boundary
//! version they were computed from; whenever the boundary is rebuilt
//! the crawler re-anchors by projecting its last position onto the new
//! polygon before moving on.

use crate::boundary::BoundaryPolygon;
use crate::types::Point;

/// Perimeters shorter than this are treated as degenerate.
const MIN_PERIMETER: f64 = 1e-6;

/// Edge lengths of one boundary version.
#[derive(Debug, Clone, PartialEq)]
struct EdgeLengthCache {
    version: u64,
    /// `cumulative[i]` is the arc length at the start of edge `i`;
    /// the final entry is the perimeter.
    cumulative: Vec<f64>,
}

impl EdgeLengthCache {
    fn build(boundary: &BoundaryPolygon) -> Self {
        let mut cumulative = Vec::with_capacity(boundary.edges().len() + 1);
        let mut total = 0.0;
        cumulative.push(total);
        for edge in boundary.edges() {
            total += edge.length();
            cumulative.push(total);
        }
        Self {
            version: boundary.version(),
            cumulative,
        }
    }

    fn perimeter(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn edge_length(&self, index: usize) -> f64 {
        self.cumulative[index + 1] - self.cumulative[index]
    }

    /// Index of the edge whose arc-length range contains `distance`.
    fn locate(&self, distance: f64) -> usize {
        let edges = self.cumulative.len().saturating_sub(1);
        // First edge whose end lies beyond `distance`; clamp so the
        // perimeter itself maps onto the last edge.
        self.cumulative[1..]
            .partition_point(|&end| end <= distance)
            .min(edges.saturating_sub(1))
    }
}

/// An entity that patrols the live boundary.
#[derive(Debug, Clone)]
pub struct EdgeCrawler {
    position: Point,
    path_distance: f64,
    direction: f64,
    speed: f64,
    cache: Option<EdgeLengthCache>,
}

impl EdgeCrawler {
    /// Place a crawler on `boundary` at the point nearest `position`.
    ///
    /// `forward` selects ring order (`true`) or reverse ring order.
    #[must_use]
    pub fn new(position: Point, forward: bool, speed: f64, boundary: &BoundaryPolygon) -> Self {
        let mut crawler = Self {
            position,
            path_distance: 0.0,
            direction: if forward { 1.0 } else { -1.0 },
            speed,
            cache: None,
        };
        crawler.anchor(boundary);
        crawler
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Arc-length position along the boundary.
    #[must_use]
    pub const fn path_distance(&self) -> f64 {
        self.path_distance
    }

    /// Returns `true` when moving in ring order.
    #[must_use]
    pub fn is_forward(&self) -> bool {
        self.direction > 0.0
    }

    /// Boundary version the crawler is currently anchored to.
    #[must_use]
    pub fn anchored_version(&self) -> Option<u64> {
        self.cache.as_ref().map(|cache| cache.version)
    }

    /// Advance one tick along `boundary`, re-anchoring first if the
    /// boundary changed since the last update.
    pub fn update(&mut self, boundary: &BoundaryPolygon) {
        if self.anchored_version() != Some(boundary.version()) {
            log::debug!(
                "crawler re-anchoring to boundary v{} from ({:.1}, {:.1})",
                boundary.version(),
                self.position.x,
                self.position.y
            );
            self.anchor(boundary);
        }
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        let perimeter = cache.perimeter();
        if perimeter < MIN_PERIMETER {
            return;
        }

        self.path_distance = self
            .speed
            .mul_add(self.direction, self.path_distance)
            .rem_euclid(perimeter);
        let index = cache.locate(self.path_distance);
        let length = cache.edge_length(index);
        let t = if length > 0.0 {
            ((self.path_distance - cache.cumulative[index]) / length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let edge = boundary.edges()[index];
        self.position = edge.start.lerp(edge.end, t);
    }

    /// Project the current position onto `boundary` and rebuild the
    /// edge-length cache. A degenerate boundary leaves the crawler where
    /// it is.
    fn anchor(&mut self, boundary: &BoundaryPolygon) {
        let cache = EdgeLengthCache::build(boundary);
        if let Some(anchor) = boundary.nearest(self.position) {
            self.position = anchor.point;
            self.path_distance = anchor
                .t
                .mul_add(cache.edge_length(anchor.edge_index), cache.cumulative[anchor.edge_index]);
        }
        self.cache = Some(cache);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::EDGE_TOLERANCE;
    use crate::types::FieldRect;

    fn square() -> BoundaryPolygon {
        BoundaryPolygon::from_rect(&FieldRect {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        })
    }

    #[test]
    fn spawns_projected_onto_boundary() {
        let b = square();
        let crawler = EdgeCrawler::new(Point::new(100.0, 100.0), true, 1.5, &b);
        assert_eq!(crawler.position(), Point::new(100.0, 100.0));
        assert!((crawler.path_distance() - 200.0).abs() < 1e-9);
        assert_eq!(crawler.anchored_version(), Some(b.version()));

        let off = EdgeCrawler::new(Point::new(95.0, 40.0), true, 1.5, &b);
        assert_eq!(off.position(), Point::new(100.0, 40.0));
        assert!((off.path_distance() - 140.0).abs() < 1e-9);
    }

    #[test]
    fn moves_forward_around_corners() {
        let b = square();
        let mut crawler = EdgeCrawler::new(Point::new(98.0, 0.0), true, 4.0, &b);
        crawler.update(&b);
        assert!(crawler.position().coincides(Point::new(100.0, 2.0), 1e-9));
    }

    #[test]
    fn wraps_backwards_past_the_origin() {
        let b = square();
        let mut crawler = EdgeCrawler::new(Point::new(1.0, 0.0), false, 3.0, &b);
        assert!(!crawler.is_forward());
        crawler.update(&b);
        assert!((crawler.path_distance() - 398.0).abs() < 1e-9);
        assert!(crawler.position().coincides(Point::new(0.0, 2.0), 1e-9));
    }

    #[test]
    fn stays_on_boundary_for_a_full_lap() {
        let b = square();
        let mut crawler = EdgeCrawler::new(Point::new(100.0, 100.0), true, 1.4, &b);
        for _ in 0..400 {
            crawler.update(&b);
            assert!(b.is_on_edge(crawler.position(), EDGE_TOLERANCE));
        }
    }

    #[test]
    fn re_anchors_after_boundary_rebuild() {
        let mut b = square();
        let mut crawler = EdgeCrawler::new(Point::new(75.0, 0.0), true, 1.0, &b);
        crawler.update(&b);
        // The top-right pocket is cut away; the crawler was inside it.
        b.replace(vec![
            Point::new(100.0, 50.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 50.0),
        ]);
        crawler.update(&b);
        assert_eq!(crawler.anchored_version(), Some(b.version()));
        assert!(b.is_on_edge(crawler.position(), EDGE_TOLERANCE));
    }

    #[test]
    fn degenerate_boundary_freezes_crawler() {
        let mut b = square();
        let mut crawler = EdgeCrawler::new(Point::new(0.0, 50.0), true, 2.0, &b);
        let p = Point::new(10.0, 10.0);
        b.replace(vec![p, p, p]);
        crawler.update(&b);
        let frozen = crawler.position();
        crawler.update(&b);
        assert_eq!(crawler.position(), frozen);
    }

    #[test]
    fn locate_maps_perimeter_to_last_edge() {
        let cache = EdgeLengthCache::build(&square());
        assert_eq!(cache.locate(0.0), 0);
        assert_eq!(cache.locate(99.9), 0);
        assert_eq!(cache.locate(100.0), 1);
        assert_eq!(cache.locate(400.0), 3);
    }
}
