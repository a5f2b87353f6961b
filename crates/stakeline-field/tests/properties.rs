//! Property tests: claiming is monotonic and the boundary stays closed.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use stakeline_field::{
    EdgeCrawler, Field, FieldRect, Point,
    boundary::{EDGE_TOLERANCE, VERTEX_TOLERANCE},
};

const SIZE: f64 = 60.0;

/// Bottom-left corner: stays on the live side of every cut below.
const HOSTILE: Point = Point::new(3.0, 57.0);

fn field() -> Field {
    Field::new(FieldRect::new(0.0, 0.0, SIZE, SIZE).unwrap()).unwrap()
}

fn incursion(field: &mut Field, points: &[Point]) {
    field.start_incursion(points[0]);
    for &p in &points[1..] {
        field.add_to_incursion(p);
    }
}

fn boundary_is_closed(field: &Field) -> bool {
    let vertices = field.boundary().vertices();
    vertices.len() >= 3
        && vertices.iter().enumerate().all(|(i, v)| {
            let next = vertices[(i + 1) % vertices.len()];
            !v.coincides(next, VERTEX_TOLERANCE) && field.rect().contains(*v)
        })
}

proptest! {
    /// Property: two successive corner cuts only ever grow the claimed
    /// area, keep the running count exact, and leave a closed boundary.
    #[test]
    fn prop_claiming_is_monotonic(
        x1 in 15u32..50,
        y1 in 5u32..45,
        x2_raw in 5u32..45,
        y2 in 5u32..50,
    ) {
        let (x1, y1, y2) = (f64::from(x1), f64::from(y1), f64::from(y2));
        let x2 = f64::from(x2_raw).min(x1 - 5.0);
        let mut f = field();
        let total = f.grid().total_area();

        // Top-right pocket.
        incursion(&mut f, &[Point::new(x1, 0.0), Point::new(x1, y1), Point::new(SIZE, y1)]);
        let first = f.complete_incursion(Some(HOSTILE)).unwrap();
        let after_first = f.grid().claimed_area();
        prop_assert!(after_first > 0);
        prop_assert!(after_first <= total);
        prop_assert_eq!(after_first, f.grid().claimed().count());
        prop_assert_eq!(first.boundary_version, 2);
        prop_assert!(boundary_is_closed(&f));

        // Top-left pocket.
        incursion(&mut f, &[Point::new(0.0, y2), Point::new(x2, y2), Point::new(x2, 0.0)]);
        let second = f.complete_incursion(Some(HOSTILE)).unwrap();
        let after_second = f.grid().claimed_area();
        prop_assert!(after_second > after_first);
        prop_assert!(after_second <= total);
        prop_assert_eq!(after_second, f.grid().claimed().count());
        prop_assert!(second.claimed_percentage >= first.claimed_percentage);
        prop_assert!(second.claimed_percentage <= 100.0);
        prop_assert!(boundary_is_closed(&f));
        prop_assert!(!f.is_point_claimed(HOSTILE));
    }

    /// Property: a failed claim changes nothing.
    #[test]
    fn prop_failed_claim_is_a_no_op(x1 in 15u32..50, y1 in 5u32..45) {
        let (x1, y1) = (f64::from(x1), f64::from(y1));
        let mut f = field();
        // Ends in open field, not on the boundary.
        incursion(&mut f, &[Point::new(x1, 0.0), Point::new(x1, y1)]);
        prop_assert!(f.complete_incursion(Some(HOSTILE)).is_err());
        prop_assert_eq!(f.grid().claimed_area(), 0);
        prop_assert_eq!(f.boundary().version(), 1);
    }

    /// Property: after a rebuild, a crawler's next position lies on the
    /// new boundary wherever it was patrolling before.
    #[test]
    fn prop_crawler_lands_on_rebuilt_boundary(
        start in 0.0f64..240.0,
        forward in any::<bool>(),
        x1 in 15u32..50,
        y1 in 5u32..45,
    ) {
        let (x1, y1) = (f64::from(x1), f64::from(y1));
        let mut f = field();
        let origin = perimeter_point(start);
        let mut crawler = EdgeCrawler::new(origin, forward, 1.4, f.boundary());

        incursion(&mut f, &[Point::new(x1, 0.0), Point::new(x1, y1), Point::new(SIZE, y1)]);
        f.complete_incursion(Some(HOSTILE)).unwrap();

        crawler.update(f.boundary());
        prop_assert!(f.boundary().is_on_edge(crawler.position(), EDGE_TOLERANCE));
        prop_assert_eq!(crawler.anchored_version(), Some(f.boundary().version()));
    }
}

/// The point `distance` along the initial square's perimeter, clockwise
/// from the top-left corner.
fn perimeter_point(distance: f64) -> Point {
    let d = distance.rem_euclid(4.0 * SIZE);
    if d < SIZE {
        Point::new(d, 0.0)
    } else if d < 2.0 * SIZE {
        Point::new(SIZE, d - SIZE)
    } else if d < 3.0 * SIZE {
        Point::new(3.0f64.mul_add(SIZE, -d), SIZE)
    } else {
        Point::new(0.0, 4.0f64.mul_add(SIZE, -d))
    }
}
