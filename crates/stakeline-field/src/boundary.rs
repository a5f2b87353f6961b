//! The live boundary polygon and its split after a completed incursion.
//!
//! The polygon is an ordered vertex ring (the last vertex implicitly
//! connects back to the first). Every structural change recomputes the
//! edge list and bumps [`BoundaryPolygon::version`], which is what
//! boundary-following entities key their caches on.

use crate::types::{Axis, FieldRect, Point, Segment};

/// Default distance within which a point counts as "on the edge".
pub const EDGE_TOLERANCE: f64 = 3.0;

/// Two vertices closer than this on both axes are the same vertex.
pub const VERTEX_TOLERANCE: f64 = 0.1;

/// Boundary-coincidence tolerance for the point-in-polygon test used
/// when choosing which side of a split stays live.
pub const CONTAINMENT_TOLERANCE: f64 = 0.5;

/// Nearest point of the boundary to some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Index into [`BoundaryPolygon::edges`].
    pub edge_index: usize,
    /// Parametric position along the edge in `[0, 1]`.
    pub t: f64,
    /// The projected point on the edge.
    pub point: Point,
    /// Distance from the query point to `point`.
    pub distance: f64,
}

/// Ordered vertex loop delimiting the live (unclaimed) playfield.
#[derive(Debug, Clone)]
pub struct BoundaryPolygon {
    vertices: Vec<Point>,
    edges: Vec<Segment>,
    version: u64,
}

impl BoundaryPolygon {
    /// The initial boundary: the rectangle's four corners.
    #[must_use]
    pub fn from_rect(rect: &FieldRect) -> Self {
        let mut polygon = Self {
            vertices: rect.corners().to_vec(),
            edges: Vec::new(),
            version: 0,
        };
        polygon.rebuild_edges();
        polygon
    }

    /// The vertex ring.
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Edges in ring order; edge `i` runs from vertex `i` to vertex `i + 1`.
    #[must_use]
    pub fn edges(&self) -> &[Segment] {
        &self.edges
    }

    /// Structural version, bumped on every vertex-set change.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Total edge length.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.edges.iter().map(Segment::length).sum()
    }

    /// Replace the vertex ring and bump the version.
    pub fn replace(&mut self, vertices: Vec<Point>) {
        self.vertices = vertices;
        self.rebuild_edges();
    }

    fn rebuild_edges(&mut self) {
        let n = self.vertices.len();
        self.edges = (0..n)
            .map(|i| Segment::new(self.vertices[i], self.vertices[(i + 1) % n]))
            .collect();
        self.version += 1;
    }

    /// Returns `true` if `p` lies within `tolerance` of any edge.
    ///
    /// Axis-aligned edges use a fast perpendicular test restricted to
    /// the edge's span; other edges use the clamped point-to-segment
    /// distance.
    #[must_use]
    pub fn is_on_edge(&self, p: Point, tolerance: f64) -> bool {
        self.edges.iter().any(|edge| {
            let (a, b) = (edge.start, edge.end);
            if edge.is_vertical() {
                (p.x - a.x).abs() < tolerance && a.y.min(b.y) <= p.y && p.y <= a.y.max(b.y)
            } else if edge.is_horizontal() {
                (p.y - a.y).abs() < tolerance && a.x.min(b.x) <= p.x && p.x <= a.x.max(b.x)
            } else {
                edge.distance_to(p) < tolerance
            }
        })
    }

    /// The globally closest point of the boundary to `p`.
    ///
    /// Zero-length edges are skipped. Returns `None` only if every edge
    /// is degenerate.
    #[must_use]
    pub fn nearest(&self, p: Point) -> Option<Anchor> {
        let mut best: Option<Anchor> = None;
        for (edge_index, edge) in self.edges.iter().enumerate() {
            let Some((t, point)) = edge.project(p) else {
                continue;
            };
            let distance = point.distance(p);
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(Anchor {
                    edge_index,
                    t,
                    point,
                    distance,
                });
            }
        }
        best
    }

    /// Project `p` onto the nearest boundary point.
    #[must_use]
    pub fn snap(&self, p: Point) -> Point {
        self.nearest(p).map_or(p, |anchor| anchor.point)
    }

    /// Orientation of the axis-aligned edges within `tolerance` of `p`.
    ///
    /// Returns `None` when no axis-aligned edge is near, or when both a
    /// horizontal and a vertical edge are (a corner).
    #[must_use]
    pub fn axis_near(&self, p: Point, tolerance: f64) -> Option<Axis> {
        let mut horizontal = false;
        let mut vertical = false;
        for edge in &self.edges {
            if edge.is_degenerate() || edge.distance_to(p) > tolerance {
                continue;
            }
            if edge.is_horizontal() {
                horizontal = true;
            } else if edge.is_vertical() {
                vertical = true;
            }
        }
        match (horizontal, vertical) {
            (true, false) => Some(Axis::Horizontal),
            (false, true) => Some(Axis::Vertical),
            _ => None,
        }
    }

    /// Compute the live boundary after a trace from `trace[0]` to
    /// `trace[last]` splits the polygon.
    ///
    /// Both trace endpoints are spliced into the ring (if not already
    /// vertices), the ring is cut into the two arcs between them, and
    /// each arc is closed with the trace. The candidate containing
    /// `reference` (the hostile) is simplified and returned.
    ///
    /// Returns `None` if either endpoint is not on the boundary or the
    /// result would have fewer than three vertices. `self` is not
    /// modified.
    #[must_use]
    pub fn split(&self, trace: &[Point], reference: Point) -> Option<Vec<Point>> {
        let (&start, &end) = (trace.first()?, trace.last()?);
        if trace.len() < 2 {
            return None;
        }

        let mut ring = self.vertices.clone();
        ensure_vertex(&mut ring, start)?;
        ensure_vertex(&mut ring, end)?;
        let start_idx = find_vertex(&ring, start)?;
        let end_idx = find_vertex(&ring, end)?;

        let mut poly1 = arc(&ring, start_idx, end_idx);
        poly1.extend(trace.iter().rev().skip(1));
        let mut poly2 = arc(&ring, end_idx, start_idx);
        poly2.extend(trace.iter().skip(1));

        let chosen = if point_in_polygon(reference, &poly1, CONTAINMENT_TOLERANCE) {
            poly1
        } else {
            poly2
        };
        let simplified = simplify_ring(&chosen);
        (simplified.len() >= 3).then_some(simplified)
    }
}

/// Index of the vertex coinciding with `p`, if any.
fn find_vertex(ring: &[Point], p: Point) -> Option<usize> {
    ring.iter().position(|v| v.coincides(p, VERTEX_TOLERANCE))
}

/// Make `p` a vertex of `ring`, splicing it after the start vertex of
/// the edge it lies on. Returns its index.
fn ensure_vertex(ring: &mut Vec<Point>, p: Point) -> Option<usize> {
    if let Some(idx) = find_vertex(ring, p) {
        return Some(idx);
    }
    let n = ring.len();
    let edge_idx =
        (0..n).find(|&i| Segment::new(ring[i], ring[(i + 1) % n]).contains(p, VERTEX_TOLERANCE))?;
    ring.insert(edge_idx + 1, p);
    Some(edge_idx + 1)
}

/// Walk the ring forward from `from` to `to`, both inclusive.
fn arc(ring: &[Point], from: usize, to: usize) -> Vec<Point> {
    let mut out = Vec::new();
    let mut idx = from;
    loop {
        out.push(ring[idx]);
        if idx == to {
            break;
        }
        idx = (idx + 1) % ring.len();
    }
    out
}

/// Ray-casting point-in-polygon test.
///
/// Points within `tolerance` of any polygon edge count as inside.
/// Polygons with fewer than three vertices contain nothing.
#[must_use]
pub fn point_in_polygon(p: Point, polygon: &[Point], tolerance: f64) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        if Segment::new(a, b).contains(p, tolerance) {
            return true;
        }
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Drop consecutive duplicate vertices and a trailing vertex that
/// closes the ring onto the first.
#[must_use]
pub fn simplify_ring(path: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(path.len());
    for &p in path {
        if out.last().is_none_or(|last| !last.coincides(p, VERTEX_TOLERANCE)) {
            out.push(p);
        }
    }
    if out.len() > 1 && out[0].coincides(out[out.len() - 1], VERTEX_TOLERANCE) {
        out.pop();
    }
    out
}
