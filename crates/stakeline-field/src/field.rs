//! The playfield: rectangle, occupancy, live boundary and the active
//! incursion, behind one query/mutation interface.

use crate::boundary::{BoundaryPolygon, EDGE_TOLERANCE};
use crate::claim::{self, ClaimError, ClaimReport};
use crate::grid::OccupancyGrid;
use crate::incursion::IncursionTrace;
use crate::types::{FieldError, FieldRect, Point};

/// One level's playfield.
///
/// Owns the [`OccupancyGrid`], the [`BoundaryPolygon`] and the active
/// [`IncursionTrace`]. Entities never hold on to a field; they receive
/// it as an argument on every update.
#[derive(Debug, Clone)]
pub struct Field {
    rect: FieldRect,
    grid: OccupancyGrid,
    boundary: BoundaryPolygon,
    incursion: IncursionTrace,
    incursion_warning: bool,
}

impl Field {
    /// Create a field over `rect` with nothing claimed.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidDimensions`] if the rectangle is
    /// malformed.
    pub fn new(rect: FieldRect) -> Result<Self, FieldError> {
        rect.validate()?;
        Ok(Self {
            rect,
            grid: OccupancyGrid::new(rect),
            boundary: BoundaryPolygon::from_rect(&rect),
            incursion: IncursionTrace::default(),
            incursion_warning: false,
        })
    }

    /// The field rectangle.
    #[must_use]
    pub const fn rect(&self) -> &FieldRect {
        &self.rect
    }

    /// The occupancy planes.
    #[must_use]
    pub const fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// The live boundary polygon.
    #[must_use]
    pub const fn boundary(&self) -> &BoundaryPolygon {
        &self.boundary
    }

    /// Points of the active incursion (empty when none).
    #[must_use]
    pub fn incursion(&self) -> &[Point] {
        self.incursion.points()
    }

    /// Returns `true` while an incursion trace exists.
    #[must_use]
    pub fn is_incursion_active(&self) -> bool {
        !self.incursion.is_empty()
    }

    /// Returns `true` if `p` is within the default edge tolerance of
    /// the live boundary.
    #[must_use]
    pub fn is_point_on_edge(&self, p: Point) -> bool {
        self.boundary.is_on_edge(p, EDGE_TOLERANCE)
    }

    /// Returns `true` if `p` lies inside (or on) the field rectangle.
    #[must_use]
    pub fn is_point_within_bounds(&self, p: Point) -> bool {
        self.rect.contains(p)
    }

    /// Returns `true` if `p` is inside the field and its cell is claimed.
    #[must_use]
    pub fn is_point_claimed(&self, p: Point) -> bool {
        self.is_point_within_bounds(p) && self.grid.is_claimed(p)
    }

    /// Returns `true` if `p` is open field: within bounds, off the
    /// boundary and not blocked.
    #[must_use]
    pub fn is_point_in_unclaimed_area(&self, p: Point) -> bool {
        self.is_point_within_bounds(p) && !self.is_point_on_edge(p) && !self.grid.is_blocked(p)
    }

    /// The nearest point on the live boundary.
    #[must_use]
    pub fn snap_to_edge(&self, p: Point) -> Point {
        self.boundary.snap(p)
    }

    /// Begin an incursion at the boundary point nearest `p`.
    ///
    /// Returns the snapped start point.
    pub fn start_incursion(&mut self, p: Point) -> Point {
        let snapped = self.snap_to_edge(p);
        self.incursion.start(snapped);
        snapped
    }

    /// Extend the active incursion with `p`.
    pub fn add_to_incursion(&mut self, p: Point) {
        self.incursion.push(p);
    }

    /// Discard the active incursion, returning its start point.
    pub fn cancel_incursion(&mut self) -> Option<Point> {
        self.incursion.cancel()
    }

    /// Try to close the active incursion and claim what it encloses.
    ///
    /// `reference` is the free-roaming hostile's position; the side of
    /// the split containing it stays unclaimed. The trace is discarded
    /// whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns a [`ClaimError`] describing why nothing was claimed. On
    /// error the occupancy planes and the boundary are unchanged.
    pub fn complete_incursion(
        &mut self,
        reference: Option<Point>,
    ) -> Result<ClaimReport, ClaimError> {
        let trace = self.incursion.take();
        if trace.len() < 2 {
            return Err(ClaimError::TraceTooShort);
        }
        let reference = reference.ok_or(ClaimError::MissingReference)?;
        let end = trace[trace.len() - 1];
        if !self.is_point_on_edge(end) {
            return Err(ClaimError::EndpointOffBoundary);
        }

        let report = claim::claim(&mut self.grid, &mut self.boundary, &trace, reference)?;
        log::info!(
            "claimed {} cells ({} stroke), field {:.1}% claimed, boundary v{} with {} vertices",
            report.enclosed_cells,
            report.stroke_cells,
            report.claimed_percentage,
            report.boundary_version,
            report.boundary_vertices,
        );
        Ok(report)
    }

    /// Returns `true` if `p` is within `threshold` of the active trace,
    /// ignoring the `skip_tail_segments` most recent segments.
    #[must_use]
    pub fn check_incursion_collision(
        &self,
        p: Point,
        threshold: f64,
        skip_tail_segments: usize,
    ) -> bool {
        self.incursion.collides(p, threshold, skip_tail_segments)
    }

    /// Claimed share of the field in `[0, 100]`.
    #[must_use]
    pub fn claimed_percentage(&self) -> f64 {
        self.grid.claimed_percentage()
    }

    /// Raise or clear the idle warning shown on the trace.
    pub fn set_incursion_warning(&mut self, active: bool) {
        self.incursion_warning = active;
    }

    /// Whether the idle warning is raised.
    #[must_use]
    pub const fn incursion_warning(&self) -> bool {
        self.incursion_warning
    }
}
