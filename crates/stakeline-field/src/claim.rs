//! Claim resolution: decide which cells a completed trace encloses and
//! commit them.
//!
//! Resolution runs in two phases. The *resolve* phase is read-only: it
//! rasterizes the boundary and the trace into a scratch mask seeded
//! from the permanent `claimed` plane, flood-fills from the hostile's
//! cell, collects every cell that is neither blocked nor reachable, and
//! computes the split boundary. Only when all of that succeeds does the
//! *commit* phase touch the [`OccupancyGrid`] and [`BoundaryPolygon`],
//! so a failed claim leaves both exactly as they were.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::boundary::BoundaryPolygon;
use crate::grid::OccupancyGrid;
use crate::raster::{self, Cell};
use crate::types::Point;

/// Why a completed trace failed to claim anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ClaimError {
    /// The trace has fewer than two points.
    #[error("incursion trace has fewer than two points")]
    TraceTooShort,

    /// No reference (hostile) position was supplied.
    #[error("no reference position supplied")]
    MissingReference,

    /// The trace's final point is not on the boundary.
    #[error("incursion does not end on the boundary")]
    EndpointOffBoundary,

    /// The reference point sits on a blocked cell.
    #[error("reference position lies in blocked territory")]
    ReferenceBlocked,

    /// Every unblocked cell is reachable from the reference point.
    #[error("incursion encloses no new area")]
    NothingEnclosed,

    /// The boundary could not be split along the trace.
    #[error("boundary could not be split along the incursion")]
    BoundarySplit,
}

/// Diagnostics for a successful claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimReport {
    /// Enclosed cells that became claimed.
    pub enclosed_cells: usize,
    /// Cells claimed by the padded stroke of the trace itself.
    pub stroke_cells: usize,
    /// Cells the hostile can still reach.
    pub reachable_cells: usize,
    /// Claimed share of the field after the claim, in `[0, 100]`.
    pub claimed_percentage: f64,
    /// Vertex count of the rebuilt boundary.
    pub boundary_vertices: usize,
    /// Boundary version after the rebuild.
    pub boundary_version: u64,
    /// Wall-clock time spent resolving and committing.
    #[serde(with = "crate::duration_millis")]
    pub duration: Duration,
}

/// Outcome of the read-only resolve phase.
struct Resolution {
    enclosed: Vec<Cell>,
    reachable_cells: usize,
    boundary: Vec<Point>,
}

/// Resolve and commit a claim for `trace` against the hostile position
/// `reference`.
///
/// The caller is responsible for the trigger conditions (trace length,
/// endpoint on boundary, reference present); this function performs
/// the raster resolution and the boundary split.
///
/// # Errors
///
/// Returns [`ClaimError::ReferenceBlocked`] if the reference cell is
/// blocked, [`ClaimError::NothingEnclosed`] if the trace encloses no
/// new cells, and [`ClaimError::BoundarySplit`] if the boundary cannot
/// be split along the trace. On error neither `grid` nor `boundary`
/// is modified.
pub fn claim(
    grid: &mut OccupancyGrid,
    boundary: &mut BoundaryPolygon,
    trace: &[Point],
    reference: Point,
) -> Result<ClaimReport, ClaimError> {
    let started = Instant::now();
    let resolution = resolve(grid, boundary, trace, reference)?;

    let mut enclosed_cells = 0;
    for &cell in &resolution.enclosed {
        if grid.claim_cell(cell) {
            enclosed_cells += 1;
        }
    }
    let stroke_cells = trace
        .windows(2)
        .map(|pair| grid.claim_stroke(pair[0], pair[1]))
        .sum();
    boundary.replace(resolution.boundary);

    Ok(ClaimReport {
        enclosed_cells,
        stroke_cells,
        reachable_cells: resolution.reachable_cells,
        claimed_percentage: grid.claimed_percentage(),
        boundary_vertices: boundary.vertices().len(),
        boundary_version: boundary.version(),
        duration: started.elapsed(),
    })
}

/// Read-only resolve phase.
fn resolve(
    grid: &OccupancyGrid,
    boundary: &BoundaryPolygon,
    trace: &[Point],
    reference: Point,
) -> Result<Resolution, ClaimError> {
    let mut scratch = grid.claimed().clone();
    for edge in boundary.edges() {
        raster::stroke_line(&mut scratch, grid.to_local(edge.start), grid.to_local(edge.end));
    }
    for pair in trace.windows(2) {
        raster::stroke_line(&mut scratch, grid.to_local(pair[0]), grid.to_local(pair[1]));
    }

    let seed = grid.to_local(reference);
    if scratch.get(seed) {
        return Err(ClaimError::ReferenceBlocked);
    }

    let reachable = raster::flood_fill(&scratch, seed);
    let enclosed: Vec<Cell> = scratch
        .iter()
        .filter(|&(cell, blocked)| !blocked && !reachable.get(cell))
        .map(|(cell, _)| cell)
        .collect();
    if enclosed.is_empty() {
        return Err(ClaimError::NothingEnclosed);
    }

    let boundary = boundary
        .split(trace, reference)
        .ok_or(ClaimError::BoundarySplit)?;

    Ok(Resolution {
        enclosed,
        reachable_cells: reachable.count(),
        boundary,
    })
}
