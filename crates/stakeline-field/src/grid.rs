//! Occupancy bookkeeping: the permanent `claimed` and `blocked` planes.
//!
//! Both planes are flat row-major [`Mask`]s sized to the field in whole
//! cells. `claimed` only ever grows; `blocked` is a superset of
//! `claimed` that additionally holds the one-cell padding drawn around
//! claimed territory and walked traces. `claimed_area` counts
//! unclaimed-to-claimed transitions, so it always equals the popcount
//! of `claimed`.

use crate::raster::{self, Cell, Mask};
use crate::types::{FieldRect, Point};

/// Padding, in cells, applied around claimed cells and walked traces
/// in the `blocked` plane.
pub const CLAIM_PADDING: i64 = 1;

/// Claimed/blocked occupancy planes over a field rectangle.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    rect: FieldRect,
    claimed: Mask,
    blocked: Mask,
    claimed_area: usize,
}

impl OccupancyGrid {
    /// Create an empty grid covering `rect`.
    ///
    /// The rectangle must already be validated (see
    /// [`FieldRect::validate`]); fractional dimensions are truncated to
    /// whole cells.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(rect: FieldRect) -> Self {
        let width = (rect.width as usize).max(1);
        let height = (rect.height as usize).max(1);
        Self {
            rect,
            claimed: Mask::new(width, height),
            blocked: Mask::new(width, height),
            claimed_area: 0,
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.claimed.width()
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.claimed.height()
    }

    /// The permanent claimed plane.
    #[must_use]
    pub const fn claimed(&self) -> &Mask {
        &self.claimed
    }

    /// The permanent blocked plane.
    #[must_use]
    pub const fn blocked(&self) -> &Mask {
        &self.blocked
    }

    /// Map a continuous field coordinate to the nearest in-bounds cell.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_local(&self, p: Point) -> Cell {
        let max_x = (self.width() - 1) as f64;
        let max_y = (self.height() - 1) as f64;
        let lx = (p.x - self.rect.x).round().clamp(0.0, max_x);
        let ly = (p.y - self.rect.y).round().clamp(0.0, max_y);
        (lx as usize, ly as usize)
    }

    /// Returns `true` if the cell under `p` is claimed.
    #[must_use]
    pub fn is_claimed(&self, p: Point) -> bool {
        self.claimed.get(self.to_local(p))
    }

    /// Returns `true` if the cell under `p` is blocked.
    #[must_use]
    pub fn is_blocked(&self, p: Point) -> bool {
        self.blocked.get(self.to_local(p))
    }

    /// Claim a single cell and pad it in the blocked plane.
    ///
    /// Returns `true` if the cell was newly claimed.
    pub fn claim_cell(&mut self, cell: Cell) -> bool {
        let newly = self.claimed.set(cell);
        if newly {
            self.claimed_area += 1;
        }
        #[allow(clippy::cast_possible_wrap)]
        let center = (cell.0 as i64, cell.1 as i64);
        raster::fill_square(&mut self.blocked, center, CLAIM_PADDING);
        newly
    }

    /// Claim the padded stroke of a walked path segment.
    ///
    /// Returns the number of newly claimed cells.
    pub fn claim_stroke(&mut self, from: Point, to: Point) -> usize {
        let (a, b) = (self.to_local(from), self.to_local(to));
        let newly = raster::stroke_line_padded(&mut self.claimed, a, b, CLAIM_PADDING).len();
        self.claimed_area += newly;
        raster::stroke_line_padded(&mut self.blocked, a, b, CLAIM_PADDING);
        newly
    }

    /// Running count of claimed cells.
    #[must_use]
    pub const fn claimed_area(&self) -> usize {
        self.claimed_area
    }

    /// Total number of cells.
    #[must_use]
    pub const fn total_area(&self) -> usize {
        self.width() * self.height()
    }

    /// Claimed share of the field in `[0, 100]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn claimed_percentage(&self) -> f64 {
        let total = self.total_area();
        if total == 0 {
            return 0.0;
        }
        self.claimed_area as f64 / total as f64 * 100.0
    }
}
