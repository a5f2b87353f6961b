//! Raster primitives: boolean cell masks, Bresenham line stepping and
//! 4-connected flood fill.
//!
//! All coordinates here are integer cell indices in the field's local
//! frame (`0..width`, `0..height`). Conversion from continuous field
//! coordinates lives in [`crate::grid`].

use std::collections::VecDeque;

use imageproc::drawing::BresenhamLineIter;

/// An integer cell coordinate `(x, y)`.
pub type Cell = (usize, usize);

/// A flat, row-major boolean plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Mask {
    /// Create an all-clear mask.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Mask width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Mask height in cells.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    const fn index(&self, (x, y): Cell) -> usize {
        y * self.width + x
    }

    /// Returns `true` if `(x, y)` lies inside the mask.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub const fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Read a cell. Out-of-range cells read as clear.
    #[must_use]
    pub fn get(&self, cell: Cell) -> bool {
        if cell.0 >= self.width || cell.1 >= self.height {
            return false;
        }
        self.cells[self.index(cell)]
    }

    /// Set a cell. Returns `true` if the cell was previously clear.
    /// Out-of-range cells are ignored.
    pub fn set(&mut self, cell: Cell) -> bool {
        if cell.0 >= self.width || cell.1 >= self.height {
            return false;
        }
        let idx = self.index(cell);
        let was_clear = !self.cells[idx];
        self.cells[idx] = true;
        was_clear
    }

    /// Set a signed coordinate if it falls inside the mask.
    #[allow(clippy::cast_sign_loss)]
    pub fn set_signed(&mut self, x: i64, y: i64) -> bool {
        if self.in_bounds(x, y) {
            self.set((x as usize, y as usize))
        } else {
            false
        }
    }

    /// Number of set cells.
    #[must_use]
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Iterate over all cells in row-major order with their state.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, bool)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| ((i % self.width, i / self.width), c))
    }
}

/// Cells of the integer line from `from` to `to`, both endpoints
/// included.
///
/// Stepping is Bresenham's, so every yielded cell is touched by the
/// line and there is no anti-aliasing. The walk may run from either end.
#[allow(clippy::cast_precision_loss)]
pub fn line_cells(from: Cell, to: Cell) -> impl Iterator<Item = (i64, i64)> {
    BresenhamLineIter::new((from.0 as f32, from.1 as f32), (to.0 as f32, to.1 as f32))
        .map(|(x, y)| (i64::from(x), i64::from(y)))
}

/// Mark every cell a line from `from` to `to` touches.
pub fn stroke_line(mask: &mut Mask, from: Cell, to: Cell) {
    for (x, y) in line_cells(from, to) {
        mask.set_signed(x, y);
    }
}

/// Mark every cell within `padding` cells (Chebyshev distance) of the
/// line from `from` to `to`. Returns the newly set cells.
pub fn stroke_line_padded(mask: &mut Mask, from: Cell, to: Cell, padding: i64) -> Vec<Cell> {
    let mut newly_set = Vec::new();
    for (x, y) in line_cells(from, to) {
        newly_set.extend(fill_square(mask, (x, y), padding));
    }
    newly_set
}

/// Mark the square of side `2 * padding + 1` centered on `center`.
/// Returns the cells that were clear before.
#[allow(clippy::cast_sign_loss)]
pub fn fill_square(mask: &mut Mask, center: (i64, i64), padding: i64) -> Vec<Cell> {
    let mut newly_set = Vec::new();
    for py in (center.1 - padding)..=(center.1 + padding) {
        for px in (center.0 - padding)..=(center.0 + padding) {
            if mask.set_signed(px, py) {
                newly_set.push((px as usize, py as usize));
            }
        }
    }
    newly_set
}

/// 4-connected breadth-first flood fill.
///
/// Starting at `seed`, visits every cell reachable without crossing a
/// set cell of `blocked`. Returns the visited cells as a mask. A blocked
/// or out-of-range seed visits nothing.
#[must_use]
pub fn flood_fill(blocked: &Mask, seed: Cell) -> Mask {
    let mut visited = Mask::new(blocked.width(), blocked.height());
    if seed.0 >= blocked.width() || seed.1 >= blocked.height() || blocked.get(seed) {
        return visited;
    }

    let mut queue = VecDeque::new();
    visited.set(seed);
    queue.push_back(seed);

    while let Some((x, y)) = queue.pop_front() {
        let neighbors = [
            (x.checked_add(1), Some(y)),
            (x.checked_sub(1), Some(y)),
            (Some(x), y.checked_add(1)),
            (Some(x), y.checked_sub(1)),
        ];
        for (nx, ny) in neighbors {
            let (Some(nx), Some(ny)) = (nx, ny) else {
                continue;
            };
            if nx >= blocked.width() || ny >= blocked.height() {
                continue;
            }
            let neighbor = (nx, ny);
            if blocked.get(neighbor) || visited.get(neighbor) {
                continue;
            }
            visited.set(neighbor);
            queue.push_back(neighbor);
        }
    }

    visited
}
