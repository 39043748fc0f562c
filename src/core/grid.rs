//! Staggered background grid
//!
//! Dense `cols x rows` array of cells, row-major (`index = y * cols + x`).
//! Sample positions are in cell units: cell `(x, y)` covers
//! `[x, x + 1] x [y, y + 1]`, its X velocity sits at `(x, y + 0.5)` and its
//! Y velocity at `(x + 0.5, y)`.

use std::ops::{Index, IndexMut};

use bevy::prelude::*;

use crate::math::{Point, Real, Vector, clamp_point, lerp};

use super::cell::{Axis, Cell, Neighbor};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::zeroed(); cols * rows],
        }
    }

    /// Grid covering a simulation extent given in (possibly fractional) cells.
    /// Allocates `ceil(width) * ceil(height)` cells with no upper bound;
    /// `FluidSolver` rejects extents past `MAX_GRID_CELLS` before calling this.
    pub fn from_extent(width: Real, height: Real) -> Self {
        Self::new(cells_for_extent(width), cells_for_extent(height))
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Grid extent along X, in cells
    #[inline(always)]
    pub fn width(&self) -> Real {
        self.cols as Real
    }

    /// Grid extent along Y, in cells
    #[inline(always)]
    pub fn height(&self) -> Real {
        self.rows as Real
    }

    #[inline(always)]
    pub fn extent(&self) -> Vector {
        Vec2::new(self.width(), self.height())
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline(always)]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.cols && y < self.rows);
        y * self.cols + x
    }

    #[inline(always)]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.cols, index / self.cols)
    }

    #[inline(always)]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.cols && (y as usize) < self.rows
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Iterator over `((x, y), cell)` in flat index order
    pub fn iter_cells(&self) -> impl Iterator<Item = ((usize, usize), &Cell)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| ((index % cols, index / cols), cell))
    }

    /// Flat index of a forward neighbor, `None` past the max-X / max-Y edge
    #[inline]
    pub fn neighbor(&self, index: usize, neighbor: Neighbor) -> Option<usize> {
        if index >= self.cells.len() {
            return None;
        }
        let (x, y) = self.coords(index);
        let (dx, dy) = neighbor.offset();
        let (nx, ny) = (x + dx, y + dy);
        (nx < self.cols && ny < self.rows).then(|| ny * self.cols + nx)
    }

    /// True when all three forward neighbors exist
    pub fn has_all_neighbors(&self, x: usize, y: usize) -> bool {
        x + 1 < self.cols && y + 1 < self.rows
    }

    /// Change the cell counts, keeping values where old and new overlap
    pub fn resize(&mut self, cols: usize, rows: usize) {
        if cols == self.cols && rows == self.rows {
            return;
        }
        let mut cells = vec![Cell::zeroed(); cols * rows];
        for y in 0..rows.min(self.rows) {
            for x in 0..cols.min(self.cols) {
                cells[y * cols + x] = self.cells[y * self.cols + x];
            }
        }
        self.cols = cols;
        self.rows = rows;
        self.cells = cells;
    }

    /// Stored face velocity, or zero for a face outside the grid
    #[inline]
    pub fn face_velocity(&self, axis: Axis, x: i64, y: i64) -> Real {
        if self.contains(x, y) {
            self.cells[y as usize * self.cols + x as usize].velocity(axis)
        } else {
            0.0
        }
    }

    #[inline(always)]
    fn clamped_face_velocity(&self, axis: Axis, x: i64, y: i64) -> Real {
        let cx = x.clamp(0, self.cols as i64 - 1) as usize;
        let cy = y.clamp(0, self.rows as i64 - 1) as usize;
        self.cells[cy * self.cols + cx].velocity(axis)
    }

    /// Bilinear sample of one velocity component at a grid-space point.
    /// Samples outside the stored faces reuse the nearest edge value.
    pub fn sample_component(&self, axis: Axis, point: Point) -> Real {
        if self.is_empty() {
            return 0.0;
        }
        let (gx, gy) = match axis {
            Axis::X => (point.x, point.y - 0.5),
            Axis::Y => (point.x - 0.5, point.y),
        };
        let fx0 = gx.floor();
        let fy0 = gy.floor();
        let tx = gx - fx0;
        let ty = gy - fy0;
        let (i, j) = (fx0 as i64, fy0 as i64);

        let v00 = self.clamped_face_velocity(axis, i, j);
        let v10 = self.clamped_face_velocity(axis, i + 1, j);
        let v01 = self.clamped_face_velocity(axis, i, j + 1);
        let v11 = self.clamped_face_velocity(axis, i + 1, j + 1);

        lerp(lerp(v00, v10, tx), lerp(v01, v11, tx), ty)
    }

    /// Interpolated velocity at an arbitrary point. The point is clamped into
    /// `[0, width] x [0, height]` first; an empty grid or a non-finite point
    /// yields zero.
    pub fn velocity_at(&self, point: Point) -> Vector {
        if self.is_empty() || !point.is_finite() {
            return Vec2::ZERO;
        }
        let point = clamp_point(point, self.extent());
        Vec2::new(
            self.sample_component(Axis::X, point),
            self.sample_component(Axis::Y, point),
        )
    }

    /// Discrete divergence of the staggered field at cell `(x, y)`.
    /// Faces past the max-X / max-Y edge read as zero.
    pub fn divergence_at(&self, x: usize, y: usize) -> Real {
        let (x, y) = (x as i64, y as i64);
        (self.face_velocity(Axis::X, x + 1, y) - self.face_velocity(Axis::X, x, y))
            + (self.face_velocity(Axis::Y, x, y + 1) - self.face_velocity(Axis::Y, x, y))
    }

    /// Sum of absolute divergence over every cell
    pub fn total_abs_divergence(&self) -> Real {
        let mut total = 0.0;
        for y in 0..self.rows {
            for x in 0..self.cols {
                total += self.divergence_at(x, y).abs();
            }
        }
        total
    }

    /// Largest `sqrt(vx^2 + vy^2)` over the cells' face samples
    pub fn max_velocity_magnitude(&self) -> Real {
        self.cells
            .iter()
            .map(|cell| cell.face_velocities().length())
            .fold(0.0, Real::max)
    }

    pub fn commit_staged_velocities(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.commit_staged_vel();
        }
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = Cell;

    #[inline(always)]
    fn index(&self, (x, y): (usize, usize)) -> &Cell {
        &self.cells[Grid::index(self, x, y)]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    #[inline(always)]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Cell {
        let index = Grid::index(self, x, y);
        &mut self.cells[index]
    }
}

impl Index<usize> for Grid {
    type Output = Cell;

    #[inline(always)]
    fn index(&self, index: usize) -> &Cell {
        &self.cells[index]
    }
}

impl IndexMut<usize> for Grid {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }
}

#[inline]
fn cells_for_extent(extent: Real) -> usize {
    if extent.is_finite() && extent > 0.0 {
        extent.ceil() as usize
    } else {
        0
    }
}
