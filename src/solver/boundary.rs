//! Closed-box domain boundary
//!
//! The left and bottom walls are the -X faces of column 0 and the -Y faces of
//! row 0. The top row and right column become SOLID wall cells with both of
//! their face velocities zeroed, so no face on the domain edge carries flux.

use crate::core::{CellType, Grid};

pub fn enforce_boundaries(grid: &mut Grid) {
    if grid.is_empty() {
        return;
    }
    let cols = grid.cols();
    let rows = grid.rows();

    for col in 0..cols {
        grid[(col, 0)].vel[1] = 0.0;

        let top = &mut grid[(col, rows - 1)];
        top.vel = [0.0, 0.0];
        top.cell_type = CellType::Solid;
    }

    for row in 0..rows {
        grid[(0, row)].vel[0] = 0.0;

        let right = &mut grid[(cols - 1, row)];
        right.vel = [0.0, 0.0];
        right.cell_type = CellType::Solid;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(cols: usize, rows: usize) -> Grid {
        let mut grid = Grid::new(cols, rows);
        for cell in grid.cells_mut() {
            cell.vel = [1.5, -2.5];
            cell.cell_type = CellType::Fluid;
        }
        grid
    }

    #[test]
    fn edge_faces_carry_no_flux() {
        for (cols, rows) in [(1, 1), (2, 3), (4, 4), (7, 2)] {
            let mut grid = filled(cols, rows);
            enforce_boundaries(&mut grid);

            for x in 0..cols {
                assert_eq!(grid[(x, 0)].vel[1], 0.0);
                assert_eq!(grid[(x, rows - 1)].vel, [0.0, 0.0]);
                assert!(grid[(x, rows - 1)].is_solid());
            }
            for y in 0..rows {
                assert_eq!(grid[(0, y)].vel[0], 0.0);
                assert_eq!(grid[(cols - 1, y)].vel, [0.0, 0.0]);
                assert!(grid[(cols - 1, y)].is_solid());
            }
        }
    }

    #[test]
    fn interior_is_untouched() {
        let mut grid = filled(4, 4);
        enforce_boundaries(&mut grid);
        assert_eq!(grid[(1, 1)].vel, [1.5, 0.0]);
        assert_eq!(grid[(2, 2)].vel, [1.5, -2.5]);
        assert!(grid[(2, 2)].is_fluid());
        // Left column and bottom row stay fluid; only their wall faces close.
        assert!(grid[(0, 1)].is_fluid());
        assert!(grid[(1, 0)].is_fluid());
    }

    #[test]
    fn empty_grid_is_a_no_op() {
        let mut grid = Grid::new(0, 3);
        enforce_boundaries(&mut grid);
        assert!(grid.is_empty());
    }
}
