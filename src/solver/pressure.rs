//! Incompressibility projection
//!
//! Solves for a cell-centered pressure whose gradient cancels the divergence
//! of every FLUID cell, using Gauss-Seidel sweeps warm-started from the
//! pressure already stored in the grid. The correction is then pushed onto
//! face velocities: each FLUID cell subtracts `dt * p` from its own -X/-Y
//! faces and adds it to the faces it shares with its +X/+Y neighbors.
//!
//! A face is open when both cells on either side exist and neither is SOLID.
//! Closed faces are never corrected; whatever flux they carry, including the
//! stored -X/-Y wall faces of column 0 and row 0, is prescribed and enters the
//! right-hand side through `Grid::divergence_at`. EMPTY cells are passive and
//! hold `p = 0`.

use bevy::prelude::*;

use crate::core::{Axis, Grid, Neighbor};
use crate::math::{Real, inv_exact};

/// Outcome of one projection
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PressureReport {
    /// Gauss-Seidel sweeps performed
    pub iterations: u32,
    /// Largest divergence left in a FLUID cell once the correction is applied
    pub residual: Real,
    /// Whether `residual` reached the tolerance before the sweep cap
    pub converged: bool,
}

/// Up to four open faces of a cell: `(neighbor index, axis, face sign)`.
/// The sign is +1 for the forward (+X/+Y) faces and -1 for the backward ones.
struct Stencil {
    faces: [(usize, Axis, Real); 4],
    len: usize,
}

impl Stencil {
    fn of(grid: &Grid, index: usize) -> Self {
        let (x, y) = grid.coords(index);
        let cols = grid.cols();
        let mut stencil = Stencil {
            faces: [(0, Axis::X, 0.0); 4],
            len: 0,
        };

        if x > 0 {
            stencil.push(grid, index - 1, Axis::X, -1.0);
        }
        if y > 0 {
            stencil.push(grid, index - cols, Axis::Y, -1.0);
        }
        if let Some(n) = grid.neighbor(index, Neighbor::PosX) {
            stencil.push(grid, n, Axis::X, 1.0);
        }
        if let Some(n) = grid.neighbor(index, Neighbor::PosY) {
            stencil.push(grid, n, Axis::Y, 1.0);
        }
        stencil
    }

    #[inline]
    fn push(&mut self, grid: &Grid, neighbor: usize, axis: Axis, sign: Real) {
        if !grid[neighbor].is_solid() {
            self.faces[self.len] = (neighbor, axis, sign);
            self.len += 1;
        }
    }

    #[inline]
    fn iter(&self) -> impl Iterator<Item = &(usize, Axis, Real)> {
        self.faces[..self.len].iter()
    }
}

/// Divergence the projection cancels for a cell: the full discrete
/// divergence for FLUID cells, 0 for everything else.
pub fn fluid_divergence(grid: &Grid, index: usize) -> Real {
    if !grid[index].is_fluid() {
        return 0.0;
    }
    let (x, y) = grid.coords(index);
    grid.divergence_at(x, y)
}

#[inline]
fn neighbor_pressure(grid: &Grid, neighbor: usize) -> Real {
    let cell = &grid[neighbor];
    if cell.is_fluid() { cell.pressure } else { 0.0 }
}

/// Divergence a FLUID cell would keep after correcting with the current pressure
#[inline]
fn cell_residual(
    grid: &Grid,
    stencils: &[Stencil],
    divergence: &[Real],
    index: usize,
    dt: Real,
) -> Real {
    let pressure = grid[index].pressure;
    let mut laplacian = 0.0;
    for &(neighbor, _, _) in stencils[index].iter() {
        laplacian += neighbor_pressure(grid, neighbor) - pressure;
    }
    divergence[index] - dt * laplacian
}

fn max_residual(grid: &Grid, stencils: &[Stencil], divergence: &[Real], dt: Real) -> Real {
    (0..grid.len())
        .filter(|&index| grid[index].is_fluid())
        .map(|index| cell_residual(grid, stencils, divergence, index, dt).abs())
        .fold(0.0, Real::max)
}

/// Gauss-Seidel solve of `sum_n (p_n - p) = div / dt` over FLUID cells.
/// Writes the result into `Cell::pressure`; non-fluid cells end at 0.
pub fn solve_pressure(
    grid: &mut Grid,
    dt: Real,
    max_iterations: u32,
    tolerance: Real,
) -> PressureReport {
    if grid.is_empty() || !(dt > 0.0) || !dt.is_finite() {
        return PressureReport {
            converged: true,
            ..default()
        };
    }

    let stencils: Vec<Stencil> = (0..grid.len()).map(|index| Stencil::of(grid, index)).collect();
    let divergence: Vec<Real> = (0..grid.len())
        .map(|index| fluid_divergence(grid, index))
        .collect();
    let inv_dt = inv_exact(dt);

    for cell in grid.cells_mut() {
        if !cell.is_fluid() || !cell.pressure.is_finite() {
            cell.pressure = 0.0;
        }
    }

    let mut report = PressureReport {
        iterations: 0,
        residual: max_residual(grid, &stencils, &divergence, dt),
        converged: false,
    };

    while report.residual > tolerance && report.iterations < max_iterations {
        for index in 0..grid.len() {
            if !grid[index].is_fluid() {
                continue;
            }
            let stencil = &stencils[index];
            if stencil.len == 0 {
                grid[index].pressure = 0.0;
                continue;
            }
            let mut neighbor_sum = 0.0;
            for &(neighbor, _, _) in stencil.iter() {
                neighbor_sum += neighbor_pressure(grid, neighbor);
            }
            grid[index].pressure =
                (neighbor_sum - divergence[index] * inv_dt) / stencil.len as Real;
        }
        report.iterations += 1;
        report.residual = max_residual(grid, &stencils, &divergence, dt);
    }

    report.converged = report.residual <= tolerance;
    if !report.converged {
        debug!(
            "pressure solve stopped after {} sweeps with residual {:.3e}",
            report.iterations, report.residual
        );
    }
    report
}

/// Push each FLUID cell's pressure correction onto its open faces.
pub fn apply_pressure(grid: &mut Grid, dt: Real) {
    for index in 0..grid.len() {
        let cell = grid[index];
        if !cell.is_fluid() {
            continue;
        }
        let correction = dt * cell.pressure;
        for &(neighbor, axis, sign) in Stencil::of(grid, index).iter() {
            if sign > 0.0 {
                let face = grid[neighbor].velocity(axis);
                grid[neighbor].set_velocity(axis, face + correction);
            } else {
                let face = grid[index].velocity(axis);
                grid[index].set_velocity(axis, face - correction);
            }
        }
    }
}

/// Solve for pressure and apply the correction. Never fails: a solve that
/// hits its sweep cap still applies the best pressure it found.
pub fn project(
    grid: &mut Grid,
    dt: Real,
    max_iterations: u32,
    tolerance: Real,
) -> PressureReport {
    let report = solve_pressure(grid, dt, max_iterations, tolerance);
    if dt > 0.0 && dt.is_finite() {
        apply_pressure(grid, dt);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CellType;

    fn fluid_grid(cols: usize, rows: usize) -> Grid {
        let mut grid = Grid::new(cols, rows);
        for cell in grid.cells_mut() {
            cell.cell_type = CellType::Fluid;
        }
        grid
    }

    #[test]
    fn projection_reduces_total_divergence() {
        let mut grid = fluid_grid(4, 4);
        // Walls (x = 0 X faces, y = 0 Y faces) stay at zero.
        grid[(2, 1)].vel[0] = 1.0;
        grid[(1, 2)].vel[1] = -0.5;
        grid[(3, 3)].vel = [0.3, 0.8];
        grid[(1, 1)].vel = [0.6, -0.2];
        let before = grid.total_abs_divergence();
        assert!(before > 0.0);

        let report = project(&mut grid, 1.0 / 30.0, 200, 1e-5);
        let after = grid.total_abs_divergence();
        assert!(after < before, "divergence went from {before} to {after}");
        assert!(report.converged);
        assert!(after < 1e-3);
    }

    #[test]
    fn isolated_source_cell_pushes_shared_faces_against_its_divergence() {
        let mut grid = Grid::new(5, 5);
        grid[(2, 2)].cell_type = CellType::Fluid;
        grid[(3, 2)].vel[0] = 1.0;
        assert_eq!(grid.divergence_at(2, 2), 1.0);

        let dt = 0.1;
        let report = project(&mut grid, dt, 10, 1e-6);
        assert!(report.converged);

        // Pressure is negative, so the +X and +Y shared faces both drop.
        assert!(grid[(2, 2)].pressure < 0.0);
        assert!(grid[(3, 2)].vel[0] < 1.0);
        assert!(grid[(2, 3)].vel[1] < 0.0);
        assert!(grid.divergence_at(2, 2).abs() < 1e-5);
    }

    #[test]
    fn wall_flux_counts_toward_divergence() {
        let mut grid = fluid_grid(4, 4);
        // Inflow through the left wall, outflow through the bottom wall.
        grid[(0, 1)].vel[0] = 1.0;
        grid[(2, 0)].vel[1] = -1.0;
        grid[(1, 1)].vel = [1.0, -1.0];
        grid[(2, 0)].vel[0] = 0.9;
        let before = grid.total_abs_divergence();

        let report = project(&mut grid, 1.0 / 30.0, 200, 1e-5);
        let after = grid.total_abs_divergence();
        assert!(report.converged);
        assert!(after < before, "divergence went from {before} to {after}");
        assert!(after < 1e-3);
        // Wall faces are boundary data, not unknowns.
        assert_eq!(grid[(0, 1)].vel[0], 1.0);
        assert_eq!(grid[(2, 0)].vel[1], -1.0);
    }

    #[test]
    fn solid_faces_are_left_alone() {
        let mut grid = fluid_grid(3, 1);
        grid[(2, 0)].cell_type = CellType::Solid;
        grid[(0, 0)].vel[0] = 0.25;
        grid[(1, 0)].vel[0] = 0.5;
        grid[(2, 0)].vel[0] = 0.25;

        project(&mut grid, 0.5, 100, 1e-6);
        assert_eq!(grid[(0, 0)].vel[0], 0.25);
        assert_eq!(grid[(2, 0)].vel[0], 0.25);
        assert_eq!(grid[(2, 0)].pressure, 0.0);
        assert!((grid[(1, 0)].vel[0] - 0.25).abs() < 1e-5);
        assert!(fluid_divergence(&grid, 0).abs() < 1e-5);
        assert!(fluid_divergence(&grid, 1).abs() < 1e-5);
    }

    #[test]
    fn sweep_cap_is_a_soft_failure() {
        let mut grid = fluid_grid(16, 16);
        for (index, cell) in grid.cells_mut().iter_mut().enumerate() {
            cell.vel = [(index as f32 * 0.7).sin(), (index as f32 * 1.3).cos()];
        }
        let report = project(&mut grid, 1.0 / 30.0, 1, 1e-9);
        assert_eq!(report.iterations, 1);
        assert!(!report.converged);
        assert!(grid.cells().iter().all(|cell| cell.vel[0].is_finite()));
    }

    #[test]
    fn zero_dt_does_nothing() {
        let mut grid = fluid_grid(3, 3);
        grid[(1, 1)].vel = [1.0, 1.0];
        let before = grid.clone();
        let report = project(&mut grid, 0.0, 10, 1e-6);
        assert!(report.converged);
        assert_eq!(grid, before);
    }
}
