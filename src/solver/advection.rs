//! Semi-Lagrangian velocity advection
//!
//! Every face sample is traced backwards through the current field and the
//! value found there is staged. Reads always see the pre-advection field;
//! nothing changes until the staged values are committed.

use bevy::prelude::*;

use crate::core::{Axis, Grid};
use crate::math::{Point, Real, clamp_point};

/// Stage the advected value of every face velocity. `vel` is left untouched.
pub fn stage_advected_velocity(grid: &mut Grid, dt: Real) {
    let extent = grid.extent();
    for y in 0..grid.rows() {
        for x in 0..grid.cols() {
            let (fx, fy) = (x as Real, y as Real);
            let u = trace_back(grid, Axis::X, Vec2::new(fx, fy + 0.5), dt, extent);
            let v = trace_back(grid, Axis::Y, Vec2::new(fx + 0.5, fy), dt, extent);

            let cell = &mut grid[(x, y)];
            cell.stage_velocity(Axis::X, u);
            cell.stage_velocity(Axis::Y, v);
        }
    }
}

/// Stage and commit in one call
pub fn advect_velocity(grid: &mut Grid, dt: Real) {
    stage_advected_velocity(grid, dt);
    grid.commit_staged_velocities();
}

#[inline]
fn trace_back(grid: &Grid, axis: Axis, face: Point, dt: Real, extent: Vec2) -> Real {
    let source = clamp_point(face - grid.velocity_at(face) * dt, extent);
    grid.sample_component(axis, source)
}
