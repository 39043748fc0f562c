use crate::core::Grid;
use crate::math::{Real, Vector};

/// Add a spatially uniform acceleration to every face velocity.
pub fn apply_body_force(grid: &mut Grid, force: Vector, dt: Real) {
    let delta = force * dt;
    for cell in grid.cells_mut() {
        cell.vel[0] += delta.x;
        cell.vel[1] += delta.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::Vec2;

    #[test]
    fn gravity_is_scaled_by_dt() {
        let mut grid = Grid::new(2, 2);
        grid[(1, 1)].vel = [1.0, 1.0];
        apply_body_force(&mut grid, Vec2::new(0.0, -0.098), 0.5);
        assert_eq!(grid[(0, 0)].vel, [0.0, -0.049]);
        assert_eq!(grid[(1, 1)].vel, [1.0, 1.0 - 0.049]);
    }
}
