//! Tracer advection
//!
//! Forward Euler through the projected velocity field.

use crate::core::{Grid, ParticleSet};
use crate::math::{Real, clamp_point};

pub fn advect_particles(particles: &mut ParticleSet, grid: &Grid, dt: Real, clamp_to_domain: bool) {
    let extent = grid.extent();
    for position in particles.iter_mut() {
        let velocity = grid.velocity_at(*position);
        *position += velocity * dt;

        // Prevent tracers from drifting out of the domain
        if clamp_to_domain {
            *position = clamp_point(*position, extent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::Vec2;

    #[test]
    fn tracers_follow_uniform_flow() {
        let mut grid = Grid::new(4, 4);
        for cell in grid.cells_mut() {
            cell.vel = [1.0, -0.5];
        }
        let mut particles = ParticleSet::new();
        particles.push(Vec2::new(1.0, 2.0));
        particles.push(Vec2::new(2.5, 2.5));

        advect_particles(&mut particles, &grid, 0.5, true);
        assert_eq!(particles.positions()[0], Vec2::new(1.5, 1.75));
        assert_eq!(particles.positions()[1], Vec2::new(3.0, 2.25));
    }

    #[test]
    fn clamping_keeps_tracers_in_the_box() {
        let mut grid = Grid::new(2, 2);
        for cell in grid.cells_mut() {
            cell.vel = [10.0, 10.0];
        }
        let mut particles = ParticleSet::new();
        particles.push(Vec2::new(1.0, 1.0));

        advect_particles(&mut particles, &grid, 1.0, true);
        assert_eq!(particles.positions()[0], Vec2::new(2.0, 2.0));

        advect_particles(&mut particles, &grid, 1.0, false);
        assert_eq!(particles.positions()[0], Vec2::new(12.0, 12.0));
    }
}
