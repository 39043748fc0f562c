use crate::core::{Grid, ParticleSet};

/// Draws one finished frame. The grid and tracers are borrowed for the
/// duration of the call only; the next `advance_frame` mutates them in place.
pub trait FluidRenderer {
    fn draw_grid(&mut self, grid: &Grid, particles: &ParticleSet);
}

impl<F> FluidRenderer for F
where
    F: FnMut(&Grid, &ParticleSet),
{
    fn draw_grid(&mut self, grid: &Grid, particles: &ParticleSet) {
        self(grid, particles)
    }
}
