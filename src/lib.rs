//! Real-time 2D incompressible fluid on a staggered (MAC) grid.
//!
//! `FluidSolver` advances one display frame at a time through
//! advection, body forces, pressure projection and wall boundaries, and
//! carries passive tracers along for drawing.

use bevy::prelude::*;

pub mod config;
pub mod core;
pub mod error;
pub mod math;
pub mod render;
pub mod solver;

// Public re-exports for clean API
pub use crate::config::{GRAVITY, SolverParams};
pub use crate::core::{
    Axis, Cell, CellType, FluidSolver, FrameState, FrameStats, Grid, Neighbor, ParticleSet,
    ResetSimulation, advance_fluid_frame, draw_fluid_frame, handle_reset_requests,
    sync_solver_params,
};
pub use error::SolverError;
pub use render::FluidRenderer;
pub use solver::PressureReport;

/// Inserts a `FluidSolver` and advances it once per update.
///
/// Write a `ResetSimulation` message to reset the solver; edit the
/// `SolverParams` resource to retune it. Drawing is left to the app, usually
/// via `draw_fluid_frame::<R>` ordered after `advance_fluid_frame`.
pub struct FluidPlugin {
    pub width: f32,
    pub height: f32,
    pub params: SolverParams,
}

impl FluidPlugin {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            params: SolverParams::default(),
        }
    }

    pub fn with_params(mut self, params: SolverParams) -> Self {
        self.params = params;
        self
    }
}

impl Plugin for FluidPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ResetSimulation>();

        let solver = match FluidSolver::with_params(self.width, self.height, self.params.clone())
        {
            Ok(solver) => solver,
            Err(err) => {
                error!("fluid solver not started: {err}");
                return;
            }
        };

        app.insert_resource(self.params.clone())
            .insert_resource(solver)
            .add_systems(
                Update,
                (
                    sync_solver_params,
                    handle_reset_requests,
                    advance_fluid_frame,
                )
                    .chain(),
            );
    }
}
