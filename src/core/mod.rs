pub mod cell;
pub mod fluid_solver;
pub mod grid;
pub mod particle_set;

pub use cell::{Axis, Cell, CellType, Neighbor};
pub use fluid_solver::{
    FluidSolver, FrameState, FrameStats, ResetSimulation, advance_fluid_frame, draw_fluid_frame,
    handle_reset_requests, sync_solver_params,
};
pub use grid::Grid;
pub use particle_set::ParticleSet;
