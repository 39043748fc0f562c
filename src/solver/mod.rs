//! Per-step physics stages
//!
//! `FluidSolver` runs them in this order every sub-step:
//! advect, commit, body force, wall closure, projection, boundaries, tracers.

pub mod advection;
pub mod boundary;
pub mod forces;
pub mod particles;
pub mod pressure;

pub use advection::{advect_velocity, stage_advected_velocity};
pub use boundary::enforce_boundaries;
pub use forces::apply_body_force;
pub use particles::advect_particles;
pub use pressure::{PressureReport, apply_pressure, fluid_divergence, project, solve_pressure};
