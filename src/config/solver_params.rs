use bevy::prelude::*;

use crate::error::SolverError;
use crate::math::{Real, Vector};

use super::constants;

/// Solver parameters controlling frame pacing, forces and the projection
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SolverParams {
    /// Simulated seconds that make up one display frame
    pub frame_time: Real,

    /// Numerator of the sub-step bound `cfl_coefficient / max |v|`
    pub cfl_coefficient: Real,

    /// Uniform body force, in cells per second squared
    pub gravity: Vector,

    /// Gauss-Seidel sweep cap for the pressure solve
    pub pressure_iterations: u32,

    /// Largest residual divergence accepted before the sweep cap is reached
    pub pressure_tolerance: Real,

    /// Sub-step cap per frame; the last allowed sub-step consumes the rest of the frame
    pub max_substeps: u32,

    /// Tracers seeded per cell along each axis on reset
    pub tracers_per_axis: u32,

    /// Random offset applied to seeded tracers, in cells (0.0 = regular lattice)
    pub tracer_jitter: Real,

    /// Seed for the tracer jitter
    pub seed: u64,

    /// Keep tracers inside the simulation extent after each move
    pub clamp_particles: bool,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            frame_time: constants::FRAME_TIME,
            cfl_coefficient: constants::CFL_COEFFICIENT,
            gravity: constants::GRAVITY,
            pressure_iterations: constants::PRESSURE_ITERATIONS,
            pressure_tolerance: constants::PRESSURE_TOLERANCE,
            max_substeps: constants::MAX_SUBSTEPS,
            tracers_per_axis: constants::TRACERS_PER_AXIS,
            tracer_jitter: 0.0,
            seed: 0,
            clamp_particles: true,
        }
    }
}

impl SolverParams {
    pub fn with_frame_time(mut self, frame_time: Real) -> Self {
        self.frame_time = frame_time;
        self
    }

    pub fn with_cfl_coefficient(mut self, cfl_coefficient: Real) -> Self {
        self.cfl_coefficient = cfl_coefficient;
        self
    }

    pub fn with_gravity(mut self, gravity: Vector) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the pressure sweep cap and tolerance together
    pub fn with_pressure_solve(mut self, iterations: u32, tolerance: Real) -> Self {
        self.pressure_iterations = iterations;
        self.pressure_tolerance = tolerance;
        self
    }

    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    pub fn with_tracers_per_axis(mut self, tracers_per_axis: u32) -> Self {
        self.tracers_per_axis = tracers_per_axis;
        self
    }

    /// Jitter seeded tracers by up to `jitter` cells, reproducibly from `seed`
    pub fn with_tracer_jitter(mut self, jitter: Real, seed: u64) -> Self {
        self.tracer_jitter = jitter.clamp(0.0, 0.5);
        self.seed = seed;
        self
    }

    pub fn with_particle_clamping(mut self, clamp_particles: bool) -> Self {
        self.clamp_particles = clamp_particles;
        self
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        positive("frame_time", self.frame_time)?;
        positive("cfl_coefficient", self.cfl_coefficient)?;
        positive("pressure_tolerance", self.pressure_tolerance)?;
        if !self.gravity.is_finite() {
            return Err(SolverError::InvalidParameter {
                name: "gravity",
                value: if self.gravity.x.is_finite() {
                    self.gravity.y
                } else {
                    self.gravity.x
                },
            });
        }
        nonzero("pressure_iterations", self.pressure_iterations)?;
        nonzero("max_substeps", self.max_substeps)?;
        nonzero("tracers_per_axis", self.tracers_per_axis)?;
        if !self.tracer_jitter.is_finite() || self.tracer_jitter < 0.0 {
            return Err(SolverError::InvalidParameter {
                name: "tracer_jitter",
                value: self.tracer_jitter,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: Real) -> Result<(), SolverError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SolverError::InvalidParameter { name, value })
    }
}

fn nonzero(name: &'static str, value: u32) -> Result<(), SolverError> {
    if value > 0 {
        Ok(())
    } else {
        Err(SolverError::InvalidParameter { name, value: 0.0 })
    }
}
