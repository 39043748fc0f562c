// Physical and numerical constants for the grid solver
use bevy::prelude::*;

// Global physics, in cells per second squared
pub const GRAVITY: Vec2 = Vec2::new(0.0, -0.098);

// Frame pacing: one display frame at 30 Hz
pub const FRAME_TIME: f32 = 1.0 / 30.0;
pub const CFL_COEFFICIENT: f32 = 2.0;
pub const MAX_SUBSTEPS: u32 = 256;

// Pressure projection
pub const PRESSURE_ITERATIONS: u32 = 200;
pub const PRESSURE_TOLERANCE: f32 = 1e-4;

// Largest grid the solver will allocate
pub const MAX_GRID_CELLS: usize = 1 << 24;

// Reset state
pub const RESET_PRESSURE: f32 = 1.0;
pub const TRACERS_PER_AXIS: u32 = 4;
