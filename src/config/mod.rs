//! Solver configuration
//!
//! Frame pacing, stability bounds, projection caps and reset settings.

pub mod constants;
pub mod solver_params;

pub use constants::*;
pub use solver_params::SolverParams;
