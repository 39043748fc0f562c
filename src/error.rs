use thiserror::Error;

use crate::math::Real;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("simulation extent must be positive and finite, got {width} x {height}")]
    InvalidDimensions { width: Real, height: Real },
    #[error("simulation extent {width} x {height} needs more cells than the grid allows")]
    TooManyCells { width: Real, height: Real },
    #[error("solver parameter `{name}` out of range: {value}")]
    InvalidParameter { name: &'static str, value: Real },
}
