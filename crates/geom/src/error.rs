use std::result::Result as StdResult;

use thiserror::Error;

/// Result type for geometry operations.
pub type Result<T> = StdResult<T, Error>;

/// Geometry error type.
#[derive(PartialEq, Error, Debug, Clone)]
pub enum Error {
    /// A dimension was negative or not finite.
    #[error("invalid dimension: {0}")]
    InvalidDimension(f64),
    /// A coordinate was not finite.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(f64),
}
