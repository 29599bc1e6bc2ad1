use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Result type for alder operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
///
/// Invalid-state variants (`Detached`, `Disposed`, `Invalid`) signal
/// programmer errors: an object used before it was attached, or after it was
/// torn down. Backend operations that merely lack support on the current
/// backend do not error at all; they return `false`/`None`/default instead.
#[derive(Error, Debug)]
pub enum Error {
    /// An item was used before being attached to its owning collection.
    #[error("detached: {0}")]
    Detached(String),
    /// A control was used after disposal.
    #[error("disposed: {0}")]
    Disposed(String),
    /// Invalid input error.
    #[error("invalid: {0}")]
    Invalid(String),
    /// Geometry failure.
    #[error("geometry: {0}")]
    Geometry(#[from] alder_geom::Error),
    /// A named resource could not be opened.
    #[error("resource not found: {0}")]
    Resource(String),
    /// I/O failure surfaced from a stream provider.
    #[error("io: {0}")]
    Io(#[from] io::Error),
    /// An error propagated unchanged from backend-specific code.
    #[error("backend: {0}")]
    Backend(String),
}
