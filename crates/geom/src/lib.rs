//! Geometry primitives used across alder.
//!
//! All coordinates are in device-independent units (1/96 inch), stored as
//! `f64`. Conversion to physical pixels happens in backends, never here.

/// Error types for geometry operations.
mod error;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Width/height size type.
mod size;
/// Offset vector type.
mod vector;

pub use error::{Error, Result};
pub use point::Point;
pub use rect::Rect;
pub use size::Size;
pub use vector::Vector;
