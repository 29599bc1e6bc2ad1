//! Drawing value types and the paint surface abstraction.
//!
//! These are plain data consumed by controls and backends. Rendering math
//! lives behind [`DrawContext`] implementations, outside this core.

/// Brush value types.
mod brush;
/// Color value types and system color defaults.
mod color;
/// Paint surface abstraction.
mod context;
/// Font value type.
mod font;
/// Image value type and the stream provider boundary.
mod image;
/// Pen value type.
mod pen;

pub use brush::{Brush, GradientStop};
pub use color::{Color, SystemColors};
pub use context::DrawContext;
pub use font::{Font, FontStyle};
pub use image::{Image, StreamProvider};
pub use pen::{DashStyle, Pen};

/// Border appearance for a single visual state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderSettings {
    /// Border color.
    pub color: Color,
    /// Border width in device-independent units.
    pub width: f64,
}

impl BorderSettings {
    /// Construct border settings.
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }

    /// The pen that draws this border.
    pub fn pen(&self) -> Pen {
        Pen::new(self.color, self.width)
    }
}

impl Default for BorderSettings {
    fn default() -> Self {
        Self {
            color: SystemColors::default().border,
            width: 1.0,
        }
    }
}
