use alder_geom::Point;

use super::Color;

/// A color stop along a gradient, with `offset` in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient.
    pub offset: f64,
    /// Color at this stop.
    pub color: Color,
}

impl GradientStop {
    /// Construct a gradient stop.
    pub fn new(offset: f64, color: Color) -> Self {
        Self { offset, color }
    }
}

/// A fill description.
#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    /// A uniform color fill.
    Solid(Color),
    /// A linear gradient between two points in the fill rectangle's
    /// coordinate space.
    LinearGradient {
        /// Gradient start point.
        start: Point,
        /// Gradient end point.
        end: Point,
        /// Color stops, ordered by offset.
        stops: Vec<GradientStop>,
    },
    /// A radial gradient around a center point.
    RadialGradient {
        /// Gradient center.
        center: Point,
        /// Gradient radius.
        radius: f64,
        /// Color stops, ordered by offset.
        stops: Vec<GradientStop>,
    },
}

impl Brush {
    /// Construct a solid brush.
    pub fn solid(color: Color) -> Self {
        Self::Solid(color)
    }

    /// Construct a two-stop linear gradient.
    pub fn linear(start: Point, end: Point, from: Color, to: Color) -> Self {
        Self::LinearGradient {
            start,
            end,
            stops: vec![GradientStop::new(0.0, from), GradientStop::new(1.0, to)],
        }
    }
}

impl From<Color> for Brush {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}
