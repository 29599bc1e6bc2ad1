use super::Color;

/// Stroke dash patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashStyle {
    /// Continuous line.
    #[default]
    Solid,
    /// Dashed line.
    Dash,
    /// Dotted line.
    Dot,
    /// Alternating dashes and dots.
    DashDot,
}

/// A stroke description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in device-independent units.
    pub width: f64,
    /// Dash pattern.
    pub dash: DashStyle,
}

impl Pen {
    /// Construct a solid pen.
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: DashStyle::Solid,
        }
    }

    /// Return the same pen with a different dash style.
    pub fn with_dash(self, dash: DashStyle) -> Self {
        Self { dash, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_dash() {
        let p = Pen::new(Color::BLACK, 1.0).with_dash(DashStyle::Dot);
        assert_eq!(p.dash, DashStyle::Dot);
        assert_eq!(p.width, 1.0);
    }
}
