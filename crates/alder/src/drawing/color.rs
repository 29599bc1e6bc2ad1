/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 0 is fully transparent.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque mid gray.
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Construct an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Construct a color with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// True if the color is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Return the same color with a replaced alpha channel.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Default colors used as the terminus of the control color fallback chain.
///
/// A control with no explicit color, and no ancestor with one, resolves
/// against these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemColors {
    /// Window background.
    pub window: Color,
    /// Control face background.
    pub control: Color,
    /// Default text color.
    pub text: Color,
    /// Selection highlight background.
    pub highlight: Color,
    /// Text on the selection highlight.
    pub highlight_text: Color,
    /// Default border color.
    pub border: Color,
    /// Disabled text color.
    pub gray_text: Color,
}

impl Default for SystemColors {
    fn default() -> Self {
        Self {
            window: Color::WHITE,
            control: Color::rgb(240, 240, 240),
            text: Color::BLACK,
            highlight: Color::rgb(0, 120, 215),
            highlight_text: Color::WHITE,
            border: Color::rgb(173, 173, 173),
            gray_text: Color::rgb(109, 109, 109),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparency() {
        assert!(Color::TRANSPARENT.is_transparent());
        assert!(!Color::BLACK.is_transparent());
        assert!(Color::RED.with_alpha(0).is_transparent());
    }
}
