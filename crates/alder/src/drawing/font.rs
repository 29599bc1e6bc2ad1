/// Font style flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontStyle {
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
    /// Underlined text.
    pub underline: bool,
}

/// A font description. Resolution to an actual typeface is a backend concern.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Family name.
    pub family: String,
    /// Size in points.
    pub size: f64,
    /// Style flags.
    pub style: FontStyle,
}

impl Font {
    /// Construct a regular font.
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            style: FontStyle::default(),
        }
    }

    /// Return the same font with bold weight.
    pub fn bold(mut self) -> Self {
        self.style.bold = true;
        self
    }

    /// Return the same font with italic slant.
    pub fn italic(mut self) -> Self {
        self.style.italic = true;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("sans-serif", 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders() {
        let f = Font::new("serif", 12.0).bold().italic();
        assert!(f.style.bold);
        assert!(f.style.italic);
        assert!(!f.style.underline);
    }
}
