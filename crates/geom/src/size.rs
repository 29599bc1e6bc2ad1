use super::{Point, Rect};

/// A width/height pair with no location.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width in device-independent units.
    pub w: f64,
    /// Height in device-independent units.
    pub h: f64,
}

impl Size {
    /// Construct a size.
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// The zero size.
    pub fn zero() -> Self {
        Self::default()
    }

    /// True if either dimension is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Return a `Rect` with these dimensions located at (0, 0).
    pub fn rect(&self) -> Rect {
        Rect {
            origin: Point::zero(),
            size: *self,
        }
    }

    /// True if this size can completely enclose `other` in both dimensions.
    pub fn contains(&self, other: &Self) -> bool {
        self.w >= other.w && self.h >= other.h
    }

    /// Component-wise maximum of two sizes.
    pub fn max(&self, other: Self) -> Self {
        Self {
            w: self.w.max(other.w),
            h: self.h.max(other.h),
        }
    }
}

impl From<Rect> for Size {
    fn from(r: Rect) -> Self {
        r.size
    }
}

impl From<(f64, f64)> for Size {
    #[inline]
    fn from(v: (f64, f64)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}
