use super::{Error, Point, Result, Size, Vector};

/// A located rectangle in device-independent units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Rectangle dimensions.
    pub size: Size,
}

impl Rect {
    /// Construct a rectangle from coordinates and dimensions.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(w, h),
        }
    }

    /// Construct a rectangle from an origin and size.
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// The zero rectangle.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Construct a rectangle, checking that coordinates are finite and
    /// dimensions non-negative.
    pub fn try_new(x: f64, y: f64, w: f64, h: f64) -> Result<Self> {
        Self::new(x, y, w, h).validated()
    }

    /// Check that coordinates are finite and dimensions non-negative.
    pub fn validated(self) -> Result<Self> {
        for c in [self.origin.x, self.origin.y] {
            if !c.is_finite() {
                return Err(Error::InvalidCoordinate(c));
            }
        }
        for d in [self.size.w, self.size.h] {
            if !d.is_finite() || d < 0.0 {
                return Err(Error::InvalidDimension(d));
            }
        }
        Ok(self)
    }

    /// Left edge coordinate.
    pub fn left(&self) -> f64 {
        self.origin.x
    }

    /// Top edge coordinate.
    pub fn top(&self) -> f64 {
        self.origin.y
    }

    /// Right edge coordinate.
    pub fn right(&self) -> f64 {
        self.origin.x + self.size.w
    }

    /// Bottom edge coordinate.
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.h
    }

    /// The bottom-left corner.
    pub fn bottom_left(&self) -> Point {
        Point::new(self.left(), self.bottom())
    }

    /// True if either dimension is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// True if the point falls within the rectangle (right/bottom exclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// True if `other` falls entirely within this rectangle.
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Return the rectangle shifted by a vector.
    pub fn translate(&self, v: Vector) -> Self {
        Self {
            origin: self.origin + v,
            size: self.size,
        }
    }

    /// The intersection of two rectangles, if they overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self::new(left, top, right - left, bottom - top))
    }

    /// The smallest rectangle containing both rectangles.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }

    /// Return the rectangle grown by `amount` on every side. Negative amounts
    /// shrink; dimensions are clamped at zero.
    pub fn inflate(&self, amount: f64) -> Self {
        Self::new(
            self.origin.x - amount,
            self.origin.y - amount,
            (self.size.w + amount * 2.0).max(0.0),
            (self.size.h + amount * 2.0).max(0.0),
        )
    }
}

impl From<(f64, f64, f64, f64)> for Rect {
    #[inline]
    fn from(v: (f64, f64, f64, f64)) -> Self {
        Self::new(v.0, v.1, v.2, v.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains() {
        let r = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(14.9, 14.9)));
        assert!(!r.contains(Point::new(15.0, 10.0)));
    }

    #[test]
    fn intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        let c = Rect::new(20.0, 20.0, 1.0, 1.0);
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 15.0, 15.0));
        assert_eq!(Rect::zero().union(&b), b);
    }

    #[test]
    fn translate() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0).translate(Vector::new(1.0, 1.0));
        assert_eq!(r, Rect::new(2.0, 3.0, 3.0, 4.0));
    }

    #[test]
    fn inflate_clamps() {
        let r = Rect::new(0.0, 0.0, 2.0, 2.0).inflate(-2.0);
        assert_eq!(r.size, Size::zero());
    }

    #[test]
    fn validated() {
        assert!(Rect::try_new(0.0, 0.0, 10.0, 10.0).is_ok());
        assert_eq!(
            Rect::try_new(0.0, 0.0, -1.0, 10.0),
            Err(Error::InvalidDimension(-1.0))
        );
        assert!(Rect::try_new(f64::NAN, 0.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn bottom_left() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.bottom_left(), Point::new(1.0, 6.0));
    }
}
