use std::ops::{Add, Sub};

use super::Vector;

/// A location in device-independent units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Construct a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin point.
    pub fn zero() -> Self {
        Self::default()
    }

    /// True if both coordinates are zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// The vector from the origin to this point.
    pub fn to_vector(self) -> Vector {
        Vector {
            dx: self.x,
            dy: self.y,
        }
    }
}

impl Add<Vector> for Point {
    type Output = Self;

    fn add(self, v: Vector) -> Self {
        Self {
            x: self.x + v.dx,
            y: self.y + v.dy,
        }
    }
}

impl Sub<Vector> for Point {
    type Output = Self;

    fn sub(self, v: Vector) -> Self {
        Self {
            x: self.x - v.dx,
            y: self.y - v.dy,
        }
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, other: Self) -> Vector {
        Vector {
            dx: self.x - other.x,
            dy: self.y - other.y,
        }
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from(v: (f64, f64)) -> Self {
        Self { x: v.0, y: v.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_vector() {
        let p = Point::new(1.0, 2.0) + Vector::new(2.0, 3.0);
        assert_eq!(p, Point::new(3.0, 5.0));
    }

    #[test]
    fn sub_points_gives_vector() {
        let v = Point::new(3.0, 5.0) - Point::new(1.0, 2.0);
        assert_eq!(v, Vector::new(2.0, 3.0));
    }

    #[test]
    fn zero() {
        assert!(Point::zero().is_zero());
        assert!(!Point::new(0.5, 0.0).is_zero());
    }
}
