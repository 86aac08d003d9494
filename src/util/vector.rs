//! Two-dimensional vector for screen coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// A 2D vector of `f64` components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    x: f64,
    y: f64,
}

impl Vector2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// X rounded to the nearest integer.
    pub fn int_x(&self) -> i32 {
        self.x.round() as i32
    }

    /// Y rounded to the nearest integer.
    pub fn int_y(&self) -> i32 {
        self.y.round() as i32
    }

    /// True if either component is NaN.
    pub fn is_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }

    /// Magnitude, `sqrt(x^2 + y^2)`.
    pub fn len(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction.
    ///
    /// The zero vector has no direction; its normal has NaN components.
    pub fn norm(&self) -> Self {
        let len = self.len();
        Self::new(self.x / len, self.y / len)
    }

    /// Distance between `a` and `b`.
    pub fn dist(a: Self, b: Self) -> f64 {
        (a - b).len()
    }

    /// Unit vector pointing from `b` towards `a`.
    pub fn dir(a: Self, b: Self) -> Self {
        (a - b).norm()
    }
}

impl From<(i32, i32)> for Vector2D {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(f64::from(x), f64::from(y))
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.x, self.y)
    }
}

macro_rules! componentwise {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Vector2D {
            type Output = Vector2D;

            fn $method(self, rhs: Vector2D) -> Vector2D {
                Vector2D::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }
    };
}

componentwise!(Add, add, +);
componentwise!(Sub, sub, -);
componentwise!(Mul, mul, *);
componentwise!(Div, div, /);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_is_componentwise() {
        let a = Vector2D::new(6.0, 8.0);
        let b = Vector2D::new(2.0, 4.0);

        assert_eq!(a + b, Vector2D::new(8.0, 12.0));
        assert_eq!(a - b, Vector2D::new(4.0, 4.0));
        assert_eq!(a * b, Vector2D::new(12.0, 32.0));
        assert_eq!(a / b, Vector2D::new(3.0, 2.0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_len_norm_and_dist() {
        let v = Vector2D::new(3.0, 4.0);
        assert_eq!(v.len(), 5.0);

        let n = v.norm();
        assert!((n.x() - 0.6).abs() < 1e-12);
        assert!((n.y() - 0.8).abs() < 1e-12);
        assert!((n.len() - 1.0).abs() < 1e-12);

        assert_eq!(Vector2D::dist(Vector2D::new(1.0, 1.0), Vector2D::new(4.0, 5.0)), 5.0);
    }

    #[test]
    fn test_dir_points_from_b_to_a() {
        let d = Vector2D::dir(Vector2D::new(10.0, 0.0), Vector2D::new(0.0, 0.0));
        assert_eq!(d, Vector2D::new(1.0, 0.0));
    }

    #[test]
    fn test_zero_vector_norm_is_nan() {
        assert!(Vector2D::default().norm().is_nan());
        assert!(!Vector2D::new(1.0, 0.0).is_nan());
    }

    #[test]
    fn test_rounding_and_display() {
        let v = Vector2D::new(1.5, -2.4);
        assert_eq!(v.int_x(), 2);
        assert_eq!(v.int_y(), -2);
        assert_eq!(v.to_string(), "(1.500000, -2.400000)");
        assert_eq!(Vector2D::from((3, -7)), Vector2D::new(3.0, -7.0));
    }
}
