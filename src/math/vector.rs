//! Two-dimensional vector.
//!
//! [`Vector`] is used both as a point and as a direction. It is a plain value
//! type: every operation returns a new vector, and the `x`/`y` fields are public
//! for callers that want to adjust a single component.
//!
//! # Examples
//!
//! ```
//! use canvas2d::Vector;
//!
//! let v = Vector::new(3.0, 4.0);
//! assert_eq!(v.length(), 5.0);
//! assert_eq!(v.add(Vector::new(1.0, 1.0)), Vector::new(4.0, 5.0));
//! assert!(Vector::default().normalize().is_err());
//! ```

use crate::errors::DrawError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// 2D vector, zero by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.length2().sqrt()
    }

    /// Squared length, without the square root.
    pub fn length2(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// True when both components are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Unit vector pointing in the same direction.
    ///
    /// Fails with [`DrawError::ZeroVector`] for the zero vector.
    pub fn normalize(&self) -> Result<Vector, DrawError> {
        if self.is_zero() {
            return Err(DrawError::ZeroVector);
        }

        let length2 = self.length2();
        if length2 == 1.0 {
            Ok(*self)
        } else {
            Ok(self.scale(1.0 / length2.sqrt()))
        }
    }

    /// Negates both components.
    pub fn inverse(&self) -> Vector {
        Vector::new(-self.x, -self.y)
    }

    pub fn scale(&self, n: f64) -> Vector {
        if self.is_zero() {
            return Vector::ZERO;
        }
        Vector::new(self.x * n, self.y * n)
    }

    pub fn add(&self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(&self, other: Vector) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }

    /// Dot product. Returns 0 when either vector is zero.
    pub fn dot(&self, other: Vector) -> f64 {
        if self.is_zero() || other.is_zero() {
            return 0.0;
        }
        self.x * other.x + self.y * other.y
    }

    /// Cosine of the angle between two vectors.
    ///
    /// Returns 0 when either vector is zero, so a 0 result does not on its own
    /// mean the vectors are orthogonal.
    pub fn cos(&self, other: Vector) -> f64 {
        if self.is_zero() || other.is_zero() {
            return 0.0;
        }
        self.dot(other) / (self.length() * other.length())
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector[{}, {}]", self.x, self.y)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::add(&self, rhs)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::sub(&self, rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.inverse()
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        self.scale(rhs)
    }
}

impl From<(f64, f64)> for Vector {
    fn from((x, y): (f64, f64)) -> Self {
        Vector::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn normalize_yields_unit_length() {
        for v in [
            Vector::new(3.0, 4.0),
            Vector::new(-0.001, 250.0),
            Vector::new(1e6, -1e6),
            Vector::new(0.0, -7.5),
        ] {
            let n = v.normalize().unwrap();
            assert!((n.length2() - 1.0).abs() < EPS, "{n} is not unit length");
            // same direction
            assert!((n.cos(v) - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn normalize_zero_vector_fails() {
        match Vector::new(0.0, 0.0).normalize() {
            Err(DrawError::ZeroVector) => {}
            other => panic!("expected ZeroVector, got {:?}", other),
        }
    }

    #[test]
    fn normalize_unit_vector_is_a_copy() {
        let v = Vector::new(0.0, 1.0);
        assert_eq!(v.normalize().unwrap(), v);
    }

    #[test]
    fn dot_and_cos_with_zero_vector_are_zero() {
        let z = Vector::ZERO;
        let v = Vector::new(2.0, 5.0);
        assert_eq!(v.dot(z), 0.0);
        assert_eq!(z.dot(v), 0.0);
        assert_eq!(v.cos(z), 0.0);
        assert_eq!(z.cos(z), 0.0);
    }

    #[test]
    fn dot_is_componentwise_product_sum() {
        let v = Vector::new(2.0, -3.0);
        let w = Vector::new(4.5, 1.5);
        assert_eq!(v.dot(w), 2.0 * 4.5 + -3.0 * 1.5);
    }

    #[test]
    fn cos_of_perpendicular_and_opposite_vectors() {
        let v = Vector::new(1.0, 0.0);
        assert_eq!(v.cos(Vector::new(0.0, 3.0)), 0.0);
        assert!((v.cos(Vector::new(-2.0, 0.0)) + 1.0).abs() < EPS);
    }

    #[test]
    fn scale_multiplies_length() {
        let v = Vector::new(1.5, -2.0);
        for n in [0.0, 2.0, -3.0, 0.25] {
            assert!((v.scale(n).length() - n.abs() * v.length()).abs() < EPS);
        }
        assert!(Vector::ZERO.scale(42.0).is_zero());
        assert!(Vector::ZERO.scale(f64::INFINITY).is_zero());
    }

    #[test]
    fn add_sub_inverse() {
        let a = Vector::new(1.0, 2.0);
        let b = Vector::new(-4.0, 0.5);
        assert_eq!(a.add(b), Vector::new(-3.0, 2.5));
        assert_eq!(a.sub(b), Vector::new(5.0, 1.5));
        assert_eq!(a.inverse(), Vector::new(-1.0, -2.0));
        assert_eq!(a + b, a.add(b));
        assert_eq!(a - b, a.sub(b));
        assert_eq!(-a, a.inverse());
        assert_eq!(a * 2.0, Vector::new(2.0, 4.0));
    }

    #[test]
    fn display_format() {
        assert_eq!(Vector::new(1.0, -2.5).to_string(), "Vector[1, -2.5]");
    }
}
