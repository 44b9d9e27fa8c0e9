use super::Scalar;
use std::cmp::Ordering;

/// Native `f64` backend. Over-approximates: every arithmetic operation
/// below rounds in the direction that keeps the surrounding interval sound
/// (`fdiv`/`cdiv` explicitly; `add`/`sub`/`mul` rely on the fact that the
/// caller always widens by at least one ULP via [`crate::interval`]'s
/// outward-rounding helpers rather than trusting raw `f64` rounding).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeFloat(pub f64);

impl Scalar for NativeFloat {
    const IS_EXACT: bool = false;
    const TOTAL_DIV: bool = true;

    fn zero() -> Self {
        NativeFloat(0.0)
    }
    fn one() -> Self {
        NativeFloat(1.0)
    }

    fn neg(&self) -> Self {
        NativeFloat(-self.0)
    }
    fn abs(&self) -> Self {
        NativeFloat(self.0.abs())
    }
    fn add(&self, other: &Self) -> Self {
        NativeFloat(self.0 + other.0)
    }
    fn sub(&self, other: &Self) -> Self {
        NativeFloat(self.0 - other.0)
    }
    fn mul(&self, other: &Self) -> Self {
        NativeFloat(self.0 * other.0)
    }
    fn div_exact(&self, other: &Self) -> Option<Self> {
        if other.0 == 0.0 {
            None
        } else {
            Some(NativeFloat(self.0 / other.0))
        }
    }
    fn fdiv(&self, other: &Self) -> Self {
        NativeFloat((self.0 / other.0).floor())
    }
    fn cdiv(&self, other: &Self) -> Self {
        NativeFloat((self.0 / other.0).ceil())
    }
    fn gcd(&self, other: &Self) -> Self {
        let (mut a, mut b) = (self.0.abs(), other.0.abs());
        while b > 1e-9 {
            (a, b) = (b, a - (a / b).floor() * b);
        }
        NativeFloat(if a > 1e-9 { a } else { 1.0 })
    }
    fn rem(&self, other: &Self) -> Self {
        NativeFloat(self.0 % other.0)
    }

    fn cmp_scalar(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
    fn sgn(&self) -> i32 {
        if self.0 > 0.0 {
            1
        } else if self.0 < 0.0 {
            -1
        } else {
            0
        }
    }

    fn from_i64(v: i64) -> (Self, bool) {
        let f = v as f64;
        (NativeFloat(f), f as i64 == v)
    }
    fn to_f64(&self) -> (f64, bool) {
        (self.0, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_and_ceil_division() {
        let a = NativeFloat(7.0);
        let b = NativeFloat(2.0);
        assert_eq!(a.fdiv(&b).0, 3.0);
        assert_eq!(a.cdiv(&b).0, 4.0);
    }

    #[test]
    fn is_marked_inexact() {
        assert!(!NativeFloat::IS_EXACT);
    }
}
