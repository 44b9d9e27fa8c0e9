use super::Scalar;
use rug::{Integer, Rational};
use std::cmp::Ordering;

/// Arbitrary-precision rational backend (GMP, via `rug`). Exact and
/// closed under division and `/2`, matching
/// `original_source/num/numrat_mpq.h`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigRat(pub Rational);

impl BigRat {
    pub fn from_rational(v: Rational) -> Self {
        BigRat(v)
    }
}

impl Scalar for BigRat {
    const IS_EXACT: bool = true;
    const TOTAL_DIV: bool = true;

    fn zero() -> Self {
        BigRat(Rational::new())
    }
    fn one() -> Self {
        BigRat(Rational::from(1))
    }

    fn neg(&self) -> Self {
        BigRat(Rational::from(-&self.0))
    }
    fn abs(&self) -> Self {
        BigRat(self.0.clone().abs())
    }
    fn add(&self, other: &Self) -> Self {
        BigRat(Rational::from(&self.0 + &other.0))
    }
    fn sub(&self, other: &Self) -> Self {
        BigRat(Rational::from(&self.0 - &other.0))
    }
    fn mul(&self, other: &Self) -> Self {
        BigRat(Rational::from(&self.0 * &other.0))
    }
    fn div_exact(&self, other: &Self) -> Option<Self> {
        if other.0 == 0 {
            None
        } else {
            Some(BigRat(Rational::from(&self.0 / &other.0)))
        }
    }
    fn fdiv(&self, other: &Self) -> Self {
        let q = Rational::from(&self.0 / &other.0);
        BigRat(q.floor())
    }
    fn cdiv(&self, other: &Self) -> Self {
        let q = Rational::from(&self.0 / &other.0);
        BigRat(q.ceil())
    }
    fn gcd(&self, other: &Self) -> Self {
        // Only meaningful for rationals that are themselves integers
        // (row normalization after Gauss elimination); otherwise returns 1.
        let (a, b) = (self.0.numer(), other.0.numer());
        if self.0.denom() == &Integer::from(1) && other.0.denom() == &Integer::from(1) {
            BigRat(Rational::from(a.clone().gcd(b)))
        } else {
            BigRat::one()
        }
    }
    fn rem(&self, other: &Self) -> Self {
        self.sub(&self.fdiv(other).mul(other))
    }

    fn cmp_scalar(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
    fn sgn(&self) -> i32 {
        match self.0.cmp0() {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    fn from_i64(v: i64) -> (Self, bool) {
        (BigRat(Rational::from(v)), true)
    }
    fn to_f64(&self) -> (f64, bool) {
        (self.0.to_f64(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_is_exact_and_reduces() {
        let a = BigRat(Rational::from((2, 4)));
        let b = BigRat(Rational::from((1, 2)));
        assert_eq!(a, b);
    }

    #[test]
    fn floor_and_ceil_bracket_the_value() {
        let a = BigRat(Rational::from((7, 2)));
        let one = BigRat::one();
        assert_eq!(a.fdiv(&one), BigRat(Rational::from(3)));
        assert_eq!(a.cdiv(&one), BigRat(Rational::from(4)));
    }
}
