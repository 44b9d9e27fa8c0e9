use super::Scalar;
use rug::Integer;
use std::cmp::Ordering;

/// Arbitrary-precision integer backend (GMP, via `rug`). Exact, but
/// division is still partial — `div_exact` is `None` whenever the divisor
/// does not divide evenly, matching `original_source/num/numint_mpz.h`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigInt(pub Integer);

impl BigInt {
    pub fn from_integer(v: Integer) -> Self {
        BigInt(v)
    }
}

impl Scalar for BigInt {
    const IS_EXACT: bool = true;
    const TOTAL_DIV: bool = false;

    fn zero() -> Self {
        BigInt(Integer::new())
    }
    fn one() -> Self {
        BigInt(Integer::from(1))
    }

    fn neg(&self) -> Self {
        BigInt(Integer::from(-&self.0))
    }
    fn abs(&self) -> Self {
        BigInt(self.0.clone().abs())
    }
    fn add(&self, other: &Self) -> Self {
        BigInt(Integer::from(&self.0 + &other.0))
    }
    fn sub(&self, other: &Self) -> Self {
        BigInt(Integer::from(&self.0 - &other.0))
    }
    fn mul(&self, other: &Self) -> Self {
        BigInt(Integer::from(&self.0 * &other.0))
    }
    fn div_exact(&self, other: &Self) -> Option<Self> {
        if other.0 == 0 {
            return None;
        }
        let r = Integer::from(&self.0 % &other.0);
        if r == 0 {
            Some(BigInt(Integer::from(&self.0 / &other.0)))
        } else {
            None
        }
    }
    fn fdiv(&self, other: &Self) -> Self {
        let q = Integer::from(&self.0 / &other.0);
        let r = Integer::from(&self.0 % &other.0);
        let adjust = r != 0 && (r.cmp0() == Ordering::Less) != (other.0.cmp0() == Ordering::Less);
        BigInt(if adjust { q - 1 } else { q })
    }
    fn cdiv(&self, other: &Self) -> Self {
        let q = Integer::from(&self.0 / &other.0);
        let r = Integer::from(&self.0 % &other.0);
        let adjust = r != 0 && (r.cmp0() == Ordering::Less) == (other.0.cmp0() == Ordering::Less);
        BigInt(if adjust { q + 1 } else { q })
    }
    fn gcd(&self, other: &Self) -> Self {
        BigInt(self.0.clone().gcd(&other.0))
    }
    fn rem(&self, other: &Self) -> Self {
        BigInt(Integer::from(&self.0 % &other.0))
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
        (BigInt(Integer::from(v)), true)
    }
    fn to_f64(&self) -> (f64, bool) {
        let f = self.0.to_f64();
        let exact = self.0.significant_bits() <= 53;
        (f, exact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_division_detects_remainder() {
        let a = BigInt::from_i64(10).0;
        let b = BigInt::from_i64(4).0;
        assert_eq!(a.div_exact(&b), None);
        assert_eq!(
            BigInt::from_i64(12).0.div_exact(&b),
            Some(BigInt::from_i64(3).0)
        );
    }

    #[test]
    fn handles_values_beyond_i64_range() {
        let huge = BigInt(Integer::from(1) << 200);
        let doubled = huge.add(&huge);
        assert_eq!(doubled, BigInt(Integer::from(1) << 201));
    }
}
