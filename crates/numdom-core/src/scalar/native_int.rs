use super::Scalar;
use std::cmp::Ordering;

/// Native 64-bit integer backend. Division is partial (`div_exact` is
/// `None` when it would truncate) and the type is not closed under `/2`,
/// so [`Scalar::TOTAL_DIV`] is `false` — algorithms must treat this
/// backend as "incomplete" per the numeric backend contract.
///
/// Arithmetic saturates instead of wrapping on overflow: a wrapped value
/// could compare as smaller than an operand and silently unsound a
/// lattice test, while a saturated value stays an over-approximation.
/// Saturation is still reported as `overflow` at the manager boundary by
/// the caller comparing against `i64::MAX`/`MIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NativeInt(pub i64);

impl Scalar for NativeInt {
    const IS_EXACT: bool = true;
    const TOTAL_DIV: bool = false;

    fn zero() -> Self {
        NativeInt(0)
    }
    fn one() -> Self {
        NativeInt(1)
    }

    fn neg(&self) -> Self {
        NativeInt(self.0.saturating_neg())
    }
    fn abs(&self) -> Self {
        NativeInt(self.0.saturating_abs())
    }
    fn add(&self, other: &Self) -> Self {
        NativeInt(self.0.saturating_add(other.0))
    }
    fn sub(&self, other: &Self) -> Self {
        NativeInt(self.0.saturating_sub(other.0))
    }
    fn mul(&self, other: &Self) -> Self {
        NativeInt(self.0.saturating_mul(other.0))
    }

    fn div_exact(&self, other: &Self) -> Option<Self> {
        if other.0 == 0 || self.0 % other.0 != 0 {
            None
        } else {
            Some(NativeInt(self.0 / other.0))
        }
    }
    fn fdiv(&self, other: &Self) -> Self {
        let q = self.0 / other.0;
        let r = self.0 % other.0;
        NativeInt(if r != 0 && (r < 0) != (other.0 < 0) { q - 1 } else { q })
    }
    fn cdiv(&self, other: &Self) -> Self {
        let q = self.0 / other.0;
        let r = self.0 % other.0;
        NativeInt(if r != 0 && (r < 0) == (other.0 < 0) { q + 1 } else { q })
    }
    fn gcd(&self, other: &Self) -> Self {
        let mut a = self.0.unsigned_abs();
        let mut b = other.0.unsigned_abs();
        while b != 0 {
            (a, b) = (b, a % b);
        }
        NativeInt(a as i64)
    }
    fn rem(&self, other: &Self) -> Self {
        NativeInt(self.0 % other.0)
    }

    fn cmp_scalar(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
    fn sgn(&self) -> i32 {
        self.0.signum() as i32
    }

    fn from_i64(v: i64) -> (Self, bool) {
        (NativeInt(v), true)
    }
    fn to_f64(&self) -> (f64, bool) {
        let f = self.0 as f64;
        (f, f as i64 == self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_and_ceil_division_round_away_from_each_other() {
        let a = NativeInt(-7);
        let b = NativeInt(2);
        assert_eq!(a.fdiv(&b).0, -4);
        assert_eq!(a.cdiv(&b).0, -3);
    }

    #[test]
    fn exact_division_reports_none_on_truncation() {
        assert_eq!(NativeInt(7).div_exact(&NativeInt(2)), None);
        assert_eq!(NativeInt(6).div_exact(&NativeInt(2)), Some(NativeInt(3)));
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        let max = NativeInt(i64::MAX);
        assert_eq!(max.add(&NativeInt(1)).0, i64::MAX);
    }

    #[test]
    fn gcd_matches_textbook_cases() {
        assert_eq!(NativeInt(12).gcd(&NativeInt(18)).0, 6);
        assert_eq!(NativeInt(0).gcd(&NativeInt(5)).0, 5);
    }
}
