use super::Scalar;
use std::cmp::Ordering;

/// Native rational backend: a numerator/denominator pair of `i64`, kept in
/// lowest terms with a strictly positive denominator after every operation.
#[derive(Debug, Clone, Copy)]
pub struct NativeRat {
    pub num: i64,
    pub den: i64,
}

impl NativeRat {
    pub fn new(num: i64, den: i64) -> Self {
        assert!(den != 0, "NativeRat denominator must be non-zero");
        let sign = if den < 0 { -1 } else { 1 };
        let (mut n, mut d) = (num * sign, den * sign);
        let g = gcd_i64(n.unsigned_abs(), d.unsigned_abs()).max(1);
        n /= g as i64;
        d /= g as i64;
        NativeRat { num: n, den: d }
    }
}

fn gcd_i64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

impl PartialEq for NativeRat {
    fn eq(&self, other: &Self) -> bool {
        self.num as i128 * other.den as i128 == other.num as i128 * self.den as i128
    }
}

impl Scalar for NativeRat {
    const IS_EXACT: bool = true;
    const TOTAL_DIV: bool = true;

    fn zero() -> Self {
        NativeRat { num: 0, den: 1 }
    }
    fn one() -> Self {
        NativeRat { num: 1, den: 1 }
    }

    fn neg(&self) -> Self {
        NativeRat { num: -self.num, den: self.den }
    }
    fn abs(&self) -> Self {
        NativeRat { num: self.num.abs(), den: self.den }
    }
    fn add(&self, other: &Self) -> Self {
        NativeRat::new(
            self.num * other.den + other.num * self.den,
            self.den * other.den,
        )
    }
    fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }
    fn mul(&self, other: &Self) -> Self {
        NativeRat::new(self.num * other.num, self.den * other.den)
    }
    fn div_exact(&self, other: &Self) -> Option<Self> {
        if other.num == 0 {
            None
        } else {
            Some(NativeRat::new(self.num * other.den, self.den * other.num))
        }
    }
    fn fdiv(&self, other: &Self) -> Self {
        let q = self.div_exact(other).expect("fdiv by zero");
        let (f, _) = q.to_f64();
        NativeRat::new(f.floor() as i64, 1)
    }
    fn cdiv(&self, other: &Self) -> Self {
        let q = self.div_exact(other).expect("cdiv by zero");
        let (f, _) = q.to_f64();
        NativeRat::new(f.ceil() as i64, 1)
    }
    fn gcd(&self, other: &Self) -> Self {
        // gcd of rationals expressed over a common denominator, used only
        // by callers that already know both operands are integral.
        NativeRat::new(
            gcd_i64(self.num.unsigned_abs(), other.num.unsigned_abs()) as i64,
            1,
        )
    }
    fn rem(&self, other: &Self) -> Self {
        self.sub(&self.fdiv(other).mul(other))
    }

    fn cmp_scalar(&self, other: &Self) -> Ordering {
        (self.num as i128 * other.den as i128).cmp(&(other.num as i128 * self.den as i128))
    }
    fn sgn(&self) -> i32 {
        self.num.signum() as i32
    }

    fn from_i64(v: i64) -> (Self, bool) {
        (NativeRat { num: v, den: 1 }, true)
    }
    fn to_f64(&self) -> (f64, bool) {
        (self.num as f64 / self.den as f64, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_to_lowest_terms() {
        let r = NativeRat::new(4, 8);
        assert_eq!(r.num, 1);
        assert_eq!(r.den, 2);
    }

    #[test]
    fn normalizes_negative_denominator() {
        let r = NativeRat::new(1, -2);
        assert_eq!((r.num, r.den), (-1, 2));
    }

    #[test]
    fn exact_division_is_always_some() {
        let a = NativeRat::new(1, 2);
        let b = NativeRat::new(1, 3);
        assert!(a.div_exact(&b).is_some());
    }

    #[test]
    fn equality_is_by_value_not_representation() {
        assert_eq!(NativeRat::new(2, 4), NativeRat::new(1, 2));
    }
}
