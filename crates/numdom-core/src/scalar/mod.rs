//! Pluggable numeric backend.
//!
//! [`Scalar`] is the trait every concrete number type implements; the rest
//! of the crate (and the two domain crates) is generic over `N: Scalar` and
//! is monomorphized once per backend, replacing the macro-selected `NUM_T`
//! of the source library with ordinary Rust generics.
//!
//! Six backends are provided, matching `original_source/num/*.h`:
//!
//! | Backend | Exact | Total division | Closed under `/2` |
//! |---|---|---|---|
//! | [`BigInt`] | yes | no | no |
//! | [`BigRat`] | yes | yes | yes |
//! | [`NativeInt`] | yes | no | no |
//! | [`NativeRat`] | yes | yes | yes |
//! | [`NativeFloat`] | no | yes (rounded) | yes |
//! | [`ExtendedFloat`] | no | yes (rounded) | yes |
//!
//! "Exact" backends never lose information on their own arithmetic; the two
//! float backends instead over-approximate and round outward, and every
//! lossy conversion into or out of them reports an `exact: bool` flag that
//! callers fold into the operation's overall `flag_exact`.

mod ext_float;
mod native_float;
mod native_int;
mod native_rat;

#[cfg(feature = "bigint")]
mod bigint;
#[cfg(feature = "bigrat")]
mod bigrat;

pub use ext_float::ExtendedFloat;
pub use native_float::NativeFloat;
pub use native_int::NativeInt;
pub use native_rat::NativeRat;

#[cfg(feature = "bigint")]
pub use bigint::BigInt;
#[cfg(feature = "bigrat")]
pub use bigrat::BigRat;

use std::cmp::Ordering;
use std::fmt::Debug;

/// Common arithmetic surface every backend exposes.
///
/// Binary operations take `&self` rather than consuming, since matrices
/// hold scalars by value and operating on a row is naturally a sequence of
/// borrows; backends that are `Copy` (the native ones) pay nothing extra,
/// and the `rug`-backed ones avoid an extra clone per step.
pub trait Scalar: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// True when this backend's arithmetic never over-approximates.
    const IS_EXACT: bool;
    /// True when division is total and the type is closed under division by two.
    const TOTAL_DIV: bool;

    fn zero() -> Self;
    fn one() -> Self;

    fn neg(&self) -> Self;
    fn abs(&self) -> Self;
    fn add(&self, other: &Self) -> Self;
    fn sub(&self, other: &Self) -> Self;
    fn mul(&self, other: &Self) -> Self;

    /// Exact division. `None` when `other` does not divide `self` exactly
    /// on a backend where division is partial (the integer backends).
    fn div_exact(&self, other: &Self) -> Option<Self>;
    /// Floor division (rounds toward $-\infty$).
    fn fdiv(&self, other: &Self) -> Self;
    /// Ceiling division (rounds toward $+\infty$).
    fn cdiv(&self, other: &Self) -> Self;
    fn gcd(&self, other: &Self) -> Self;
    fn rem(&self, other: &Self) -> Self;

    fn cmp_scalar(&self, other: &Self) -> Ordering;
    /// -1, 0, or 1.
    fn sgn(&self) -> i32;

    fn is_zero(&self) -> bool {
        self.sgn() == 0
    }
    fn is_pos(&self) -> bool {
        self.sgn() > 0
    }
    fn is_neg(&self) -> bool {
        self.sgn() < 0
    }

    /// Build a scalar from a native `i64`. `exact` is false only when the
    /// backend cannot represent the value precisely (never true today, but
    /// kept for backends with a bounded mantissa).
    fn from_i64(v: i64) -> (Self, bool);
    /// Approximate as `f64`, flagging whether the conversion was exact.
    fn to_f64(&self) -> (f64, bool);

    /// Build a scalar from the ratio `num / den`. Exact when the backend can
    /// represent the quotient precisely (e.g. `div_exact` succeeds, as it
    /// always does for the rational backends); falls back to a rounded
    /// `f64` approximation, flagged inexact, when it can't.
    fn from_ratio(num: i64, den: i64) -> (Self, bool) {
        let (n, n_exact) = Self::from_i64(num);
        let (d, d_exact) = Self::from_i64(den);
        match n.div_exact(&d) {
            Some(v) => (v, n_exact && d_exact),
            None => {
                let (f, _) = n.to_f64();
                let (g, _) = d.to_f64();
                let (v, _) = Self::from_i64((f / g).round() as i64);
                (v, false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise<N: Scalar>() {
        let a = N::from_i64(6).0;
        let b = N::from_i64(4).0;
        assert_eq!(a.add(&b).sgn(), 1);
        assert_eq!(a.sub(&a).sgn(), 0);
        assert_eq!(a.gcd(&b).cmp_scalar(&N::from_i64(2).0), Ordering::Equal);
        assert!(a.cmp_scalar(&b) == Ordering::Greater);
    }

    #[test]
    fn native_int_satisfies_surface() {
        exercise::<NativeInt>();
    }

    #[test]
    fn native_rat_satisfies_surface() {
        exercise::<NativeRat>();
    }

    #[test]
    fn native_float_satisfies_surface() {
        exercise::<NativeFloat>();
    }

    #[test]
    fn ext_float_satisfies_surface() {
        exercise::<ExtendedFloat>();
    }
}
