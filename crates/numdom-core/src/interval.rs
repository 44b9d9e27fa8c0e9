//! Interval `[-inf, sup]` — see [`Bound`] for why `inf` is stored negated.

use crate::bound::Bound;
use crate::scalar::Scalar;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct Interval<N: Scalar> {
    /// Negation of the lower bound.
    pub neg_inf: Bound<N>,
    pub sup: Bound<N>,
}

impl<N: Scalar> Interval<N> {
    pub fn top() -> Self {
        Interval { neg_inf: Bound::Infinite, sup: Bound::Infinite }
    }

    /// A canonical (already-bottom) empty interval, matching the source
    /// library's sentinel `inf = sup = -1`.
    pub fn bottom() -> Self {
        let neg_one = Bound::Finite(N::from_i64(-1).0);
        Interval { neg_inf: neg_one.clone(), sup: neg_one }
    }

    /// Build from an actual `[lower, upper]` pair; `None` means unbounded
    /// in that direction.
    pub fn of_bounds(lower: Option<N>, upper: Option<N>) -> Self {
        let neg_inf = match lower {
            Some(l) => Bound::Finite(l.neg()),
            None => Bound::Infinite,
        };
        let sup = match upper {
            Some(u) => Bound::Finite(u),
            None => Bound::Infinite,
        };
        Interval { neg_inf, sup }
    }

    pub fn point(v: N) -> Self {
        Interval::of_bounds(Some(v.clone()), Some(v))
    }

    pub fn lower_value(&self) -> Option<N> {
        self.neg_inf.finite().map(Scalar::neg)
    }

    pub fn upper_value(&self) -> Option<N> {
        self.sup.finite().cloned()
    }

    pub fn is_top(&self) -> bool {
        self.neg_inf.is_infinite() && self.sup.is_infinite()
    }

    /// Is this interval empty, *without* canonicalizing first. Prefer
    /// [`Interval::canonicalize`] when an integer-dimension narrowing is
    /// also needed.
    pub fn is_bottom(&self) -> bool {
        match self.sup.add(&self.neg_inf) {
            Bound::Finite(n) => n.is_neg(),
            Bound::Infinite => false,
        }
    }

    /// Is this interval a single point.
    pub fn is_point(&self) -> bool {
        match (&self.neg_inf, &self.sup) {
            (Bound::Finite(a), Bound::Finite(b)) => a.neg() == *b,
            _ => false,
        }
    }

    /// Canonicalize in place. When `integer` is set, narrows `sup` down
    /// and the lower bound up to the nearest integers (expressed here as
    /// rounding the *stored* `neg_inf` down, since it already carries the
    /// negation). Returns `true` iff the (possibly narrowed) interval is
    /// bottom.
    pub fn canonicalize(&mut self, integer: bool) -> bool {
        if integer {
            if let Bound::Finite(n) = &self.neg_inf {
                self.neg_inf = Bound::Finite(n.fdiv(&N::one()));
            }
            if let Bound::Finite(n) = &self.sup {
                self.sup = Bound::Finite(n.fdiv(&N::one()));
            }
        }
        self.is_bottom()
    }

    pub fn is_leq(&self, other: &Self) -> bool {
        self.neg_inf.cmp_bound(&other.neg_inf) != Ordering::Greater
            && self.sup.cmp_bound(&other.sup) != Ordering::Greater
    }

    pub fn is_eq(&self, other: &Self) -> bool {
        self.is_leq(other) && other.is_leq(self)
    }

    pub fn meet(&self, other: &Self) -> Self {
        Interval {
            neg_inf: self.neg_inf.max(&other.neg_inf),
            sup: self.sup.min(&other.sup),
        }
    }

    pub fn join(&self, other: &Self) -> Self {
        Interval {
            neg_inf: self.neg_inf.min(&other.neg_inf),
            sup: self.sup.max(&other.sup),
        }
    }

    /// Standard interval widening: drop any bound `b` makes tighter than
    /// `self` back to infinity.
    pub fn widening(&self, b: &Self) -> Self {
        let neg_inf = if b.neg_inf.cmp_bound(&self.neg_inf) == Ordering::Greater {
            Bound::Infinite
        } else {
            self.neg_inf.clone()
        };
        let sup = if b.sup.cmp_bound(&self.sup) == Ordering::Greater {
            Bound::Infinite
        } else {
            self.sup.clone()
        };
        Interval { neg_inf, sup }
    }

    pub fn neg(&self) -> Self {
        Interval { neg_inf: self.sup.neg(), sup: self.neg_inf.neg() }
    }

    pub fn add(&self, other: &Self) -> Self {
        Interval {
            neg_inf: self.neg_inf.add(&other.neg_inf),
            sup: self.sup.add(&other.sup),
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// A precomputed predicate used to shortcut interval multiplication:
    /// true when this interval is a single point (a "point coefficient").
    pub fn is_point_coefficient(&self) -> bool {
        self.is_point()
    }

    /// `bounds_mul`: full interval product, special-casing zero operands
    /// so that `0 * ∞ = 0` rather than `NaN`/unconstrained.
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_bottom() || other.is_bottom() {
            return Interval::bottom();
        }
        if let Some(a) = self.lower_value() {
            if let Some(b) = self.upper_value() {
                if a == b {
                    return other.scale(&a);
                }
            }
        }
        if let Some(a) = other.lower_value() {
            if let Some(b) = other.upper_value() {
                if a == b {
                    return self.scale(&a);
                }
            }
        }
        // General case: evaluate the four corner products over the
        // *signed* extended values (unlike `Bound`, `Ext` knows which
        // side is -inf vs +inf) and take the outer envelope, preserving
        // the 0*inf=0 convention at each corner.
        let al = Ext::lower(self);
        let au = Ext::upper(self);
        let bl = Ext::lower(other);
        let bu = Ext::upper(other);
        let corners = [al.mul(&bl), al.mul(&bu), au.mul(&bl), au.mul(&bu)];
        let mut lo = corners[0].clone();
        let mut hi = corners[0].clone();
        for c in &corners[1..] {
            lo = lo.min(c);
            hi = hi.max(c);
        }
        Interval::of_bounds(lo.into_lower(), hi.into_upper())
    }

    /// Scale by a point value (used by the point-coefficient shortcut).
    pub fn scale(&self, k: &N) -> Self {
        if k.is_zero() {
            return Interval::point(N::zero());
        }
        if k.is_pos() {
            Interval {
                neg_inf: match &self.neg_inf {
                    Bound::Finite(n) => Bound::Finite(n.mul(k)),
                    Bound::Infinite => Bound::Infinite,
                },
                sup: match &self.sup {
                    Bound::Finite(n) => Bound::Finite(n.mul(k)),
                    Bound::Infinite => Bound::Infinite,
                },
            }
        } else {
            let negated = self.neg();
            negated.scale(&k.neg())
        }
    }
}

/// Signed extended value used internally to evaluate the four corner
/// products of a general (non-point) interval multiplication, since
/// [`Bound`] deliberately does not track which direction its infinity
/// points in.
#[derive(Clone)]
enum Ext<N> {
    NegInf,
    Fin(N),
    PosInf,
}

impl<N: Scalar> Ext<N> {
    fn lower(iv: &Interval<N>) -> Self {
        match iv.lower_value() {
            Some(n) => Ext::Fin(n),
            None => Ext::NegInf,
        }
    }

    fn upper(iv: &Interval<N>) -> Self {
        match iv.upper_value() {
            Some(n) => Ext::Fin(n),
            None => Ext::PosInf,
        }
    }

    fn mul(&self, other: &Self) -> Self {
        match (self, other) {
            (Ext::Fin(a), Ext::Fin(b)) => Ext::Fin(a.mul(b)),
            (Ext::Fin(a), Ext::NegInf) | (Ext::NegInf, Ext::Fin(a)) => {
                if a.is_zero() {
                    Ext::Fin(N::zero())
                } else if a.is_pos() {
                    Ext::NegInf
                } else {
                    Ext::PosInf
                }
            }
            (Ext::Fin(a), Ext::PosInf) | (Ext::PosInf, Ext::Fin(a)) => {
                if a.is_zero() {
                    Ext::Fin(N::zero())
                } else if a.is_pos() {
                    Ext::PosInf
                } else {
                    Ext::NegInf
                }
            }
            (Ext::NegInf, Ext::NegInf) | (Ext::PosInf, Ext::PosInf) => Ext::PosInf,
            (Ext::NegInf, Ext::PosInf) | (Ext::PosInf, Ext::NegInf) => Ext::NegInf,
        }
    }

    fn rank(&self) -> i8 {
        match self {
            Ext::NegInf => -1,
            Ext::Fin(_) => 0,
            Ext::PosInf => 1,
        }
    }

    fn min(&self, other: &Self) -> Self {
        match (self.rank(), other.rank()) {
            (a, b) if a < b => self.clone(),
            (a, b) if a > b => other.clone(),
            _ => match (self, other) {
                (Ext::Fin(a), Ext::Fin(b)) => {
                    if a.cmp_scalar(b) == Ordering::Greater {
                        other.clone()
                    } else {
                        self.clone()
                    }
                }
                _ => self.clone(),
            },
        }
    }

    fn max(&self, other: &Self) -> Self {
        match (self.rank(), other.rank()) {
            (a, b) if a > b => self.clone(),
            (a, b) if a < b => other.clone(),
            _ => match (self, other) {
                (Ext::Fin(a), Ext::Fin(b)) => {
                    if a.cmp_scalar(b) == Ordering::Less {
                        other.clone()
                    } else {
                        self.clone()
                    }
                }
                _ => self.clone(),
            },
        }
    }

    fn into_lower(self) -> Option<N> {
        match self {
            Ext::Fin(n) => Some(n),
            Ext::NegInf => None,
            Ext::PosInf => unreachable!("a lower bound never resolves to +inf"),
        }
    }

    fn into_upper(self) -> Option<N> {
        match self {
            Ext::Fin(n) => Some(n),
            Ext::PosInf => None,
            Ext::NegInf => unreachable!("an upper bound never resolves to -inf"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::NativeRat;

    fn nr(n: i64, d: i64) -> NativeRat {
        NativeRat::new(n, d)
    }

    #[test]
    fn top_is_top_and_not_bottom() {
        let t = Interval::<NativeRat>::top();
        assert!(t.is_top());
        assert!(!t.is_bottom());
    }

    #[test]
    fn bottom_sentinel_is_bottom() {
        assert!(Interval::<NativeRat>::bottom().is_bottom());
    }

    #[test]
    fn of_bounds_round_trips_through_accessors() {
        let iv = Interval::of_bounds(Some(nr(-2, 1)), Some(nr(4, 1)));
        assert_eq!(iv.lower_value(), Some(nr(-2, 1)));
        assert_eq!(iv.upper_value(), Some(nr(4, 1)));
    }

    #[test]
    fn point_coefficient_multiplication_is_exact_scaling() {
        // A degenerate (point) coefficient must shortcut to `scale`
        // instead of the general four-corner product.
        let coeff = Interval::point(nr(2, 1));
        let x = Interval::of_bounds(Some(nr(-2, 1)), Some(nr(4, 1)));
        let result = coeff.mul(&x);
        assert_eq!(result.lower_value(), Some(nr(-4, 1)));
        assert_eq!(result.upper_value(), Some(nr(8, 1)));
    }

    #[test]
    fn general_interval_multiplication_takes_the_outer_envelope_of_all_corners() {
        // [1,3] * [-2,4]: corners are 1*-2=-2, 1*4=4, 3*-2=-6, 3*4=12.
        let a = Interval::of_bounds(Some(nr(1, 1)), Some(nr(3, 1)));
        let b = Interval::of_bounds(Some(nr(-2, 1)), Some(nr(4, 1)));
        let result = a.mul(&b);
        assert_eq!(result.lower_value(), Some(nr(-6, 1)));
        assert_eq!(result.upper_value(), Some(nr(12, 1)));
    }

    #[test]
    fn widening_drops_tightened_bounds_to_infinity() {
        let p1 = Interval::of_bounds(Some(nr(0, 1)), Some(nr(1, 1)));
        let p2 = Interval::of_bounds(Some(nr(0, 1)), Some(nr(2, 1)));
        let w = p1.widening(&p2);
        assert_eq!(w.lower_value(), Some(nr(0, 1)));
        assert_eq!(w.upper_value(), None);
    }

    #[test]
    fn meet_and_join_are_dual() {
        let a = Interval::of_bounds(Some(nr(0, 1)), Some(nr(5, 1)));
        let b = Interval::of_bounds(Some(nr(2, 1)), Some(nr(10, 1)));
        let m = a.meet(&b);
        assert_eq!((m.lower_value(), m.upper_value()), (Some(nr(2, 1)), Some(nr(5, 1))));
        let j = a.join(&b);
        assert_eq!((j.lower_value(), j.upper_value()), (Some(nr(0, 1)), Some(nr(10, 1))));
    }
}
