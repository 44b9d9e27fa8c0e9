//! Interval evaluation and quasilinearization.
//!
//! `eval` computes the interval image of a [`LinExpr`] over a box (one
//! interval per dimension). `quasilinearize` turns interval coefficients
//! into point ones wherever the referenced dimension is bounded, pushing
//! the resulting imprecision into the constant term as a symmetric
//! radius — the mid/radius policy described for octagon and polyhedra
//! assignment/substitution.

use crate::interval::Interval;
use crate::linexpr::LinExpr;
use crate::scalar::Scalar;

/// Evaluate `expr` over `box_`, a per-dimension interval lookup. Matches
/// the source library's `itv_eval_ap_linexpr0`: short-circuits to `top`
/// as soon as an unbounded dimension is multiplied by a genuine (non-
/// point) interval coefficient, since the product can no longer narrow
/// the running accumulator.
pub fn eval<N, F>(expr: &LinExpr<N>, box_: F) -> Interval<N>
where
    N: Scalar,
    F: Fn(usize) -> Interval<N>,
{
    let mut acc = expr.cst.clone();
    for term in expr.terms() {
        let bi = box_(term.dim);
        if term.is_point {
            let k = term
                .coeff
                .lower_value()
                .expect("is_point terms always carry a finite coefficient value");
            acc = acc.add(&bi.scale(&k));
        } else if bi.is_top() {
            return Interval::top();
        } else {
            acc = acc.add(&term.coeff.mul(&bi));
        }
    }
    acc
}

/// Rewrite `expr` so that every term whose dimension is bounded in
/// `box_` carries a point coefficient (the midpoint of the original
/// interval coefficient), moving the coefficient's half-width times the
/// dimension's magnitude into the constant term. Terms over an
/// unbounded dimension, or already carrying a point coefficient, pass
/// through unchanged — there's nothing sound to linearize them into.
pub fn quasilinearize<N, F>(expr: &LinExpr<N>, box_: F) -> LinExpr<N>
where
    N: Scalar,
    F: Fn(usize) -> Interval<N>,
{
    let mut result = LinExpr::new(expr.cst.clone());
    let two = N::from_i64(2).0;
    for term in expr.terms() {
        if term.is_point {
            result.set_coeff(term.dim, term.coeff.clone());
            continue;
        }
        let (a, b) = match (term.coeff.lower_value(), term.coeff.upper_value()) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                result.set_coeff(term.dim, term.coeff.clone());
                continue;
            }
        };
        let xi = box_(term.dim);
        let (l, u) = match (xi.lower_value(), xi.upper_value()) {
            (Some(l), Some(u)) => (l, u),
            _ => {
                result.set_coeff(term.dim, term.coeff.clone());
                continue;
            }
        };
        let sum = a.add(&b);
        let diff = b.sub(&a);
        let center = sum.div_exact(&two).unwrap_or_else(|| sum.fdiv(&two));
        let radius = diff.div_exact(&two).unwrap_or_else(|| diff.cdiv(&two));
        let l_abs = l.abs();
        let u_abs = u.abs();
        let mag = if l_abs.cmp_scalar(&u_abs) == std::cmp::Ordering::Greater {
            l_abs
        } else {
            u_abs
        };
        let half_width = radius.mul(&mag);
        let slack = Interval::of_bounds(Some(half_width.neg()), Some(half_width));
        result.cst = result.cst.add(&slack);
        result.set_coeff(term.dim, Interval::point(center));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linexpr::LinExpr;
    use crate::scalar::NativeRat;

    fn nr(n: i64, d: i64) -> NativeRat {
        NativeRat::new(n, d)
    }

    fn iv(lo: i64, hi: i64) -> Interval<NativeRat> {
        Interval::of_bounds(Some(nr(lo, 1)), Some(nr(hi, 1)))
    }

    #[test]
    fn eval_scales_point_coefficients_exactly() {
        let mut e = LinExpr::new(Interval::point(nr(0, 1)));
        e.set_coeff(0, Interval::point(nr(2, 1)));
        let result = eval(&e, |d| if d == 0 { iv(-2, 4) } else { Interval::top() });
        assert_eq!(result.lower_value(), Some(nr(-4, 1)));
        assert_eq!(result.upper_value(), Some(nr(8, 1)));
    }

    #[test]
    fn eval_takes_the_outer_envelope_for_a_genuine_interval_coefficient() {
        let mut e = LinExpr::new(Interval::point(nr(0, 1)));
        e.set_coeff(0, iv(1, 3));
        let result = eval(&e, |d| if d == 0 { iv(-2, 4) } else { Interval::top() });
        assert_eq!(result.lower_value(), Some(nr(-6, 1)));
        assert_eq!(result.upper_value(), Some(nr(12, 1)));
    }

    #[test]
    fn eval_short_circuits_to_top_on_unbounded_dimension() {
        let mut e = LinExpr::new(Interval::point(nr(0, 1)));
        e.set_coeff(0, iv(1, 3));
        let result = eval(&e, |_| Interval::top());
        assert!(result.is_top());
    }

    #[test]
    fn quasilinearize_turns_bounded_interval_coefficient_into_point() {
        let mut e = LinExpr::new(Interval::point(nr(0, 1)));
        e.set_coeff(0, iv(1, 3));
        let q = quasilinearize(&e, |_| iv(-2, 4));
        let term = q.coeff(0).unwrap();
        assert!(term.is_point());
        assert_eq!(term.lower_value(), Some(nr(2, 1)));
        // radius 1 * max(|-2|,|4|)=4 added symmetrically to the constant.
        assert_eq!(q.cst.lower_value(), Some(nr(-4, 1)));
        assert_eq!(q.cst.upper_value(), Some(nr(4, 1)));
    }

    #[test]
    fn quasilinearize_leaves_unbounded_dimension_intact() {
        let mut e = LinExpr::new(Interval::point(nr(0, 1)));
        e.set_coeff(0, iv(1, 3));
        let q = quasilinearize(&e, |_| Interval::top());
        assert!(!q.coeff(0).unwrap().is_point());
    }
}
