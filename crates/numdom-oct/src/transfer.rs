//! Constraint ingestion, assignment, and dimension-manipulation
//! operations on [`Octagon`] values.

use crate::closure::close_incremental;
use crate::error::{OctError, OctResult};
use crate::halfmatrix::HalfMatrix;
use crate::value::Octagon;
use numdom_core::linearize::{eval, quasilinearize};
use numdom_core::{Bound, ConsKind, Interval, LinCons, LinExpr, Scalar};
use std::cell::RefCell;

fn node(dim: usize, negative: bool) -> usize {
    2 * dim + negative as usize
}

/// Classify `cons` (already known to encode `expr >= 0`) as a unit
/// octagon constraint, returning the `(p, q, bound)` triple to store at
/// `m[p,q]`, or `None` if the constraint involves more than two
/// dimensions or a non-unit coefficient.
fn classify_geq<N: Scalar>(expr: &LinExpr<N>) -> Option<(usize, usize, N)> {
    let mut terms: Vec<(usize, i32)> = Vec::new();
    for t in expr.terms() {
        if !t.is_point {
            return None;
        }
        let k = t.coeff.lower_value()?;
        if k.cmp_scalar(&N::one()) == std::cmp::Ordering::Equal {
            terms.push((t.dim, 1));
        } else if k.cmp_scalar(&N::one().neg()) == std::cmp::Ordering::Equal {
            terms.push((t.dim, -1));
        } else if !k.is_zero() {
            return None;
        }
    }
    let bound = expr.cst.upper_value()?;
    match terms.as_slice() {
        [] => None,
        [(i, s1)] => {
            let p = node(*i, *s1 > 0);
            let two = N::from_i64(2).0;
            Some((p, p ^ 1, bound.mul(&two)))
        }
        [(i, s1), (j, s2)] => {
            let p = node(*i, *s1 > 0);
            let q = node(*j, *s2 < 0);
            Some((p, q, bound))
        }
        _ => None,
    }
}

fn negate_expr<N: Scalar>(expr: &LinExpr<N>) -> LinExpr<N> {
    let mut out = LinExpr::new(expr.cst.neg());
    for t in expr.terms() {
        out.set_coeff(t.dim, t.coeff.neg());
    }
    out
}

/// Apply one linear constraint to `m` as a unit bound, trying both the
/// direct form and (for `Eq`) its negation. Returns whether the
/// constraint was recognized; an unrecognized constraint is dropped
/// (over-approximated as "no information"), matching the source
/// library's box fallback for non-unit forms.
fn apply_cons<N: Scalar>(m: &mut HalfMatrix<N>, cons: &LinCons<N>) -> bool {
    let mut applied = false;
    if let Some((p, q, bound)) = classify_geq(&cons.expr) {
        m.tighten(p, q, Bound::Finite(bound));
        applied = true;
    }
    if cons.kind == ConsKind::Eq {
        let neg = negate_expr(&cons.expr);
        if let Some((p, q, bound)) = classify_geq(&neg) {
            m.tighten(p, q, Bound::Finite(bound));
            applied = true;
        }
    }
    applied
}

impl<N: Scalar> Octagon<N> {
    pub fn of_lincons_array(dim: usize, intdim: usize, cons: &[LinCons<N>]) -> Self {
        let mut m = HalfMatrix::top(dim);
        let mut dropped = 0usize;
        for c in cons {
            if !apply_cons(&mut m, c) {
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::debug!(dropped, "constraints not expressible as octagon unit forms");
        }
        let oct = Octagon { dim, intdim, m: Some(m), closed: RefCell::new(None) };
        if oct.closed_matrix().is_none() {
            Octagon::bottom(dim, intdim)
        } else {
            oct
        }
    }

    /// Add constraints one at a time, quasilinearizing against the
    /// current box whenever a constraint isn't already a unit form.
    pub fn meet_lincons_array(&self, cons: &[LinCons<N>]) -> Self {
        let mut current = self.clone();
        for c in cons {
            let Some(mut m) = current.m.clone() else { return Octagon::bottom(self.dim, self.intdim) };
            if !apply_cons(&mut m, c) {
                let box_ = current.to_box();
                let quasi = quasilinearize(&c.expr, |d| box_[d].clone());
                let requasi = LinCons::new(quasi, c.kind);
                apply_cons(&mut m, &requasi);
            }
            current = Octagon { dim: self.dim, intdim: self.intdim, m: Some(m), closed: RefCell::new(None) };
            if current.closed_matrix().is_none() {
                return Octagon::bottom(self.dim, self.intdim);
            }
        }
        current
    }

    pub fn sat_lincons(&self, cons: &LinCons<N>) -> bool {
        let Some(_) = self.closed_matrix() else { return true };
        let box_ = self.to_box();
        let value = eval(&cons.expr, |d| box_[d].clone());
        match cons.kind {
            ConsKind::Eq => value.lower_value().map(|l| !l.is_pos()).unwrap_or(false)
                && value.upper_value().map(|u| !u.is_neg()).unwrap_or(false),
            ConsKind::Geq => value.lower_value().map(|l| !l.is_neg()).unwrap_or(false),
            ConsKind::Gt => value.lower_value().map(|l| l.is_pos()).unwrap_or(false),
        }
    }

    pub fn bound_dim(&self, d: usize) -> Interval<N> {
        self.to_box()[d].clone()
    }

    pub fn bound_linexpr(&self, expr: &LinExpr<N>) -> Interval<N> {
        let box_ = self.to_box();
        eval(expr, |d| box_[d].clone())
    }

    /// Render the closed matrix's finite cells back as unit interval-linear
    /// constraints, the dual of [`Octagon::of_lincons_array`].
    pub fn to_lincons_array(&self) -> Vec<LinCons<N>> {
        let Some(m) = self.closed_matrix() else {
            return vec![LinCons::new(LinExpr::new(Interval::point(N::one().neg())), ConsKind::Geq)];
        };
        let n = m.n();
        let mut out = Vec::new();
        for i in 0..n {
            for j in 0..i {
                if let Bound::Finite(b) = m.get(i, j) {
                    out.push(unit_lincons_from_cell(i, j, b.clone()));
                }
            }
        }
        out
    }

    /// Forget every constraint on dimension `d`, leaving it unconstrained.
    pub fn forget_dim(&self, d: usize) -> Self {
        let Some(m) = &self.m else { return self.clone() };
        let mut m = m.clone();
        let n = m.n();
        for idx in [2 * d, 2 * d + 1] {
            for other in 0..n {
                if other == idx {
                    continue;
                }
                m.set(idx, other, Bound::Infinite);
                m.set(other, idx, Bound::Infinite);
            }
        }
        Octagon { dim: self.dim, intdim: self.intdim, m: Some(m), closed: RefCell::new(None) }
    }

    /// Assign `x_d <- e`. Unit forms (`x_d <- ±x_j + c`) update the
    /// row/column of `d` directly; anything else forgets `d` then adds
    /// back whatever bound `e` evaluates to against the closed matrix.
    pub fn assign_linexpr(&self, d: usize, e: &LinExpr<N>) -> Self {
        if let Some((dim_j, sign, c)) = as_unit_assignment(e, d) {
            if let Some(m) = &self.m {
                let mut m = m.clone();
                let n = m.n();
                for idx in [2 * d, 2 * d + 1] {
                    for other in 0..n {
                        m.set(idx, other, Bound::Infinite);
                        m.set(other, idx, Bound::Infinite);
                    }
                }
                // x_d = sign*x_j + c: equality, so both directions of the
                // difference are tightened (d != dim_j is guaranteed by
                // `as_unit_assignment`, so (p_pos, q_pos) and (q_pos, p_pos)
                // are genuinely distinct storage cells).
                let p_pos = node(d, false);
                let q_pos = node(dim_j, sign < 0);
                m.set(p_pos, q_pos, Bound::Finite(c.clone()));
                m.set(q_pos, p_pos, Bound::Finite(c.neg()));
                // Only `d`'s row/column changed (it was just forgotten and
                // re-tied to `dim_j`), so re-closing through `d` alone is
                // enough; no need for the full cubic pass.
                let mut closed = m.clone();
                if close_incremental(&mut closed, self.intdim, d) {
                    return Octagon::bottom(self.dim, self.intdim);
                }
                return Octagon { dim: self.dim, intdim: self.intdim, m: Some(m), closed: RefCell::new(Some(closed)) };
            }
        }
        let value = self.bound_linexpr(e);
        let forgotten = self.forget_dim(d);
        let cons = vec![
            LinCons::new(
                {
                    let mut expr = LinExpr::new(value.clone());
                    expr.set_coeff(d, numdom_core::Interval::point(N::one().neg()));
                    expr
                },
                ConsKind::Geq,
            ),
            LinCons::new(
                {
                    let mut expr = LinExpr::new(value.neg());
                    expr.set_coeff(d, numdom_core::Interval::point(N::one()));
                    expr
                },
                ConsKind::Geq,
            ),
        ];
        forgotten.meet_lincons_array(&cons)
    }

    /// Forget every dimension in `dims`, the multi-dimension form of
    /// [`Octagon::forget_dim`].
    pub fn forget_array(&self, dims: &[usize]) -> Self {
        dims.iter().fold(self.clone(), |acc, &d| acc.forget_dim(d))
    }

    /// Parallel assignment: evaluate every expression against the
    /// *original* box before any dimension is touched, then forget every
    /// target and add back each one's bound. Sound, but loses any
    /// relation the assignments would have introduced *between* the
    /// targets themselves (e.g. a swap `x, y <- y, x` only recovers each
    /// variable's box bound, not the tie between them) — the same
    /// known precision cost `numdom-poly`'s non-deterministic assignment
    /// documents for its own fallback path.
    pub fn assign_linexpr_array(&self, dims: &[usize], exprs: &[LinExpr<N>]) -> Self {
        if dims.is_empty() {
            return self.clone();
        }
        let values: Vec<Interval<N>> = exprs.iter().map(|e| self.bound_linexpr(e)).collect();
        let forgotten = self.forget_array(dims);
        let cons: Vec<LinCons<N>> = dims
            .iter()
            .zip(values.iter())
            .flat_map(|(&d, v)| {
                vec![
                    LinCons::new(
                        {
                            let mut e = LinExpr::new(v.clone());
                            e.set_coeff(d, Interval::point(N::one().neg()));
                            e
                        },
                        ConsKind::Geq,
                    ),
                    LinCons::new(
                        {
                            let mut e = LinExpr::new(v.neg());
                            e.set_coeff(d, Interval::point(N::one()));
                            e
                        },
                        ConsKind::Geq,
                    ),
                ]
            })
            .collect();
        forgotten.meet_lincons_array(&cons)
    }

    /// Substitute `x_d` by `e` in every constraint: tie `d` to `e` with an
    /// equality, then project `d` back out. The dual of `assign_linexpr`
    /// in the same sense `numdom-poly`'s `substitute_linexpr` is the dual
    /// of its `assign_linexpr` (swap which side gets the fresh tie).
    pub fn substitute_linexpr(&self, d: usize, e: &LinExpr<N>) -> Self {
        let cons = LinCons::new(expr_for_substitution(d, e), ConsKind::Eq);
        self.meet_lincons_array(&[cons]).forget_dim(d)
    }

    pub fn substitute_linexpr_array(&self, dims: &[usize], exprs: &[LinExpr<N>]) -> Self {
        let cons: Vec<LinCons<N>> =
            dims.iter().zip(exprs).map(|(&d, e)| LinCons::new(expr_for_substitution(d, e), ConsKind::Eq)).collect();
        self.meet_lincons_array(&cons).forget_array(dims)
    }

    pub fn add_dimensions(&self, at: usize, count: usize) -> OctResult<Self> {
        if at > self.dim {
            return Err(OctError::DimensionOutOfRange { found: at, dim: self.dim });
        }
        let new_dim = self.dim + count;
        let Some(old) = &self.m else { return Ok(Octagon::bottom(new_dim, self.intdim + count)) };
        let mut m = HalfMatrix::top(new_dim);
        let remap = |k: usize| if k < at { k } else { k + count };
        for k_old in 0..self.dim {
            for l_old in 0..self.dim {
                let k_new = remap(k_old);
                let l_new = remap(l_old);
                for (si, sj) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                    m.set(2 * k_new + si, 2 * l_new + sj, old.get(2 * k_old + si, 2 * l_old + sj).clone());
                }
            }
        }
        Ok(Octagon { dim: new_dim, intdim: self.intdim + count, m: Some(m), closed: RefCell::new(None) })
    }

    pub fn remove_dimensions(&self, dims: &[usize]) -> OctResult<Self> {
        if dims.iter().any(|&d| d >= self.dim) {
            return Err(OctError::DimensionOutOfRange { found: self.dim, dim: self.dim });
        }
        let keep: Vec<usize> = (0..self.dim).filter(|k| !dims.contains(k)).collect();
        let new_dim = keep.len();
        let new_intdim = self.intdim.saturating_sub(dims.iter().filter(|&&d| d < self.intdim).count());
        let Some(old) = &self.m else { return Ok(Octagon::bottom(new_dim, new_intdim)) };
        let mut m = HalfMatrix::top(new_dim);
        for (k_new, &k_old) in keep.iter().enumerate() {
            for (l_new, &l_old) in keep.iter().enumerate() {
                for (si, sj) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                    m.set(2 * k_new + si, 2 * l_new + sj, old.get(2 * k_old + si, 2 * l_old + sj).clone());
                }
            }
        }
        Ok(Octagon { dim: new_dim, intdim: new_intdim, m: Some(m), closed: RefCell::new(None) })
    }

    pub fn permute_dimensions(&self, perm: &[usize]) -> OctResult<Self> {
        if perm.len() != self.dim {
            return Err(OctError::DimensionCountMismatch { op: "permute", expected: self.dim, found: perm.len() });
        }
        let Some(old) = &self.m else { return Ok(self.clone()) };
        let mut m = HalfMatrix::top(self.dim);
        for k_old in 0..self.dim {
            for l_old in 0..self.dim {
                let k_new = perm[k_old];
                let l_new = perm[l_old];
                for (si, sj) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                    m.set(2 * k_new + si, 2 * l_new + sj, old.get(2 * k_old + si, 2 * l_old + sj).clone());
                }
            }
        }
        Ok(Octagon { dim: self.dim, intdim: self.intdim, m: Some(m), closed: RefCell::new(None) })
    }

    /// Replicate dimension `d` into `count` fresh copies sharing every
    /// constraint `d` currently participates in.
    pub fn expand(&self, d: usize, count: usize) -> OctResult<Self> {
        if d >= self.dim {
            return Err(OctError::DimensionOutOfRange { found: d, dim: self.dim });
        }
        let mut result = self.add_dimensions(self.dim, count)?;
        if let Some(m) = &self.m {
            if let Some(new_m) = &mut result.m {
                for c in 0..count {
                    let fresh = self.dim + c;
                    for other in 0..self.dim {
                        for (si, sj) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                            new_m.set(2 * fresh + si, 2 * other + sj, m.get(2 * d + si, 2 * other + sj).clone());
                            new_m.set(2 * other + si, 2 * fresh + sj, m.get(2 * other + si, 2 * d + sj).clone());
                        }
                    }
                    for (si, sj) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                        new_m.set(2 * fresh + si, 2 * fresh + sj, m.get(2 * d + si, 2 * d + sj).clone());
                    }
                }
            }
        }
        result.closed = RefCell::new(None);
        Ok(result)
    }

    /// Collapse `ds` into a single dimension by meeting each one's
    /// restriction, then removing the others.
    pub fn fold(&self, ds: &[usize]) -> OctResult<Self> {
        if ds.is_empty() || ds.iter().any(|&d| d >= self.dim) {
            return Err(OctError::DimensionOutOfRange { found: self.dim, dim: self.dim });
        }
        let keep = ds[0];
        let mut acc = self.clone();
        if let Some(m) = &self.m {
            if let Some(acc_m) = &mut acc.m {
                let n = m.n();
                for &other in &ds[1..] {
                    // Join every relation `other` held (to `keep`, and to
                    // every third dimension) into the matching relation on
                    // `keep`, the octagon analogue of the convex hull of
                    // both dimensions' restrictions. Accumulate from
                    // `acc_m` (the running result), not `m` (the original
                    // matrix) — otherwise each `other` overwrites the
                    // previous folds' contribution instead of joining with
                    // it, and only the last folded dimension survives.
                    for b in 0..n {
                        for si in [0usize, 1] {
                            let merged = acc_m.get(2 * keep + si, b).max(m.get(2 * other + si, b));
                            acc_m.set(2 * keep + si, b, merged);
                            let merged = acc_m.get(b, 2 * keep + si).max(m.get(b, 2 * other + si));
                            acc_m.set(b, 2 * keep + si, merged);
                        }
                    }
                }
            }
        }
        acc.closed = RefCell::new(None);
        acc.remove_dimensions(&ds[1..])
    }
}

/// Build the equality `e - x_d = 0` (i.e. `x_d = e`), used by both
/// `substitute_linexpr` and `substitute_linexpr_array` to tie the
/// substituted dimension to its replacement expression before projecting
/// it back out.
fn expr_for_substitution<N: Scalar>(d: usize, e: &LinExpr<N>) -> LinExpr<N> {
    let mut expr = e.clone();
    let existing = expr.coeff(d).cloned().unwrap_or_else(|| Interval::point(N::zero()));
    expr.set_coeff(d, existing.sub(&Interval::point(N::one())));
    expr
}

/// Rebuild a unit interval-linear constraint `bound - s_i*x_{d_i} + s_j*x_{d_j} >= 0`
/// from a stored cell `m[i,j] = bound`, the dual of `classify_geq`.
fn unit_lincons_from_cell<N: Scalar>(i: usize, j: usize, bound: N) -> LinCons<N> {
    let mut expr = LinExpr::new(Interval::point(bound));
    let (di, si) = (i / 2, if i % 2 == 0 { 1i64 } else { -1i64 });
    let (dj, sj) = (j / 2, if j % 2 == 0 { 1i64 } else { -1i64 });
    for (dim, s) in [(di, -si), (dj, sj)] {
        let delta = N::from_i64(s).0;
        let cur = expr.coeff(dim).and_then(|iv| iv.lower_value()).unwrap_or_else(N::zero);
        expr.set_coeff(dim, Interval::point(cur.add(&delta)));
    }
    LinCons::new(expr, ConsKind::Geq)
}

/// Recognize `e` as `±x_j + c` (an assignment unit form) for target
/// dimension `d`, with `j != d` — a self-referencing assignment (e.g.
/// `x <- x + 3`) falls back to the generic forget-then-bound path, since
/// it needs to shift every existing relation on `d` rather than replace
/// them with a single fresh one.
fn as_unit_assignment<N: Scalar>(e: &LinExpr<N>, d: usize) -> Option<(usize, i32, N)> {
    let mut terms: Vec<(usize, i32)> = Vec::new();
    for t in e.terms() {
        if !t.is_point {
            return None;
        }
        let k = t.coeff.lower_value()?;
        if k.cmp_scalar(&N::one()) == std::cmp::Ordering::Equal {
            terms.push((t.dim, 1));
        } else if k.cmp_scalar(&N::one().neg()) == std::cmp::Ordering::Equal {
            terms.push((t.dim, -1));
        } else if !k.is_zero() {
            return None;
        }
    }
    let c = e.cst.lower_value()?;
    if e.cst.upper_value()? != c {
        return None;
    }
    match terms.as_slice() {
        [(j, s)] if *j != d => Some((*j, *s, c)),
        _ => None,
    }
}
