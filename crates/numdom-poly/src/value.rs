//! The convex polyhedron abstract value and its lattice operations.

use crate::chernikova::{constraints_from_generators, fold_constraints};
use crate::matrix::{dot, ConsKind, ConsRow, GenKind, GenMatrix, GenRow};
use numdom_core::linearize::quasilinearize;
use numdom_core::{ConsKind as CoreConsKind, Interval, LinCons, LinExpr, Scalar};
use std::cell::RefCell;

/// A convex polyhedron over `dim = intdim + realdim` dimensions, kept as a
/// pair of lazily-cross-derived representations: whichever of
/// constraints/generators an operation produced directly is eager, the
/// other is computed on first use by [`Polyhedron::ensure_cons`] /
/// [`Polyhedron::ensure_gens`] and cached. Bottom is tracked explicitly
/// rather than inferred from an empty generator list, since "no rows" is
/// also the valid generator system of a 0-dimensional point in some
/// encodings — keeping it explicit avoids that ambiguity entirely.
#[derive(Debug, Clone)]
pub struct Polyhedron<N: Scalar> {
    pub(crate) dim: usize,
    pub(crate) intdim: usize,
    pub(crate) bottom: bool,
    pub(crate) cons: RefCell<Option<Vec<ConsRow<N>>>>,
    pub(crate) gens: RefCell<Option<Vec<GenRow<N>>>>,
}

impl<N: Scalar> Polyhedron<N> {
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn intdim(&self) -> usize {
        self.intdim
    }

    pub fn is_bottom(&self) -> bool {
        self.bottom
    }

    /// Top iff non-bottom and no constraint actually restricts the space.
    pub fn is_top(&self) -> bool {
        !self.bottom && self.ensure_cons().is_empty()
    }

    /// A dimension is unconstrained iff its bound is the full interval.
    pub fn is_dimension_unconstrained(&self, d: usize) -> bool {
        !self.bottom && self.bound_dim(d).is_top()
    }

    pub fn top(dim: usize, intdim: usize) -> Self {
        Polyhedron { dim, intdim, bottom: false, cons: RefCell::new(Some(Vec::new())), gens: RefCell::new(None) }
    }

    pub fn bottom(dim: usize, intdim: usize) -> Self {
        Polyhedron { dim, intdim, bottom: true, cons: RefCell::new(None), gens: RefCell::new(None) }
    }

    pub(crate) fn of_cons_rows(dim: usize, intdim: usize, cons: Vec<ConsRow<N>>) -> Self {
        let p = Polyhedron { dim, intdim, bottom: false, cons: RefCell::new(Some(cons)), gens: RefCell::new(None) };
        if p.ensure_gens().is_empty() {
            tracing::debug!(dim, "constraint system folded to no generators, collapsing to bottom");
            Polyhedron::bottom(dim, intdim)
        } else {
            p
        }
    }

    pub(crate) fn of_gen_rows(dim: usize, intdim: usize, gens: Vec<GenRow<N>>) -> Self {
        if gens.is_empty() {
            return Polyhedron::bottom(dim, intdim);
        }
        Polyhedron { dim, intdim, bottom: false, cons: RefCell::new(None), gens: RefCell::new(Some(gens)) }
    }

    pub fn of_box(intdim: usize, box_: &[Interval<N>]) -> Self {
        let dim = box_.len();
        let mut cons = Vec::new();
        for (k, iv) in box_.iter().enumerate() {
            if let Some(l) = iv.lower_value() {
                // x_k - l >= 0
                let mut c = vec![N::zero(); dim + 1];
                c[0] = l.neg();
                c[k + 1] = N::one();
                cons.push(ConsRow::new(ConsKind::Geq, c));
            }
            if let Some(u) = iv.upper_value() {
                // u - x_k >= 0
                let mut c = vec![N::zero(); dim + 1];
                c[0] = u;
                c[k + 1] = N::one().neg();
                cons.push(ConsRow::new(ConsKind::Geq, c));
            }
        }
        Polyhedron::of_cons_rows(dim, intdim, cons)
    }

    pub fn of_lincons_array(dim: usize, intdim: usize, cons: &[LinCons<N>]) -> Self {
        let rows = cons.iter().map(|c| to_cons_row(dim, c)).collect::<Vec<_>>();
        Polyhedron::of_cons_rows(dim, intdim, rows)
    }

    /// Lazily compute (and cache) the generator system by folding the
    /// cached constraints into the universe.
    pub fn ensure_gens(&self) -> Vec<GenRow<N>> {
        if self.bottom {
            return Vec::new();
        }
        if let Some(g) = self.gens.borrow().as_ref() {
            return g.clone();
        }
        let cons = self.cons.borrow().clone().unwrap_or_default();
        let gens = fold_constraints(self.dim, GenMatrix::universe(self.dim).rows, &cons);
        *self.gens.borrow_mut() = Some(gens.clone());
        gens
    }

    /// Lazily compute (and cache) the constraint system by folding the
    /// cached generators into the dual chernikova conversion.
    pub fn ensure_cons(&self) -> Vec<ConsRow<N>> {
        if self.bottom {
            return Vec::new();
        }
        if let Some(c) = self.cons.borrow().as_ref() {
            return c.clone();
        }
        let gens = self.gens.borrow().clone().unwrap_or_default();
        let cons = constraints_from_generators(self.dim, &gens);
        *self.cons.borrow_mut() = Some(cons.clone());
        cons
    }

    /// A rough interval box extracted from the generator system, used to
    /// quasilinearize expressions against (the same idiom as the octagon
    /// domain's `to_box`).
    pub fn to_box(&self) -> Vec<Interval<N>> {
        if self.bottom {
            return vec![Interval::bottom(); self.dim];
        }
        let gens = self.ensure_gens();
        (0..self.dim)
            .map(|k| {
                let mut lo: Option<N> = None;
                let mut hi: Option<N> = None;
                let mut unbounded = false;
                for g in &gens {
                    match g.kind {
                        GenKind::Line => unbounded = true,
                        GenKind::Ray => {
                            if !g.coeffs[k + 1].is_zero() {
                                unbounded = true;
                            }
                        }
                        GenKind::Vertex => {
                            let v = divide_coord(&g.coeffs[k + 1], &g.coeffs[0]);
                            lo = Some(match lo {
                                None => v.clone(),
                                Some(cur) => {
                                    if v.cmp_scalar(&cur) == std::cmp::Ordering::Less {
                                        v.clone()
                                    } else {
                                        cur
                                    }
                                }
                            });
                            hi = Some(match hi {
                                None => v.clone(),
                                Some(cur) => {
                                    if v.cmp_scalar(&cur) == std::cmp::Ordering::Greater {
                                        v
                                    } else {
                                        cur
                                    }
                                }
                            });
                        }
                    }
                }
                if unbounded {
                    Interval::top()
                } else {
                    Interval::of_bounds(lo, hi)
                }
            })
            .collect()
    }

    /// Render the current constraint system back as interval-linear
    /// constraints, the dual of [`Polyhedron::of_lincons_array`].
    pub fn to_lincons_array(&self) -> Vec<LinCons<N>> {
        if self.bottom {
            return vec![LinCons::new(LinExpr::new(Interval::point(N::one().neg())), CoreConsKind::Geq)];
        }
        self.ensure_cons().iter().map(|c| from_cons_row(c)).collect()
    }

    /// Render the current generator system, the dual of [`Polyhedron::to_box`]
    /// but keeping vertex/ray/line structure instead of collapsing to bounds.
    /// Polyhedra-only: octagons have no generator representation.
    pub fn to_generator_array(&self) -> Vec<GenRow<N>> {
        if self.bottom {
            return Vec::new();
        }
        self.ensure_gens()
    }

    pub fn is_leq(&self, other: &Self) -> bool {
        if self.bottom {
            return true;
        }
        if other.bottom {
            return false;
        }
        let gens = self.ensure_gens();
        let cons = other.ensure_cons();
        gens.iter().all(|g| cons.iter().all(|c| sat(c, g)))
    }

    pub fn is_eq(&self, other: &Self) -> bool {
        self.is_leq(other) && other.is_leq(self)
    }

    /// Concatenate constraints, re-derive the generator system.
    pub fn meet(&self, other: &Self) -> Self {
        if self.bottom || other.bottom {
            return Polyhedron::bottom(self.dim, self.intdim);
        }
        let mut cons = self.ensure_cons();
        cons.extend(other.ensure_cons());
        Polyhedron::of_cons_rows(self.dim, self.intdim, cons)
    }

    /// Concatenate generators, re-derive constraints lazily on demand.
    pub fn join(&self, other: &Self) -> Self {
        match (self.bottom, other.bottom) {
            (true, true) => return Polyhedron::bottom(self.dim, self.intdim),
            (true, false) => return other.clone(),
            (false, true) => return self.clone(),
            (false, false) => {}
        }
        let mut gens = self.ensure_gens();
        gens.extend(other.ensure_gens());
        Polyhedron::of_gen_rows(self.dim, self.intdim, gens)
    }

    pub fn join_array(dim: usize, intdim: usize, values: &[Self]) -> Self {
        values.iter().fold(Polyhedron::bottom(dim, intdim), |acc, v| acc.join(v))
    }

    pub fn sat_lincons(&self, cons: &LinCons<N>) -> bool {
        if self.bottom {
            return true;
        }
        let row = to_cons_row(self.dim, cons);
        self.ensure_gens().iter().all(|g| sat(&row, g))
    }

    /// True iff every concrete point of `self` has its `d`-th coordinate
    /// inside `interval` — i.e. `bound_dim(d)` is included in `interval`.
    pub fn sat_interval(&self, d: usize, interval: &Interval<N>) -> bool {
        if self.bottom {
            return true;
        }
        self.bound_dim(d).is_leq(interval)
    }

    /// N-ary meet, starting from top so an empty slice yields top.
    pub fn meet_array(dim: usize, intdim: usize, values: &[Self]) -> Self {
        values.iter().fold(Polyhedron::top(dim, intdim), |acc, v| acc.meet(v))
    }

    /// Existentially project out `dims`: unlike [`Polyhedron::remove_dimensions`]
    /// the dimensions stay in place but become fully unconstrained, realized
    /// by adding a line along each forgotten axis to the generator system.
    pub fn forget_array(&self, dims: &[usize]) -> Self {
        if self.bottom {
            return self.clone();
        }
        let mut gens = self.ensure_gens();
        for &d in dims {
            let mut coeffs = vec![N::zero(); self.dim + 1];
            coeffs[d + 1] = N::one();
            gens.push(GenRow::new(GenKind::Line, coeffs));
        }
        Polyhedron::of_gen_rows(self.dim, self.intdim, gens)
    }

    pub fn bound_dim(&self, d: usize) -> Interval<N> {
        let mut e = LinExpr::new(Interval::point(N::zero()));
        e.set_coeff(d, Interval::point(N::one()));
        self.bound_linexpr(&e)
    }

    pub fn bound_linexpr(&self, expr: &LinExpr<N>) -> Interval<N> {
        if self.bottom {
            return Interval::bottom();
        }
        let box_ = self.to_box();
        let lin = quasilinearize(expr, |d| box_[d].clone());
        let gens = self.ensure_gens();
        let mut lo: Option<N> = None;
        let mut hi: Option<N> = None;
        let mut unbounded_lo = false;
        let mut unbounded_hi = false;
        for g in &gens {
            let linear = linear_part_at_gen(&lin, g);
            match g.kind {
                GenKind::Vertex => {
                    let v = divide_coord(&linear, &g.coeffs[0]);
                    lo = Some(match &lo {
                        None => v.clone(),
                        Some(cur) => if v.cmp_scalar(cur) == std::cmp::Ordering::Less { v.clone() } else { cur.clone() },
                    });
                    hi = Some(match &hi {
                        None => v.clone(),
                        Some(cur) => if v.cmp_scalar(cur) == std::cmp::Ordering::Greater { v.clone() } else { cur.clone() },
                    });
                }
                GenKind::Ray => {
                    if linear.is_pos() {
                        unbounded_hi = true;
                    }
                    if linear.is_neg() {
                        unbounded_lo = true;
                    }
                }
                GenKind::Line => {
                    if !linear.is_zero() {
                        unbounded_hi = true;
                        unbounded_lo = true;
                    }
                }
            }
        }
        let cst_lo = lin.cst.lower_value();
        let cst_hi = lin.cst.upper_value();
        let final_lo = if unbounded_lo { None } else { lo.zip(cst_lo).map(|(l, c)| l.add(&c)) };
        let final_hi = if unbounded_hi { None } else { hi.zip(cst_hi).map(|(h, c)| h.add(&c)) };
        Interval::of_bounds(final_lo, final_hi)
    }

    pub fn meet_lincons_array(&self, cons: &[LinCons<N>]) -> Self {
        if self.bottom {
            return self.clone();
        }
        let mut c = self.ensure_cons();
        c.extend(cons.iter().map(|cc| to_cons_row(self.dim, cc)));
        Polyhedron::of_cons_rows(self.dim, self.intdim, c)
    }

    /// Dual of `meet_lincons_array`: add generators (rays/vertices/lines)
    /// directly to the generator system.
    pub fn add_ray_array(&self, rays: &[LinExpr<N>]) -> Self {
        if self.bottom {
            return self.clone();
        }
        let mut g = self.ensure_gens();
        for r in rays {
            let mut coeffs = vec![N::zero(); self.dim + 1];
            for t in r.terms() {
                if let Some(k) = t.coeff.lower_value() {
                    coeffs[t.dim + 1] = k;
                }
            }
            g.push(GenRow::new(GenKind::Ray, coeffs));
        }
        Polyhedron::of_gen_rows(self.dim, self.intdim, g)
    }

    /// Standard polyhedral widening: keep those constraints of `self` also
    /// satisfied by every generator of `other`. Requires `self ⊑ other`;
    /// callers that can't establish that should join first.
    pub fn widening(&self, other: &Self) -> Self {
        if self.bottom {
            return other.clone();
        }
        if other.bottom {
            return self.clone();
        }
        let cons = self.ensure_cons();
        let other_gens = other.ensure_gens();
        let kept: Vec<ConsRow<N>> = cons.into_iter().filter(|c| other_gens.iter().all(|g| sat_geq(c, g))).collect();
        Polyhedron::of_cons_rows(self.dim, self.intdim, kept)
    }

    /// Dual of widening, component-wise on the bounding box.
    pub fn narrowing(&self, other: &Self) -> Self {
        if self.bottom || other.bottom {
            return Polyhedron::bottom(self.dim, self.intdim);
        }
        let self_box = self.to_box();
        let other_box = other.to_box();
        let merged: Vec<Interval<N>> = self_box
            .into_iter()
            .zip(other_box)
            .map(|(a, b)| {
                let lo = if a.lower_value().is_none() { b.lower_value() } else { a.lower_value() };
                let hi = if a.upper_value().is_none() { b.upper_value() } else { a.upper_value() };
                Interval::of_bounds(lo, hi)
            })
            .collect();
        self.meet(&Polyhedron::of_box(self.intdim, &merged))
    }
}

fn to_cons_row<N: Scalar>(dim: usize, cons: &LinCons<N>) -> ConsRow<N> {
    let mut coeffs = vec![N::zero(); dim + 1];
    coeffs[0] = cons.expr.cst.lower_value().unwrap_or_else(N::zero);
    for t in cons.expr.terms() {
        if let Some(k) = t.coeff.lower_value() {
            coeffs[t.dim + 1] = k;
        }
    }
    let kind = match cons.kind {
        CoreConsKind::Eq => ConsKind::Eq,
        CoreConsKind::Geq => ConsKind::Geq,
        CoreConsKind::Gt => ConsKind::Gt,
    };
    ConsRow::new(kind, coeffs)
}

/// Dual of `to_cons_row`: rebuild an interval-linear constraint from a
/// (point-coefficient) constraint row.
fn from_cons_row<N: Scalar>(row: &ConsRow<N>) -> LinCons<N> {
    let mut expr = LinExpr::new(Interval::point(row.coeffs[0].clone()));
    for (k, c) in row.coeffs.iter().enumerate().skip(1) {
        if !c.is_zero() {
            expr.set_coeff(k - 1, Interval::point(c.clone()));
        }
    }
    let kind = match row.kind {
        ConsKind::Eq => CoreConsKind::Eq,
        ConsKind::Geq => CoreConsKind::Geq,
        ConsKind::Gt => CoreConsKind::Gt,
    };
    LinCons::new(expr, kind)
}

fn sat<N: Scalar>(c: &ConsRow<N>, g: &GenRow<N>) -> bool {
    let v = dot(&c.coeffs, &g.coeffs);
    match (c.kind, g.kind) {
        (ConsKind::Eq, _) => v.is_zero(),
        (ConsKind::Gt, GenKind::Vertex) => v.is_pos(),
        (ConsKind::Gt, _) => !v.is_neg(),
        (ConsKind::Geq, _) => !v.is_neg(),
    }
}

fn sat_geq<N: Scalar>(c: &ConsRow<N>, g: &GenRow<N>) -> bool {
    !dot(&c.coeffs, &g.coeffs).is_neg()
}

fn divide_coord<N: Scalar>(num: &N, denom: &N) -> N {
    match num.div_exact(denom) {
        Some(v) => v,
        None => num.fdiv(denom),
    }
}

fn linear_part_at_gen<N: Scalar>(lin: &LinExpr<N>, g: &GenRow<N>) -> N {
    let mut val = N::zero();
    for t in lin.terms() {
        if let Some(k) = t.coeff.lower_value() {
            val = val.add(&k.mul(&g.coeffs[t.dim + 1]));
        }
    }
    val
}

#[cfg(test)]
mod tests {
    use super::*;
    use numdom_core::scalar::NativeRat;

    fn nr(n: i64) -> NativeRat {
        NativeRat::new(n, 1)
    }

    #[test]
    fn box_round_trips_through_constraints_and_generators() {
        let iv = vec![Interval::of_bounds(Some(nr(0)), Some(nr(2))), Interval::of_bounds(Some(nr(1)), Some(nr(1)))];
        let p = Polyhedron::<NativeRat>::of_box(0, &iv);
        assert!(!p.is_bottom());
        let b = p.to_box();
        assert_eq!(b[0].lower_value(), Some(nr(0)));
        assert_eq!(b[0].upper_value(), Some(nr(2)));
        assert_eq!(b[1].lower_value(), Some(nr(1)));
    }

    #[test]
    fn contradictory_constraints_collapse_to_bottom() {
        let mut c1 = LinExpr::new(Interval::point(nr(-1)));
        c1.set_coeff(0, Interval::point(nr(1))); // x - 1 >= 0  =>  x >= 1
        let mut c2 = LinExpr::new(Interval::point(nr(0)));
        c2.set_coeff(0, Interval::point(nr(-1))); // -x >= 0  =>  x <= 0
        let cons = vec![LinCons::new(c1, CoreConsKind::Geq), LinCons::new(c2, CoreConsKind::Geq)];
        let p = Polyhedron::<NativeRat>::of_lincons_array(1, 0, &cons);
        assert!(p.is_bottom());
    }

    #[test]
    fn join_of_two_points_bounds_the_segment_between_them() {
        let a = Polyhedron::<NativeRat>::of_box(0, &[Interval::point(nr(0))]);
        let b = Polyhedron::<NativeRat>::of_box(0, &[Interval::point(nr(4))]);
        let j = a.join(&b);
        let bx = j.to_box();
        assert_eq!(bx[0].lower_value(), Some(nr(0)));
        assert_eq!(bx[0].upper_value(), Some(nr(4)));
    }

    #[test]
    fn is_leq_holds_for_bottom_against_anything() {
        let bot = Polyhedron::<NativeRat>::bottom(2, 0);
        let top = Polyhedron::<NativeRat>::top(2, 0);
        assert!(bot.is_leq(&top));
    }
}
