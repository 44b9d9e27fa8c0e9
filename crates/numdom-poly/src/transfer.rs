//! Assignment, substitution, and dimension-manipulation operations on
//! [`Polyhedron`] values.

use crate::error::{PolyError, PolyResult};
use crate::matrix::{ConsKind, ConsRow, GenKind, GenRow};
use crate::value::Polyhedron;
use numdom_core::linearize::quasilinearize;
use numdom_core::{ConsKind as CoreConsKind, Interval, LinCons, LinExpr, Scalar};

fn is_exact<N: Scalar>(e: &LinExpr<N>) -> bool {
    e.cst.is_point() && e.terms().all(|t| t.coeff.is_point())
}

/// Value of `e` (point-coefficient terms only) at homogeneous generator
/// row `g`: the constant term scales with `g`'s homogenizing column, so
/// this single formula applies unchanged to vertices, rays, and lines.
fn forward_coord<N: Scalar>(e: &LinExpr<N>, g: &GenRow<N>) -> N {
    let cst = e.cst.lower_value().expect("exact linexpr");
    let mut val = cst.mul(&g.coeffs[0]);
    for t in e.terms() {
        let k = t.coeff.lower_value().expect("exact linexpr");
        val = val.add(&k.mul(&g.coeffs[t.dim + 1]));
    }
    val
}

impl<N: Scalar> Polyhedron<N> {
    /// Assign `x_d <- e`. A deterministic (point-coefficient) `e` rewrites
    /// every generator's `d`-th coordinate directly by composition and
    /// lets the constraint system re-derive lazily; a non-deterministic
    /// `e` ties a fresh dimension to `e`'s quasilinearization and projects
    /// the old `d` out, the same construction as the octagon domain's
    /// generic assignment fallback.
    pub fn assign_linexpr(&self, d: usize, e: &LinExpr<N>) -> Self {
        if self.is_bottom() {
            return self.clone();
        }
        if is_exact(e) {
            let gens = self.ensure_gens();
            let new_gens: Vec<GenRow<N>> = gens
                .iter()
                .map(|g| {
                    let mut g2 = g.clone();
                    g2.coeffs[d + 1] = forward_coord(e, g);
                    g2
                })
                .collect();
            return Polyhedron::of_gen_rows(self.dim, self.intdim, new_gens);
        }
        let box_ = self.to_box();
        let lin = quasilinearize(e, |k| box_[k].clone());
        let fresh = self.dim;
        let widened = self.add_dimensions(fresh, 1).expect("fresh <= dim");

        // x_fresh - point_part(x) - cst_lo >= 0
        let mut c1 = LinExpr::new(Interval::point(lin.cst.lower_value().unwrap_or_else(N::zero).neg()));
        c1.set_coeff(fresh, Interval::point(N::one()));
        for t in lin.terms() {
            c1.set_coeff(t.dim, t.coeff.neg());
        }
        // -x_fresh + point_part(x) + cst_hi >= 0
        let mut c2 = LinExpr::new(Interval::point(lin.cst.upper_value().unwrap_or_else(N::zero)));
        c2.set_coeff(fresh, Interval::point(N::one().neg()));
        for t in lin.terms() {
            c2.set_coeff(t.dim, t.coeff.clone());
        }

        let tied =
            widened.meet_lincons_array(&[LinCons::new(c1, CoreConsKind::Geq), LinCons::new(c2, CoreConsKind::Geq)]);
        let projected = tied.remove_dimensions(&[d]).expect("d < dim");
        // `fresh` (the last index before removing `d`) always shifts down
        // to `fresh - 1` since `d < fresh` unconditionally; swap it back
        // into `d`'s old slot.
        let new_d = fresh - 1;
        if new_d == d {
            return projected;
        }
        let mut perm: Vec<usize> = (0..projected.dim).collect();
        perm.swap(d, new_d);
        projected.permute_dimensions(&perm).expect("permutation length matches dim")
    }

    /// Substitute `e` for `x_d` in every constraint. Unlike assignment,
    /// this is always exact linear algebra on the constraint side (no
    /// invertibility case needed): a row whose `d`-coefficient is nonzero
    /// has that coefficient distributed into `e`'s terms; a row that
    /// can't be substituted exactly (because `e` isn't point-exact) is
    /// dropped when it actually mentions `d`, the sound over-approximation.
    pub fn substitute_linexpr(&self, d: usize, e: &LinExpr<N>) -> Self {
        if self.is_bottom() {
            return self.clone();
        }
        let exact = is_exact(e);
        let cons = self.ensure_cons();
        let new_cons: Vec<ConsRow<N>> = cons
            .into_iter()
            .filter_map(|c| substitute_row(&c, d, e, exact))
            .collect();
        Polyhedron::of_cons_rows(self.dim, self.intdim, new_cons)
    }

    pub fn assign_linexpr_array(&self, dims: &[usize], exprs: &[LinExpr<N>]) -> Self {
        dims.iter().zip(exprs.iter()).fold(self.clone(), |p, (&d, e)| p.assign_linexpr(d, e))
    }

    pub fn substitute_linexpr_array(&self, dims: &[usize], exprs: &[LinExpr<N>]) -> Self {
        dims.iter().zip(exprs.iter()).fold(self.clone(), |p, (&d, e)| p.substitute_linexpr(d, e))
    }

    pub fn add_dimensions(&self, at: usize, count: usize) -> PolyResult<Self> {
        if at > self.dim {
            return Err(PolyError::DimensionOutOfRange { found: at, dim: self.dim });
        }
        let new_dim = self.dim + count;
        if self.is_bottom() {
            return Ok(Polyhedron::bottom(new_dim, self.intdim + count));
        }
        let remap = |k: usize| if k < at { k + 1 } else { k + 1 + count };
        let gens = self
            .ensure_gens()
            .into_iter()
            .map(|g| {
                let mut coeffs = vec![N::zero(); new_dim + 1];
                coeffs[0] = g.coeffs[0].clone();
                for k in 0..self.dim {
                    coeffs[remap(k)] = g.coeffs[k + 1].clone();
                }
                GenRow::new(g.kind, coeffs)
            })
            .collect();
        Ok(Polyhedron::of_gen_rows(new_dim, self.intdim + count, gens))
    }

    pub fn remove_dimensions(&self, dims: &[usize]) -> PolyResult<Self> {
        if dims.iter().any(|&d| d >= self.dim) {
            return Err(PolyError::DimensionOutOfRange { found: self.dim, dim: self.dim });
        }
        if self.is_bottom() {
            let new_dim = self.dim - dims.len();
            let new_intdim = self.intdim.saturating_sub(dims.iter().filter(|&&d| d < self.intdim).count());
            return Ok(Polyhedron::bottom(new_dim, new_intdim));
        }
        let keep: Vec<usize> = (0..self.dim).filter(|k| !dims.contains(k)).collect();
        let new_dim = keep.len();
        let new_intdim = self.intdim.saturating_sub(dims.iter().filter(|&&d| d < self.intdim).count());
        let gens = self
            .ensure_gens()
            .into_iter()
            .map(|g| {
                let mut coeffs = vec![N::zero(); new_dim + 1];
                coeffs[0] = g.coeffs[0].clone();
                for (k_new, &k_old) in keep.iter().enumerate() {
                    coeffs[k_new + 1] = g.coeffs[k_old + 1].clone();
                }
                GenRow::new(g.kind, coeffs)
            })
            .collect();
        Ok(Polyhedron::of_gen_rows(new_dim, new_intdim, gens))
    }

    pub fn permute_dimensions(&self, perm: &[usize]) -> PolyResult<Self> {
        if perm.len() != self.dim {
            return Err(PolyError::DimensionCountMismatch { op: "permute", expected: self.dim, found: perm.len() });
        }
        if self.is_bottom() {
            return Ok(self.clone());
        }
        let gens = self
            .ensure_gens()
            .into_iter()
            .map(|g| {
                let mut coeffs = vec![N::zero(); self.dim + 1];
                coeffs[0] = g.coeffs[0].clone();
                for k_old in 0..self.dim {
                    coeffs[perm[k_old] + 1] = g.coeffs[k_old + 1].clone();
                }
                GenRow::new(g.kind, coeffs)
            })
            .collect();
        Ok(Polyhedron::of_gen_rows(self.dim, self.intdim, gens))
    }

    /// Replicate dimension `d` into `count` fresh copies sharing every
    /// constraint `d` currently participates in, by copying its row
    /// entries onto each fresh dimension's column in every generator.
    pub fn expand(&self, d: usize, count: usize) -> PolyResult<Self> {
        if d >= self.dim {
            return Err(PolyError::DimensionOutOfRange { found: d, dim: self.dim });
        }
        let widened = self.add_dimensions(self.dim, count)?;
        if widened.is_bottom() {
            return Ok(widened);
        }
        let gens = widened
            .ensure_gens()
            .into_iter()
            .map(|mut g| {
                for c in 0..count {
                    g.coeffs[self.dim + c + 1] = g.coeffs[d + 1].clone();
                }
                g
            })
            .collect();
        Ok(Polyhedron::of_gen_rows(widened.dim, widened.intdim, gens))
    }

    /// Collapse `ds` into a single dimension by meeting each one's
    /// restriction to the others projected out, then joining the results.
    /// The convex-hull-of-restrictions construction named in this
    /// domain's operation catalog.
    pub fn fold(&self, ds: &[usize]) -> PolyResult<Self> {
        if ds.is_empty() || ds.iter().any(|&d| d >= self.dim) {
            return Err(PolyError::DimensionOutOfRange { found: self.dim, dim: self.dim });
        }
        let keep = ds[0];
        let mut acc: Option<Polyhedron<N>> = None;
        for &other in ds {
            // Restriction to `other` being the folded value: rename
            // `other`'s column into `keep`'s slot, then drop the rest of
            // `ds` (every folded dimension collapses onto the same one).
            let mut perm: Vec<usize> = (0..self.dim).collect();
            perm.swap(keep, other);
            let renamed = self.permute_dimensions(&perm)?;
            let to_drop: Vec<usize> = ds.iter().copied().filter(|&d| d != keep).collect();
            let restricted = renamed.remove_dimensions(&to_drop)?;
            acc = Some(match acc {
                None => restricted,
                Some(a) => a.join(&restricted),
            });
        }
        Ok(acc.unwrap())
    }
}

fn substitute_row<N: Scalar>(c: &ConsRow<N>, d: usize, e: &LinExpr<N>, exact: bool) -> Option<ConsRow<N>> {
    let a_d = c.coeffs[d + 1].clone();
    if a_d.is_zero() {
        return Some(c.clone());
    }
    if !exact {
        tracing::debug!(dim = d, "dropping a constraint row: substituted expression is not point-exact");
        return None;
    }
    let mut coeffs = c.coeffs.clone();
    coeffs[d + 1] = N::zero();
    let e_cst = e.cst.lower_value().expect("checked exact");
    coeffs[0] = coeffs[0].add(&a_d.mul(&e_cst));
    for t in e.terms() {
        let k = t.coeff.lower_value().expect("checked exact");
        coeffs[t.dim + 1] = coeffs[t.dim + 1].add(&a_d.mul(&k));
    }
    Some(ConsRow::new(c.kind, coeffs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use numdom_core::scalar::NativeRat;

    fn nr(n: i64) -> NativeRat {
        NativeRat::new(n, 1)
    }

    #[test]
    fn assign_shifts_a_box_by_a_constant() {
        let p = Polyhedron::<NativeRat>::of_box(0, &[Interval::of_bounds(Some(nr(0)), Some(nr(1)))]);
        let mut e = LinExpr::new(Interval::point(nr(3)));
        e.set_coeff(0, Interval::point(nr(1)));
        let shifted = p.assign_linexpr(0, &e);
        let b = shifted.to_box();
        assert_eq!(b[0].lower_value(), Some(nr(3)));
        assert_eq!(b[0].upper_value(), Some(nr(4)));
    }

    #[test]
    fn substitute_drops_a_row_it_cannot_represent_exactly() {
        let p = Polyhedron::<NativeRat>::of_box(0, &[Interval::of_bounds(Some(nr(0)), Some(nr(1)))]);
        let mut e = LinExpr::new(Interval::of_bounds(Some(nr(0)), Some(nr(5))));
        e.set_coeff(0, Interval::point(nr(1)));
        // Not point-exact: the row mentioning dim 0 should be dropped,
        // leaving an unconstrained (top-like) result rather than an
        // incorrect exact substitution.
        let result = p.substitute_linexpr(0, &e);
        assert!(result.to_box()[0].is_top());
    }

    #[test]
    fn fold_preserves_bounds_on_unrelated_dimensions() {
        let iv = vec![
            Interval::of_bounds(Some(nr(0)), Some(nr(1))),
            Interval::of_bounds(Some(nr(0)), Some(nr(2))),
            Interval::of_bounds(Some(nr(0)), Some(nr(5))),
        ];
        let p = Polyhedron::<NativeRat>::of_box(0, &iv);
        let folded = p.fold(&[0, 1]).unwrap();
        assert_eq!(folded.dim(), 2);
        assert_eq!(folded.to_box()[1].upper_value(), Some(nr(5)));
    }
}
