//! The octagon abstract value and its lattice operations.

use crate::closure::close;
use crate::halfmatrix::HalfMatrix;
use numdom_core::{Bound, Interval, Scalar};
use std::cell::RefCell;
use std::cmp::Ordering;

/// An octagon over `dim = intdim + realdim` dimensions.
///
/// Bottom is `m.is_none()`. A present `m` is the raw (possibly unclosed)
/// matrix; `closed` is a lazily computed cache of its shortest-path
/// closure, populated by [`Octagon::closed_matrix`]. Unlike the four-state
/// cache sketched in the source library, this workspace never drops `m`
/// once computed — an operation that needs the closed form always keeps
/// the raw matrix alongside it, so the `⊥c` (closed-only) state never
/// arises here. This is a deliberate simplification, recorded as an Open
/// Question resolution in DESIGN.md.
#[derive(Debug, Clone)]
pub struct Octagon<N: Scalar> {
    pub(crate) dim: usize,
    pub(crate) intdim: usize,
    pub(crate) m: Option<HalfMatrix<N>>,
    pub(crate) closed: RefCell<Option<HalfMatrix<N>>>,
}

impl<N: Scalar> Octagon<N> {
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn intdim(&self) -> usize {
        self.intdim
    }

    pub fn top(dim: usize, intdim: usize) -> Self {
        Octagon { dim, intdim, m: Some(HalfMatrix::top(dim)), closed: RefCell::new(None) }
    }

    pub fn bottom(dim: usize, intdim: usize) -> Self {
        Octagon { dim, intdim, m: None, closed: RefCell::new(None) }
    }

    pub fn of_box(intdim: usize, box_: &[Interval<N>]) -> Self {
        let dim = box_.len();
        let mut m = HalfMatrix::top(dim);
        let two = N::from_i64(2).0;
        for (k, iv) in box_.iter().enumerate() {
            if let Some(u) = iv.upper_value() {
                m.set(2 * k, 2 * k + 1, Bound::Finite(u.mul(&two)));
            }
            if let Some(l) = iv.lower_value() {
                m.set(2 * k + 1, 2 * k, Bound::Finite(l.neg().mul(&two)));
            }
        }
        let mut oct = Octagon { dim, intdim, m: Some(m), closed: RefCell::new(None) };
        if oct.closed_matrix().is_none() {
            oct = Octagon::bottom(dim, intdim);
        }
        oct
    }

    pub fn is_bottom(&self) -> bool {
        self.m.is_none() || self.closed_matrix().is_none()
    }

    pub fn is_top(&self) -> bool {
        match self.closed_matrix() {
            None => false,
            Some(c) => (0..c.n()).all(|i| {
                (0..c.n()).all(|j| i == j || c.get(i, j).is_infinite())
            }),
        }
    }

    /// A dimension is unconstrained iff it's finite-bounded nowhere in the
    /// closed matrix (every row/column touching it is `+inf`, aside from
    /// its own trivial diagonal).
    pub fn is_dimension_unconstrained(&self, d: usize) -> bool {
        match self.closed_matrix() {
            None => false,
            Some(c) => {
                let n = c.n();
                [2 * d, 2 * d + 1].iter().all(|&idx| {
                    (0..n).all(|other| other == idx || c.get(idx, other).is_infinite() && c.get(other, idx).is_infinite())
                })
            }
        }
    }

    /// True iff every concrete point of `self` has its `d`-th coordinate
    /// inside `interval`.
    pub fn sat_interval(&self, d: usize, interval: &Interval<N>) -> bool {
        if self.is_bottom() {
            return true;
        }
        self.to_box()[d].is_leq(interval)
    }

    /// N-ary meet, starting from top so an empty slice yields top.
    pub fn meet_array(dim: usize, intdim: usize, values: &[Self]) -> Self {
        values.iter().fold(Octagon::top(dim, intdim), |acc, v| acc.meet(v))
    }

    /// Lazily compute (and cache) the shortest-path closure of `m`.
    /// Returns `None` both when the value is already bottom and when
    /// closing discovers an inconsistency — both mean "treat as bottom"
    /// to every caller of this method.
    pub fn closed_matrix(&self) -> Option<HalfMatrix<N>> {
        let m = self.m.as_ref()?;
        if let Some(c) = self.closed.borrow().as_ref() {
            return Some(c.clone());
        }
        let mut mm = m.clone();
        let inconsistent = close(&mut mm, self.intdim);
        if inconsistent {
            return None;
        }
        *self.closed.borrow_mut() = Some(mm.clone());
        Some(mm)
    }

    pub fn to_box(&self) -> Vec<Interval<N>> {
        let two = N::from_i64(2).0;
        match self.closed_matrix() {
            None => vec![Interval::bottom(); self.dim],
            Some(c) => (0..self.dim)
                .map(|k| {
                    let upper = c.get(2 * k, 2 * k + 1).finite().map(|v| match v.div_exact(&two) {
                        Some(x) => x,
                        None => v.fdiv(&two),
                    });
                    let lower = c
                        .get(2 * k + 1, 2 * k)
                        .finite()
                        .map(|v| match v.div_exact(&two) {
                            Some(x) => x.neg(),
                            None => v.fdiv(&two).neg(),
                        });
                    Interval::of_bounds(lower, upper)
                })
                .collect(),
        }
    }

    pub fn is_leq(&self, other: &Self) -> bool {
        match (self.closed_matrix(), other.m.as_ref()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(a), Some(b)) => {
                (0..a.n()).all(|i| (0..a.n()).all(|j| a.get(i, j).cmp_bound(b.get(i, j)) != Ordering::Greater))
            }
        }
    }

    pub fn is_eq(&self, other: &Self) -> bool {
        self.is_leq(other) && other.is_leq(self)
    }

    /// Pointwise minimum of the raw matrices. Sound on any representation;
    /// may lose closedness.
    pub fn meet(&self, other: &Self) -> Self {
        match (&self.m, &other.m) {
            (None, _) | (_, None) => Octagon::bottom(self.dim, self.intdim),
            (Some(a), Some(b)) => {
                let mut m = a.clone();
                for (i, j) in m.iter_indices() {
                    m.tighten(i, j, b.get(i, j).clone());
                }
                let mut oct = Octagon { dim: self.dim, intdim: self.intdim, m: Some(m), closed: RefCell::new(None) };
                if oct.closed_matrix().is_none() {
                    oct = Octagon::bottom(self.dim, self.intdim);
                }
                oct
            }
        }
    }

    /// Pointwise maximum of the *closed* matrices; requires both operands
    /// to close successfully, and the result is closed.
    pub fn join(&self, other: &Self) -> Self {
        match (self.closed_matrix(), other.closed_matrix()) {
            (None, None) => Octagon::bottom(self.dim, self.intdim),
            (None, Some(_)) => other.clone(),
            (Some(_), None) => self.clone(),
            (Some(a), Some(b)) => {
                let mut m = a.clone();
                for (i, j) in m.iter_indices() {
                    m.set(i, j, a.get(i, j).max(b.get(i, j)));
                }
                Octagon { dim: self.dim, intdim: self.intdim, closed: RefCell::new(Some(m.clone())), m: Some(m) }
            }
        }
    }

    pub fn join_array(dim: usize, intdim: usize, values: &[Self]) -> Self {
        values.iter().fold(Octagon::bottom(dim, intdim), |acc, v| acc.join(v))
    }

    /// Standard octagon widening: keep `self`'s raw entry where it is
    /// already at least as tight as `other`'s, otherwise drop to `+inf`.
    /// Uses the *non-closed* matrix of `self` per the source library's
    /// convention (a pre-closed widening does not converge).
    pub fn widening(&self, other: &Self) -> Self {
        self.widening_with_thresholds(other, &[])
    }

    pub fn widening_with_thresholds(&self, other: &Self, thresholds: &[N]) -> Self {
        match (&self.m, &other.m) {
            (None, _) => other.clone(),
            (Some(_), None) => self.clone(),
            (Some(a), Some(b)) => {
                let mut m = a.clone();
                for (i, j) in m.iter_indices() {
                    let lhs = a.get(i, j);
                    let rhs = b.get(i, j);
                    if lhs.cmp_bound(rhs) != Ordering::Less {
                        continue;
                    }
                    let replacement = if thresholds.is_empty() {
                        Bound::Infinite
                    } else {
                        thresholds
                            .iter()
                            .filter(|t| Bound::Finite((*t).clone()).cmp_bound(rhs) != Ordering::Less)
                            .min_by(|x, y| x.cmp_scalar(y))
                            .map(|t| Bound::Finite(t.clone()))
                            .unwrap_or(Bound::Infinite)
                    };
                    m.set(i, j, replacement);
                }
                Octagon { dim: self.dim, intdim: self.intdim, m: Some(m), closed: RefCell::new(None) }
            }
        }
    }

    /// Dual of widening: replace an entry that widened to `+inf` in
    /// `self` with the (presumably tighter) entry from `other`.
    pub fn narrowing(&self, other: &Self) -> Self {
        match (&self.m, &other.m) {
            (None, _) => Octagon::bottom(self.dim, self.intdim),
            (Some(_), None) => self.clone(),
            (Some(a), Some(b)) => {
                let mut m = a.clone();
                for (i, j) in m.iter_indices() {
                    if a.get(i, j).is_infinite() {
                        m.set(i, j, b.get(i, j).clone());
                    }
                }
                Octagon { dim: self.dim, intdim: self.intdim, m: Some(m), closed: RefCell::new(None) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numdom_core::scalar::NativeRat;

    fn nr(n: i64) -> NativeRat {
        NativeRat::new(n, 1)
    }

    fn unit_bound(dim: usize, intdim: usize, i: usize, j: usize, v: i64) -> Octagon<NativeRat> {
        let mut m = HalfMatrix::top(dim);
        m.set(i, j, Bound::Finite(nr(v)));
        Octagon { dim, intdim, m: Some(m), closed: RefCell::new(None) }
    }

    #[test]
    fn join_of_two_boxes_is_tight_after_reclosure() {
        // m1 = {x<=1, y<=1}, m2 = {x<=2, y<=0}; join = {x<=2, y<=1, x+y<=3}.
        let mut m1 = HalfMatrix::<NativeRat>::top(2);
        m1.set(0, 1, Bound::Finite(nr(2))); // x <= 1 (2x <= 2)
        m1.set(2, 3, Bound::Finite(nr(2))); // y <= 1
        let o1 = Octagon { dim: 2, intdim: 0, m: Some(m1), closed: RefCell::new(None) };

        let mut m2 = HalfMatrix::<NativeRat>::top(2);
        m2.set(0, 1, Bound::Finite(nr(4))); // x <= 2
        m2.set(2, 3, Bound::Finite(nr(0))); // y <= 0
        let o2 = Octagon { dim: 2, intdim: 0, m: Some(m2), closed: RefCell::new(None) };

        let j = o1.join(&o2);
        let c = j.closed_matrix().unwrap();
        assert_eq!(*c.get(0, 1), Bound::Finite(nr(4))); // x <= 2
        assert_eq!(*c.get(2, 3), Bound::Finite(nr(2))); // y <= 1
        // Re-closure derives a finite x+y bound via strengthening even
        // though neither operand constrained x and y jointly.
        assert!(c.get(0, 3).is_finite());
    }

    #[test]
    fn widening_drops_entries_that_tightened() {
        let a = unit_bound(1, 0, 0, 1, 2); // x <= 1
        let b = unit_bound(1, 0, 0, 1, 4); // x <= 2
        let w = a.widening(&b);
        assert!(w.m.as_ref().unwrap().get(0, 1).is_infinite());
    }

    #[test]
    fn is_leq_holds_for_bottom_against_anything() {
        let bot = Octagon::<NativeRat>::bottom(2, 0);
        let top = Octagon::<NativeRat>::top(2, 0);
        assert!(bot.is_leq(&top));
    }
}
