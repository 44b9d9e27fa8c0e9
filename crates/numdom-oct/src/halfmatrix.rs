//! Packed half-matrix of octagon bounds.
//!
//! Dimension `k` is split into two indices: `2k` for `+xₖ` and `2k+1` for
//! `-xₖ`. Only the half with `j <= i` is stored; [`matpos2`] folds an
//! arbitrary `(i, j)` into that half using the `m[i,j] = m[j^1, i^1]`
//! symmetry every octagon bound matrix satisfies.

use numdom_core::Bound;
use numdom_core::Scalar;

/// Index of `(i, j)` within the stored lower triangle. Ordinarily `j <=
/// i`, but [`matpos2`] also reaches this with `j > i` for the single
/// self-dual pair `(2k, 2k+1)` (its own fold target under the `i^1`/`j^1`
/// symmetry); the formula still yields a unique, in-bounds slot there, so
/// this does not assert the ordering.
pub fn matpos(i: usize, j: usize) -> usize {
    j + (i + 1) * (i + 1) / 2
}

/// Index of `(i, j)` for arbitrary `i, j`, folding through the `i^1`/`j^1`
/// symmetry when `(i, j)` falls in the unstored half.
pub fn matpos2(i: usize, j: usize) -> usize {
    if i >= j {
        matpos(i, j)
    } else {
        matpos(j ^ 1, i ^ 1)
    }
}

#[derive(Debug, Clone)]
pub struct HalfMatrix<N: Scalar> {
    dim: usize,
    data: Vec<Bound<N>>,
}

impl<N: Scalar> HalfMatrix<N> {
    /// The matrix of an unconstrained octagon: every off-diagonal entry
    /// infinite, every diagonal entry zero (the trivial `vᵢ - vᵢ ≤ 0`).
    pub fn top(dim: usize) -> Self {
        let n = 2 * dim;
        let len = if n == 0 { 0 } else { matpos(n - 1, n - 1) + 1 };
        let mut data = vec![Bound::Infinite; len];
        for i in 0..n {
            data[matpos(i, i)] = Bound::zero();
        }
        HalfMatrix { dim, data }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn n(&self) -> usize {
        2 * self.dim
    }

    pub fn get(&self, i: usize, j: usize) -> &Bound<N> {
        &self.data[matpos2(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, v: Bound<N>) {
        let idx = matpos2(i, j);
        self.data[idx] = v;
    }

    /// Tighten `(i, j)` to `v` only if `v` is strictly smaller.
    pub fn tighten(&mut self, i: usize, j: usize, v: Bound<N>) -> bool {
        use std::cmp::Ordering;
        if v.cmp_bound(self.get(i, j)) == Ordering::Less {
            self.set(i, j, v);
            true
        } else {
            false
        }
    }

    pub fn iter_indices(&self) -> impl Iterator<Item = (usize, usize)> {
        let n = self.n();
        (0..n).flat_map(move |i| (0..n).map(move |j| (i, j)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numdom_core::scalar::NativeRat;

    #[test]
    fn matpos2_respects_the_symmetric_fold() {
        // m[i,j] and m[j^1,i^1] must land on the same storage slot.
        assert_eq!(matpos2(3, 1), matpos2(0, 2));
    }

    #[test]
    fn top_has_zero_diagonal_and_infinite_elsewhere() {
        let m = HalfMatrix::<NativeRat>::top(2);
        for i in 0..m.n() {
            assert_eq!(*m.get(i, i), Bound::zero());
        }
        assert!(m.get(0, 2).is_infinite());
    }
}
