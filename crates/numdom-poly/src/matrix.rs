//! Constraint and generator matrices in homogeneous coordinates.
//!
//! Every row is a `dim + 1`-length coefficient vector: index 0 is the
//! homogenizing column (the constant term `b` for a constraint `a·x+b ⋚ 0`,
//! the denominator for a generator — zero for a ray or line, positive for
//! a vertex); indices `1..=dim` are the per-dimension coefficients. Using
//! one homogeneous layout for both families is what lets
//! [`crate::chernikova::incorporate`] run the identical update rule in
//! either direction of the double description.

use numdom_core::Scalar;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsKind {
    Eq,
    Geq,
    /// Strict `> 0`. Folded into `Geq` for generator-system purposes (a
    /// documented over-approximation — see `DESIGN.md`); `sat_lincons`
    /// still distinguishes it when testing a concrete generator.
    Gt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenKind {
    Vertex,
    Ray,
    Line,
}

#[derive(Debug, Clone)]
pub struct ConsRow<N: Scalar> {
    pub kind: ConsKind,
    pub coeffs: Vec<N>,
}

impl<N: Scalar> ConsRow<N> {
    pub fn new(kind: ConsKind, coeffs: Vec<N>) -> Self {
        ConsRow { kind, coeffs }
    }
}

#[derive(Debug, Clone)]
pub struct GenRow<N: Scalar> {
    pub kind: GenKind,
    pub coeffs: Vec<N>,
}

impl<N: Scalar> GenRow<N> {
    pub fn new(kind: GenKind, coeffs: Vec<N>) -> Self {
        GenRow { kind, coeffs }
    }

    pub fn is_line(&self) -> bool {
        self.kind == GenKind::Line
    }
}

#[derive(Debug, Clone)]
pub struct ConsMatrix<N: Scalar> {
    pub dim: usize,
    pub rows: Vec<ConsRow<N>>,
}

#[derive(Debug, Clone)]
pub struct GenMatrix<N: Scalar> {
    pub dim: usize,
    pub rows: Vec<GenRow<N>>,
}

impl<N: Scalar> ConsMatrix<N> {
    pub fn empty(dim: usize) -> Self {
        ConsMatrix { dim, rows: Vec::new() }
    }
}

impl<N: Scalar> GenMatrix<N> {
    pub fn empty(dim: usize) -> Self {
        GenMatrix { dim, rows: Vec::new() }
    }

    /// The generator system of unconstrained space: the origin vertex plus
    /// one line per dimension (every direction free both ways).
    pub fn universe(dim: usize) -> Self {
        let mut rows = vec![GenRow::new(GenKind::Vertex, {
            let mut c = vec![N::zero(); dim + 1];
            c[0] = N::one();
            c
        })];
        for k in 0..dim {
            let mut c = vec![N::zero(); dim + 1];
            c[k + 1] = N::one();
            rows.push(GenRow::new(GenKind::Line, c));
        }
        GenMatrix { dim, rows }
    }
}

/// Homogeneous dot product: `sum_k a[k] * b[k]`, including the column-0
/// (constant/denominator) term.
pub fn dot<N: Scalar>(a: &[N], b: &[N]) -> N {
    let mut acc = N::zero();
    for (x, y) in a.iter().zip(b.iter()) {
        acc = acc.add(&x.mul(y));
    }
    acc
}

/// Reduce `row` by the gcd of its nonzero entries, in place. A no-op on
/// backends without exact division (the row is left as computed).
pub fn normalize_row<N: Scalar>(row: &mut [N]) {
    let mut g: Option<N> = None;
    for c in row.iter() {
        if c.is_zero() {
            continue;
        }
        g = Some(match g {
            None => c.abs(),
            Some(acc) => acc.gcd(&c.abs()),
        });
    }
    let Some(g) = g else { return };
    if g.is_zero() || g.cmp_scalar(&N::one()) == Ordering::Equal {
        return;
    }
    for c in row.iter_mut() {
        if let Some(q) = c.div_exact(&g) {
            *c = q;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numdom_core::scalar::NativeInt;

    fn ni(n: i64) -> NativeInt {
        NativeInt(n)
    }

    #[test]
    fn universe_has_one_vertex_and_dim_lines() {
        let g = GenMatrix::<NativeInt>::universe(3);
        assert_eq!(g.rows.len(), 4);
        assert_eq!(g.rows.iter().filter(|r| r.kind == GenKind::Line).count(), 3);
    }

    #[test]
    fn normalize_row_divides_by_the_gcd() {
        let mut row = vec![ni(4), ni(6), ni(8)];
        normalize_row(&mut row);
        assert_eq!(row, vec![ni(2), ni(3), ni(4)]);
    }

    #[test]
    fn dot_includes_the_homogenizing_column() {
        // constraint `x + 2 >= 0` against vertex at x=1 (denom 1): 1*1 + 2*1 = 3.
        let cons = vec![ni(2), ni(1)];
        let gen = vec![ni(1), ni(1)];
        assert_eq!(dot(&cons, &gen), ni(3));
    }
}
