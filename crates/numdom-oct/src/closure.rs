//! Floyd-Warshall shortest-path closure with octagon strengthening.

use crate::halfmatrix::HalfMatrix;
use numdom_core::Scalar;

/// Full closure, cubic in `dim`. Returns `true` if the octagon is
/// inconsistent (empty) after closing.
pub fn close<N: Scalar>(m: &mut HalfMatrix<N>, intdim: usize) -> bool {
    let n = m.n();
    for k in 0..n {
        relax_through(m, k);
    }
    strengthen(m);
    if intdim > 0 {
        tighten_integers(m, intdim);
    }
    is_inconsistent(m)
}

/// Re-close after a single variable `v` changed: only `v`'s two indices
/// can have introduced a shorter path, so the outer Floyd-Warshall loop
/// only needs those two values of `k`; the strengthening pass still runs
/// over every `(i, j)` since strengthening mixes in every row.
pub fn close_incremental<N: Scalar>(m: &mut HalfMatrix<N>, intdim: usize, v: usize) -> bool {
    relax_through(m, 2 * v);
    relax_through(m, 2 * v + 1);
    strengthen(m);
    if intdim > 0 {
        tighten_integers(m, intdim);
    }
    is_inconsistent(m)
}

fn relax_through<N: Scalar>(m: &mut HalfMatrix<N>, k: usize) {
    let n = m.n();
    for i in 0..n {
        let mik = m.get(i, k).clone();
        if mik.is_infinite() {
            continue;
        }
        for j in 0..n {
            let mkj = m.get(k, j).clone();
            if mkj.is_infinite() {
                continue;
            }
            let via_k = mik.add(&mkj);
            m.tighten(i, j, via_k);
        }
    }
}

fn strengthen<N: Scalar>(m: &mut HalfMatrix<N>) {
    let n = m.n();
    let halves: Vec<Vec<numdom_core::Bound<N>>> = (0..n)
        .map(|i| (0..n).map(|j| m.get(i, i ^ 1).add(&m.get(j ^ 1, j)).half()).collect())
        .collect();
    for i in 0..n {
        for j in 0..n {
            m.tighten(i, j, halves[i][j].clone());
        }
    }
}

/// `m[2k, 2k+1]` bounds `2*xₖ`; for an integer `xₖ` that bound must be an
/// even integer, so it can be floored down to the nearest even value
/// without losing soundness (and symmetrically for `m[2k+1, 2k]`).
fn tighten_integers<N: Scalar>(m: &mut HalfMatrix<N>, intdim: usize) {
    let two = N::from_i64(2).0;
    for k in 0..intdim {
        let (i, j) = (2 * k, 2 * k + 1);
        for &(a, b) in &[(i, j), (j, i)] {
            if let numdom_core::Bound::Finite(n) = m.get(a, b).clone() {
                let floored_half = n.fdiv(&two);
                let tightened = floored_half.mul(&two);
                m.tighten(a, b, numdom_core::Bound::Finite(tightened));
            }
        }
    }
}

fn is_inconsistent<N: Scalar>(m: &HalfMatrix<N>) -> bool {
    (0..m.n()).any(|i| m.get(i, i).sgn() < 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use numdom_core::scalar::NativeRat;
    use numdom_core::Bound;

    fn nr(n: i64) -> NativeRat {
        NativeRat::new(n, 1)
    }

    #[test]
    fn detects_inconsistency_from_a_negative_cycle() {
        // x - y <= 1, y - z <= 1, z - x <= -3  =>  x - x <= -1.
        let mut m = HalfMatrix::<NativeRat>::top(3);
        // x=dim0 (idx 0/1), y=dim1 (idx2/3), z=dim2(idx4/5).
        m.set(0, 2, Bound::Finite(nr(1))); // x - y <= 1
        m.set(2, 4, Bound::Finite(nr(1))); // y - z <= 1
        m.set(4, 0, Bound::Finite(nr(-3))); // z - x <= -3
        assert!(close(&mut m, 0));
    }

    #[test]
    fn closure_is_idempotent() {
        let mut m = HalfMatrix::<NativeRat>::top(2);
        m.set(0, 2, Bound::Finite(nr(5)));
        m.set(2, 0, Bound::Finite(nr(3)));
        close(&mut m, 0);
        let once = m.clone();
        close(&mut m, 0);
        for (i, j) in m.iter_indices() {
            assert_eq!(m.get(i, j), once.get(i, j));
        }
    }

    #[test]
    fn integer_tightening_rounds_to_even() {
        let mut m = HalfMatrix::<NativeRat>::top(1);
        // x <= 2.5 encoded as m[0,1] = 5 (bounds 2x).
        m.set(0, 1, Bound::Finite(nr(5)));
        close(&mut m, 1);
        assert_eq!(*m.get(0, 1), Bound::Finite(nr(4)));
    }
}
