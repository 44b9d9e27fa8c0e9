//! Saturation bitmatrix: which generators lie exactly on which
//! constraints' hyperplanes.
//!
//! Recomputed from scratch whenever either matrix changes, per §4.3 of
//! this domain's design notes ("these are recomputed when either matrix
//! changes") rather than maintained incrementally — simpler to get right
//! and cheap enough at the sizes this crate targets.

use crate::matrix::dot;
use fixedbitset::FixedBitSet;
use numdom_core::Scalar;

/// `sat[g]` has bit `c` set iff generator `g` saturates constraint `c`
/// (their homogeneous dot product is zero).
pub fn saturation_rows<N: Scalar>(cons: &[Vec<N>], gens: &[Vec<N>]) -> Vec<FixedBitSet> {
    gens.iter()
        .map(|g| {
            let mut row = FixedBitSet::with_capacity(cons.len());
            for (c_idx, c) in cons.iter().enumerate() {
                if dot(c, g).is_zero() {
                    row.insert(c_idx);
                }
            }
            row
        })
        .collect()
}

pub fn bitset_and(a: &FixedBitSet, b: &FixedBitSet) -> FixedBitSet {
    let mut out = FixedBitSet::with_capacity(a.len());
    for i in a.ones() {
        if b.contains(i) {
            out.insert(i);
        }
    }
    out
}

pub fn is_superset(a: &FixedBitSet, b: &FixedBitSet) -> bool {
    b.ones().all(|i| a.contains(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use numdom_core::scalar::NativeInt;

    fn ni(n: i64) -> NativeInt {
        NativeInt(n)
    }

    #[test]
    fn saturation_detects_zero_dot_products() {
        // constraint x >= 0 (coeffs [0, 1]); generators at x=0 and x=1.
        let cons = vec![vec![ni(0), ni(1)]];
        let gens = vec![vec![ni(1), ni(0)], vec![ni(1), ni(1)]];
        let sat = saturation_rows(&cons, &gens);
        assert!(sat[0].contains(0));
        assert!(!sat[1].contains(0));
    }
}
