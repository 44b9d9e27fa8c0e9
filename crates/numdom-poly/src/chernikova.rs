//! Incremental double-description (Chernikova) conversion.
//!
//! [`incorporate`] is the single update rule behind both directions of the
//! conversion: folding a new constraint into a generator system, and
//! (dually, with the row families swapped) folding a new generator into a
//! constraint system. The two directions are algebraically the same
//! operation — a hyperplane in primal space is a point in the dual, and
//! vice versa — so one routine serves both; [`fold_constraint`] and
//! [`fold_generator`] are thin, direction-specific callers that keep their
//! own running list of the *other* family to recompute saturation against.

use crate::matrix::{dot, normalize_row, ConsKind, ConsRow, GenKind, GenRow};
use crate::saturation::{bitset_and, is_superset, saturation_rows};
use fixedbitset::FixedBitSet;
use numdom_core::Scalar;

/// One row of the family being updated, with whether it is "bidirectional"
/// (a generator line, or a constraint equality) — such rows get the
/// single-representative elimination treatment; all other rows ("directed":
/// rays/vertices, or Geq/Gt constraints) get the plus/null/minus partition.
struct Row<N: Scalar> {
    coeffs: Vec<N>,
    bidir: bool,
}

/// Fold one new directed (never bidirectional) row `new_coeffs` into
/// `existing`, using `sat` (one bitset per row of `existing`, over the
/// other family's rows already incorporated) only for the adjacency test.
fn incorporate<N: Scalar>(existing: Vec<Row<N>>, sat: &[FixedBitSet], new_coeffs: &[N]) -> Vec<Row<N>> {
    let dots: Vec<N> = existing.iter().map(|r| dot(new_coeffs, &r.coeffs)).collect();

    if let Some(i0) = existing.iter().enumerate().position(|(i, r)| r.bidir && !dots[i].is_zero()) {
        let s0 = dots[i0].clone();
        let base = existing[i0].coeffs.clone();
        let mut out = Vec::with_capacity(existing.len());
        for (i, row) in existing.into_iter().enumerate() {
            if i == i0 {
                continue;
            }
            let si = &dots[i];
            if si.is_zero() {
                out.push(row);
                continue;
            }
            // row*s0 - base*si zeroes the dot regardless of row kind, so
            // this single elimination handles lines and directed rows alike.
            let mut combined: Vec<N> =
                row.coeffs.iter().zip(base.iter()).map(|(c, b)| s0.mul(c).sub(&si.mul(b))).collect();
            normalize_row(&mut combined);
            out.push(Row { coeffs: combined, bidir: row.bidir });
        }
        // i0 itself can't have canceled (s0 != 0): it becomes a directed
        // row, sign-corrected onto the positive side of the new hyperplane.
        let mut repr = base;
        if s0.is_neg() {
            for c in repr.iter_mut() {
                *c = c.neg();
            }
        }
        normalize_row(&mut repr);
        out.push(Row { coeffs: repr, bidir: false });
        return out;
    }

    let mut out = Vec::new();
    let mut plus = Vec::new();
    let mut minus = Vec::new();
    for (i, row) in existing.iter().enumerate() {
        let d = &dots[i];
        if row.bidir || d.is_zero() {
            out.push(Row { coeffs: row.coeffs.clone(), bidir: row.bidir });
        } else if d.is_pos() {
            plus.push(i);
            out.push(Row { coeffs: row.coeffs.clone(), bidir: false });
        } else {
            minus.push(i);
        }
    }
    for &p in &plus {
        for &m in &minus {
            let common = bitset_and(&sat[p], &sat[m]);
            let adjacent = !(0..sat.len()).any(|k| k != p && k != m && is_superset(&sat[k], &common));
            if !adjacent {
                continue;
            }
            let sp = &dots[p];
            let sm = &dots[m];
            let mut combined: Vec<N> =
                existing[m].coeffs.iter().zip(existing[p].coeffs.iter()).map(|(gm, gp)| sp.mul(gm).sub(&sm.mul(gp))).collect();
            normalize_row(&mut combined);
            out.push(Row { coeffs: combined, bidir: false });
        }
    }
    out
}

fn gen_kind_of<N: Scalar>(coeffs: &[N], bidir: bool) -> GenKind {
    if bidir {
        GenKind::Line
    } else if coeffs[0].is_zero() {
        GenKind::Ray
    } else {
        GenKind::Vertex
    }
}

/// Fold all of `cons` (in order) into the generator system `gens`,
/// starting from `gens`'s current contents. Matches §4.3's incremental
/// description: each constraint's directed form(s) are incorporated one
/// at a time, recomputing saturation against the constraints incorporated
/// so far.
pub fn fold_constraints<N: Scalar>(dim: usize, gens: Vec<GenRow<N>>, cons: &[ConsRow<N>]) -> Vec<GenRow<N>> {
    let mut rows: Vec<Row<N>> = gens.into_iter().map(|g| Row { bidir: g.is_line(), coeffs: g.coeffs }).collect();
    let mut processed_cons: Vec<Vec<N>> = Vec::new();
    for c in cons {
        let gen_coeffs: Vec<Vec<N>> = rows.iter().map(|r| r.coeffs.clone()).collect();
        let sat = saturation_rows(&processed_cons, &gen_coeffs);
        match c.kind {
            ConsKind::Eq => {
                rows = incorporate(rows, &sat, &c.coeffs);
                let gen_coeffs: Vec<Vec<N>> = rows.iter().map(|r| r.coeffs.clone()).collect();
                let mut neg_cons = processed_cons.clone();
                neg_cons.push(c.coeffs.clone());
                let sat2 = saturation_rows(&neg_cons, &gen_coeffs);
                let neg: Vec<N> = c.coeffs.iter().map(|x| x.neg()).collect();
                rows = incorporate(rows, &sat2, &neg);
            }
            ConsKind::Geq | ConsKind::Gt => {
                rows = incorporate(rows, &sat, &c.coeffs);
            }
        }
        processed_cons.push(c.coeffs.clone());
        if c.kind == ConsKind::Eq {
            processed_cons.push(c.coeffs.iter().map(|x| x.neg()).collect());
        }
    }
    let _ = dim;
    rows.into_iter().map(|r| GenRow::new(gen_kind_of(&r.coeffs, r.bidir), r.coeffs)).collect()
}

fn cons_kind_of(bidir: bool) -> ConsKind {
    if bidir {
        ConsKind::Eq
    } else {
        ConsKind::Geq
    }
}

/// Dual of [`fold_constraints`]: derive a (sound, possibly non-minimal)
/// constraint system from a generator system by folding each generator in,
/// starting from the unconstrained (empty) constraint system. Used when a
/// value was built purely on the generator side (e.g. `join`) and a later
/// operation needs its constraints.
pub fn constraints_from_generators<N: Scalar>(dim: usize, gens: &[GenRow<N>]) -> Vec<ConsRow<N>> {
    let mut rows: Vec<Row<N>> = Vec::new();
    let mut processed_gens: Vec<Vec<N>> = Vec::new();
    for g in gens {
        let cons_coeffs: Vec<Vec<N>> = rows.iter().map(|r| r.coeffs.clone()).collect();
        let sat = saturation_rows(&processed_gens, &cons_coeffs);
        // Transpose convention: saturation_rows(cons, gens) takes "cons"
        // as the column family; here the already-incorporated generators
        // play that role and the evolving constraints are the "gens" arg,
        // which is exactly the bit we need (bit set iff that constraint
        // row saturates generator `g_processed`).
        rows = incorporate(rows, &sat, &g.coeffs);
        processed_gens.push(g.coeffs.clone());
    }
    let _ = dim;
    rows.into_iter().map(|r| ConsRow::new(cons_kind_of(r.bidir), r.coeffs)).collect()
}
