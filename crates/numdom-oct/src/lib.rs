//! Octagon abstract domain: relations of the form `±xᵢ ± xⱼ ≤ c`.
//!
//! Values are stored as a packed half-matrix ([`halfmatrix`]) over
//! `2*dim` indices (one pair per dimension, for `+xᵢ` and `-xᵢ`); the
//! domain's closure ([`closure`]) is the Floyd-Warshall shortest-path
//! algorithm plus the octagon-specific strengthening step described in
//! `numdom-core`'s sibling polyhedra crate's design notes. [`value`]
//! assembles the lattice operations on top of the closure, and
//! [`transfer`] adds constraint ingestion, assignment, and the
//! dimension-manipulation operations.

pub mod closure;
pub mod error;
pub mod halfmatrix;
pub mod transfer;
pub mod value;

pub use error::{OctError, OctResult};
pub use halfmatrix::HalfMatrix;
pub use value::Octagon;
