//! Convex polyhedra abstract domain: the double-description method
//! (Chernikova conversion) between a constraint matrix and a generator
//! matrix, a saturation bitmatrix relating the two, and the polyhedra
//! transfer operations built on top of them.
//!
//! [`matrix`] defines the homogeneous row representation shared by both
//! matrices; [`saturation`] computes the bitmatrix relating them;
//! [`chernikova`] is the incremental conversion between the two; [`value`]
//! assembles the lattice operations, and [`transfer`] adds assignment,
//! substitution, and dimension-manipulation.

pub mod chernikova;
pub mod error;
pub mod matrix;
pub mod saturation;
pub mod transfer;
pub mod value;

pub use error::{PolyError, PolyResult};
pub use matrix::{ConsKind, ConsRow, GenKind, GenRow};
pub use value::Polyhedron;
