//! Numeric backends, bounds, intervals, and interval-linear expressions
//! shared by the polyhedra ([`numdom_poly`](../numdom_poly/index.html))
//! and octagon ([`numdom_oct`](../numdom_oct/index.html)) abstract
//! domains.
//!
//! This crate replaces the source library's macro-selected `NUM_T`/
//! `BOUND_T`/`itv_t` layer with ordinary generics over the [`Scalar`]
//! trait: each domain crate is generic over `N: Scalar` and gets
//! monomorphized once per backend instead of being recompiled from a
//! macro header per backend.

pub mod bound;
pub mod error;
pub mod interval;
pub mod linearize;
pub mod linexpr;
pub mod manager;
pub mod scalar;

pub use bound::Bound;
pub use error::ExceptionKind;
pub use interval::Interval;
pub use linexpr::{ConsKind, LinCons, LinExpr, LinTerm};
pub use manager::{Algorithm, Manager, Options, WideningThresholdMode};
pub use scalar::Scalar;
