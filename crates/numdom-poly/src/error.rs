//! Polyhedra-domain error taxonomy, mirroring `numdom_oct::OctError`'s
//! two-layer convention (richer enum internally, collapsed to
//! [`ExceptionKind`] at the operation boundary).

use numdom_core::ExceptionKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolyError {
    #[error("dimension {found} out of range for a polyhedron of dimension {dim}")]
    DimensionOutOfRange { found: usize, dim: usize },

    #[error("expected {expected} dimensions for {op}, got {found}")]
    DimensionCountMismatch { op: &'static str, expected: usize, found: usize },

    #[error("coefficient exceeded the configured size bound during {op}")]
    CoefficientOverflow { op: &'static str },

    #[error("algorithm variant not implemented: {0}")]
    NotImplemented(String),
}

impl From<PolyError> for ExceptionKind {
    fn from(err: PolyError) -> Self {
        match &err {
            PolyError::DimensionOutOfRange { .. } | PolyError::DimensionCountMismatch { .. } => {
                ExceptionKind::InvalidArgument(err.to_string())
            }
            PolyError::CoefficientOverflow { .. } => ExceptionKind::OutOfSpace(err.to_string()),
            PolyError::NotImplemented(_) => ExceptionKind::NotImplemented(err.to_string()),
        }
    }
}

pub type PolyResult<T> = Result<T, PolyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_converts_to_out_of_space() {
        let err = PolyError::CoefficientOverflow { op: "meet" };
        let kind: ExceptionKind = err.into();
        assert!(matches!(kind, ExceptionKind::OutOfSpace(_)));
    }
}
