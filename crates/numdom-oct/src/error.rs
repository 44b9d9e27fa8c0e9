//! Octagon-domain error taxonomy.
//!
//! Richer than the manager's [`numdom_core::ExceptionKind`] for internal
//! propagation; converts into it at the operation boundary, following the
//! two-layer convention of this workspace's numeric-algorithm crates.

use numdom_core::ExceptionKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OctError {
    #[error("dimension {found} out of range for an octagon of dimension {dim}")]
    DimensionOutOfRange { found: usize, dim: usize },

    #[error("expected {expected} dimensions to {op}, got {found}")]
    DimensionCountMismatch { op: &'static str, expected: usize, found: usize },

    #[error("linear expression not in a form this operation accepts: {0}")]
    UnsupportedExpression(String),

    #[error("algorithm variant not implemented: {0}")]
    NotImplemented(String),
}

impl From<OctError> for ExceptionKind {
    fn from(err: OctError) -> Self {
        match &err {
            OctError::DimensionOutOfRange { .. } | OctError::DimensionCountMismatch { .. } => {
                ExceptionKind::InvalidArgument(err.to_string())
            }
            OctError::UnsupportedExpression(_) => ExceptionKind::InvalidArgument(err.to_string()),
            OctError::NotImplemented(_) => ExceptionKind::NotImplemented(err.to_string()),
        }
    }
}

pub type OctResult<T> = Result<T, OctError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_invalid_argument() {
        let err = OctError::DimensionOutOfRange { found: 5, dim: 2 };
        let kind: ExceptionKind = err.into();
        assert!(matches!(kind, ExceptionKind::InvalidArgument(_)));
    }
}
