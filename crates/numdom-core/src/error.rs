//! Error taxonomy shared by every domain crate.
//!
//! [`ExceptionKind`] is the small, flat classification surfaced at the
//! manager boundary (see [`crate::manager`]); domain crates keep their own
//! richer internal error enum and convert into this one only when an
//! operation actually fails and must report through the manager.

use thiserror::Error;

/// Boundary exception kinds, mirroring the catalog every operation can raise.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExceptionKind {
    /// Dimension mismatch, or an expression shape the operation does not accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A coefficient or matrix grew past the configured size bound.
    #[error("out of space: {0}")]
    OutOfSpace(String),

    /// The requested algorithm variant is unavailable.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A native-integer backend saturated; the result has been set to top.
    #[error("overflow: {0}")]
    Overflow(String),

    /// Reserved for API parity with the manager boundary's exception
    /// catalog; this core never raises it (no operation here suspends or
    /// runs on a clock).
    #[error("timeout: {0}")]
    Timeout(String),
}

impl ExceptionKind {
    pub fn is_out_of_space(&self) -> bool {
        matches!(self, ExceptionKind::OutOfSpace(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_label() {
        let err = ExceptionKind::OutOfSpace("coefficient exceeded 4096 bits".into());
        assert!(err.to_string().contains("out of space"));
        assert!(err.to_string().contains("4096 bits"));
    }
}
