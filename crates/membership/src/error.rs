//! Membership Error Types

use thiserror::Error;

/// Errors raised while building shapes or universes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MembershipError {
    /// Shape name not recognised
    #[error("Unknown membership function type: {0}")]
    UnknownShape(String),

    /// Parameter list has the wrong length for the shape
    #[error("{kind} expects {expected} parameters, got {actual}")]
    WrongArity {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Parameter value is not usable for the shape
    #[error("Invalid {kind} parameters: {reason}")]
    InvalidParameter { kind: &'static str, reason: String },

    /// Universe bounds or step are malformed
    #[error("Invalid universe [{lo}, {hi}] with step {step}")]
    InvalidUniverse { lo: f64, hi: f64, step: f64 },
}
