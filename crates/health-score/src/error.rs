//! Health Policy Error Types

use thiserror::Error;

/// Errors in a tuned `HealthPolicy`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("Penalty '{field}' must be a finite non-negative number, got {value}")]
    InvalidPenalty { field: String, value: f64 },

    #[error("Count cap must be at least 1, got {0}")]
    InvalidCountCap(f64),
}
