//! Assessment Error Types

use fuzzy_engine::ConfigError;
use health_score::PolicyError;
use storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the assessment facade
#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Fuzzy configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Health policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
