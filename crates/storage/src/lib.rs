//! Storage Layer
//!
//! Worker record store used by risk assessment, with an in-memory repository.

mod repository;

pub use repository::{WorkerDraft, WorkerRecord, WorkerRepository, WorkerStore};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("Worker {0} not found")]
    NotFound(u64),
    #[error("Lock error: {0}")]
    LockPoisoned(String),
    #[error("Invalid worker record: {0}")]
    InvalidRecord(String),
}
