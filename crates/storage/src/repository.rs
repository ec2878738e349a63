//! Repository Implementation

use crate::StorageError;
use health_score::WorkerProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Stored worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub id: u64,
    pub full_name: String,
    pub position: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(flatten)]
    pub profile: WorkerProfile,
}

/// Worker data supplied on insert or update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerDraft {
    pub full_name: String,
    pub position: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(flatten)]
    pub profile: WorkerProfile,
}

impl WorkerDraft {
    pub fn new(full_name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            position: position.into(),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), StorageError> {
        if self.full_name.trim().is_empty() {
            return Err(StorageError::InvalidRecord("full name is empty".to_string()));
        }
        Ok(())
    }

    fn into_record(self, id: u64) -> WorkerRecord {
        WorkerRecord {
            id,
            full_name: self.full_name.trim().to_string(),
            position: self.position.trim().to_string(),
            department: self.department,
            profile: self.profile,
        }
    }
}

/// Record store operations consumed by risk assessment
pub trait WorkerStore {
    /// All workers ordered by name
    fn list_workers(&self) -> Result<Vec<WorkerRecord>, StorageError>;

    fn get_worker(&self, id: u64) -> Result<WorkerRecord, StorageError>;

    /// Insert and return the new id
    fn add_worker(&self, draft: WorkerDraft) -> Result<u64, StorageError>;

    fn update_worker(&self, id: u64, draft: WorkerDraft) -> Result<(), StorageError>;

    fn delete_worker(&self, id: u64) -> Result<(), StorageError>;

    /// Case-insensitive match on name, position or department; blank matches all
    fn search_workers(&self, query: &str) -> Result<Vec<WorkerRecord>, StorageError>;
}

/// In-memory worker repository
pub struct WorkerRepository {
    workers: Mutex<BTreeMap<u64, WorkerRecord>>,
    /// Next worker ID
    next_id: Mutex<u64>,
}

impl WorkerRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        info!("Creating in-memory worker repository");
        Self {
            workers: Mutex::new(BTreeMap::new()),
            next_id: Mutex::new(1),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<u64, WorkerRecord>>, StorageError> {
        self.workers
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))
    }

    /// Get total worker count
    pub fn count(&self) -> usize {
        self.workers.lock().map(|w| w.len()).unwrap_or(0)
    }

    /// Clear all data
    pub fn clear(&self) {
        if let Ok(mut workers) = self.workers.lock() {
            workers.clear();
        }
    }
}

impl Default for WorkerRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted_by_name(mut workers: Vec<WorkerRecord>) -> Vec<WorkerRecord> {
    workers.sort_by(|a, b| {
        a.full_name
            .to_lowercase()
            .cmp(&b.full_name.to_lowercase())
            .then(a.id.cmp(&b.id))
    });
    workers
}

impl WorkerStore for WorkerRepository {
    fn list_workers(&self) -> Result<Vec<WorkerRecord>, StorageError> {
        let workers = self.lock()?;
        Ok(sorted_by_name(workers.values().cloned().collect()))
    }

    fn get_worker(&self, id: u64) -> Result<WorkerRecord, StorageError> {
        self.lock()?
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound(id))
    }

    fn add_worker(&self, draft: WorkerDraft) -> Result<u64, StorageError> {
        draft.validate()?;
        let mut workers = self.lock()?;

        let mut next_id = self
            .next_id
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        let id = *next_id;
        *next_id += 1;

        workers.insert(id, draft.into_record(id));
        debug!("Inserted worker with ID {}", id);
        Ok(id)
    }

    fn update_worker(&self, id: u64, draft: WorkerDraft) -> Result<(), StorageError> {
        draft.validate()?;
        let mut workers = self.lock()?;
        let slot = workers.get_mut(&id).ok_or(StorageError::NotFound(id))?;
        *slot = draft.into_record(id);
        debug!("Updated worker {}", id);
        Ok(())
    }

    fn delete_worker(&self, id: u64) -> Result<(), StorageError> {
        self.lock()?
            .remove(&id)
            .ok_or(StorageError::NotFound(id))?;
        debug!("Deleted worker {}", id);
        Ok(())
    }

    fn search_workers(&self, query: &str) -> Result<Vec<WorkerRecord>, StorageError> {
        let query = query.trim().to_lowercase();
        let workers = self.lock()?;

        let matches = workers
            .values()
            .filter(|w| {
                query.is_empty()
                    || w.full_name.to_lowercase().contains(&query)
                    || w.position.to_lowercase().contains(&query)
                    || w
                        .department
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&query))
            })
            .cloned()
            .collect();

        Ok(sorted_by_name(matches))
    }
}
