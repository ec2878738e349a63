//! Shared Engine Slot
//!
//! Holds the currently installed engine. Readers clone an `Arc` and run
//! against that snapshot; a reload validates the new configuration fully
//! before swapping it in, so a failed reload leaves the old engine serving.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use crate::document::FuzzyDocument;
use crate::engine::{RiskAssessment, RiskEngine, RiskInputs};
use crate::loader::ConfigLoader;
use crate::{ConfigError, EvaluationError};

/// Thread-safe holder for the active `RiskEngine`
#[derive(Debug, Default)]
pub struct EngineHandle {
    current: RwLock<Option<Arc<RiskEngine>>>,
}

impl EngineHandle {
    /// An unconfigured handle
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle with an engine already installed
    pub fn with_engine(engine: RiskEngine) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(engine))),
        }
    }

    /// Replace the active engine, returning the previous one
    pub fn install(&self, engine: RiskEngine) -> Option<Arc<RiskEngine>> {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        slot.replace(Arc::new(engine))
    }

    /// Build from a document and install on success
    pub fn reload(&self, document: &FuzzyDocument) -> Result<(), ConfigError> {
        self.swap_in(ConfigLoader::from_document(document))
    }

    /// Build from a JSON string and install on success
    pub fn reload_str(&self, json: &str) -> Result<(), ConfigError> {
        self.swap_in(ConfigLoader::load_str(json))
    }

    /// Build from a JSON file and install on success
    pub fn reload_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        self.swap_in(ConfigLoader::load_file(path))
    }

    fn swap_in(&self, built: Result<RiskEngine, ConfigError>) -> Result<(), ConfigError> {
        match built {
            Ok(engine) => {
                self.install(engine);
                info!("Installed new fuzzy system");
                Ok(())
            }
            Err(e) => {
                if self.is_ready() {
                    warn!("Reload rejected, keeping active fuzzy system: {}", e);
                }
                Err(e)
            }
        }
    }

    /// Snapshot of the active engine
    pub fn current(&self) -> Option<Arc<RiskEngine>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_ready(&self) -> bool {
        self.current().is_some()
    }

    /// Calculate against the active engine; fails softly when unconfigured
    pub fn calculate_risk(&self, inputs: RiskInputs) -> RiskAssessment {
        match self.current() {
            Some(engine) => engine.calculate_risk(inputs),
            None => RiskAssessment::failed(EvaluationError::NotConfigured),
        }
    }

    /// Description of the active engine
    pub fn describe_configuration(&self) -> String {
        self.current()
            .map(|engine| engine.describe())
            .unwrap_or_else(|| EvaluationError::NotConfigured.to_string())
    }
}
