//! Worker Risk Assessment

use std::path::Path;

use chrono::{Local, NaiveDate};
use fuzzy_engine::{ConfigLoader, EngineHandle, RiskAssessment, RiskInputs};
use health_score::{HealthCalculator, HealthReport};
use serde::{Deserialize, Serialize};
use storage::WorkerStore;
use tracing::info;

use crate::error::AssessmentError;
use crate::settings::AssessmentSettings;

/// Measured workplace exposures, on the scale of the loaded configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Exposures {
    pub vibration: f64,
    pub noise: f64,
    pub chemical: f64,
}

impl Exposures {
    pub fn new(vibration: f64, noise: f64, chemical: f64) -> Self {
        Self {
            vibration,
            noise,
            chemical,
        }
    }

    /// Engine inputs with the given health score
    pub fn with_health(self, health: f64) -> RiskInputs {
        RiskInputs::new(self.vibration, self.noise, self.chemical, health)
    }
}

/// Outcome of assessing one worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerAssessment {
    pub worker_id: u64,
    pub full_name: String,
    pub assessed_on: NaiveDate,
    pub exposures: Exposures,
    pub health: HealthReport,
    pub risk: RiskAssessment,
}

/// Assessment service over a worker store
pub struct RiskAssessor<S: WorkerStore> {
    store: S,
    calculator: HealthCalculator,
    engine: EngineHandle,
}

impl<S: WorkerStore> RiskAssessor<S> {
    /// An assessor with no fuzzy system installed yet
    pub fn new(store: S, calculator: HealthCalculator) -> Self {
        Self {
            store,
            calculator,
            engine: EngineHandle::new(),
        }
    }

    /// Validate the health policy and load the configured fuzzy system
    pub fn from_settings(store: S, settings: &AssessmentSettings) -> Result<Self, AssessmentError> {
        settings.health.validate()?;

        let path = &settings.engine.config_path;
        let engine = if settings.engine.create_if_missing {
            ConfigLoader::load_or_create(path)?
        } else {
            ConfigLoader::load_file(path)?
        };

        let assessor = Self::new(store, HealthCalculator::new(settings.health.clone()));
        assessor.engine.install(engine);
        info!("Risk assessor ready with {}", path.display());
        Ok(assessor)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn calculator(&self) -> &HealthCalculator {
        &self.calculator
    }

    /// Health breakdown for a stored worker
    pub fn health_report(&self, worker_id: u64, as_of: NaiveDate) -> Result<HealthReport, AssessmentError> {
        let worker = self.store.get_worker(worker_id)?;
        Ok(self.calculator.assess_at(&worker.profile, as_of))
    }

    /// Assess a stored worker as of today
    pub fn assess_worker(
        &self,
        worker_id: u64,
        exposures: Exposures,
    ) -> Result<WorkerAssessment, AssessmentError> {
        self.assess_worker_at(worker_id, exposures, Local::now().date_naive())
    }

    /// Assess a stored worker with age and tenure measured on `as_of`.
    ///
    /// Only a missing worker is an error; a failed inference is reported
    /// inside the returned `risk`.
    pub fn assess_worker_at(
        &self,
        worker_id: u64,
        exposures: Exposures,
        as_of: NaiveDate,
    ) -> Result<WorkerAssessment, AssessmentError> {
        let worker = self.store.get_worker(worker_id)?;
        let health = self.calculator.assess_at(&worker.profile, as_of);
        let risk = self.engine.calculate_risk(exposures.with_health(health.score));

        info!(
            "Assessed worker {} ({}): health {:.2}, risk {} {}",
            worker.id, worker.full_name, health.score, risk.category, risk.percent
        );

        Ok(WorkerAssessment {
            worker_id: worker.id,
            full_name: worker.full_name,
            assessed_on: as_of,
            exposures,
            health,
            risk,
        })
    }

    /// Replace the fuzzy system from a file; the old one stays on failure
    pub fn reload_configuration(&self, path: impl AsRef<Path>) -> Result<(), AssessmentError> {
        Ok(self.engine.reload_file(path)?)
    }

    /// Human-readable description of the active fuzzy system
    pub fn describe_configuration(&self) -> String {
        self.engine.describe_configuration()
    }
}
