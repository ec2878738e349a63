//! Occupational Risk Assessment
//!
//! Wires the worker store, health calculator and fuzzy engine together:
//! - Layered settings (defaults, optional file, `WORKRISK__` environment)
//! - Plain or JSON structured logging
//! - Per-worker assessment and live engine reconfiguration

mod assessor;
mod error;
mod logging;
mod settings;

pub use assessor::{Exposures, RiskAssessor, WorkerAssessment};
pub use error::AssessmentError;
pub use logging::init_logging;
pub use settings::{AssessmentSettings, EngineSettings, LogFormat, LoggingSettings};

pub use fuzzy_engine::{EngineHandle, RiskAssessment, RiskInputs};
pub use health_score::{HealthCalculator, HealthPolicy, HealthReport, WorkerProfile};
pub use storage::{WorkerDraft, WorkerRecord, WorkerRepository, WorkerStore};
