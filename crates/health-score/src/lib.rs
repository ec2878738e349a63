//! Worker Health Score
//!
//! Computes the crisp health input of the risk engine from worker attributes:
//! - Category-weighted diagnosis penalties, scaled by count
//! - Disability group and occupational harm penalties
//! - Age and tenure penalties above configurable thresholds

mod calculator;
mod category;
mod error;
mod policy;
mod profile;

pub use calculator::{HealthBand, HealthCalculator, HealthReport, Penalty, PenaltySource};
pub use category::{DiagnosisCategory, DisabilityGroup};
pub use error::PolicyError;
pub use policy::{DisabilityPenalties, HealthPolicy};
pub use profile::WorkerProfile;
