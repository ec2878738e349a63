//! Health Score Calculation
//!
//! Base score 1.0 minus every applicable penalty, clamped to `[0, 1]`.
//! The calculator never fails: absent attributes contribute nothing.

use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::{DiagnosisCategory, DisabilityGroup};
use crate::policy::HealthPolicy;
use crate::profile::WorkerProfile;

/// What a penalty was charged for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PenaltySource {
    Diagnoses {
        category: DiagnosisCategory,
        count: usize,
    },
    Disability {
        group: DisabilityGroup,
    },
    ProfessionalHarm,
    Age {
        years: u32,
    },
    Tenure {
        years: u32,
    },
}

/// One deduction from the base score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Penalty {
    pub source: PenaltySource,
    pub amount: f64,
}

/// Qualitative reading of a health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthBand {
    Critical,
    Poor,
    Satisfactory,
    Good,
    Excellent,
}

impl HealthBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            HealthBand::Excellent
        } else if score >= 0.6 {
            HealthBand::Good
        } else if score >= 0.4 {
            HealthBand::Satisfactory
        } else if score >= 0.2 {
            HealthBand::Poor
        } else {
            HealthBand::Critical
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthBand::Excellent => "Excellent",
            HealthBand::Good => "Good",
            HealthBand::Satisfactory => "Satisfactory",
            HealthBand::Poor => "Poor",
            HealthBand::Critical => "Critical",
        }
    }
}

impl fmt::Display for HealthBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score with the penalties that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub score: f64,
    pub band: HealthBand,
    pub penalties: Vec<Penalty>,
}

impl HealthReport {
    /// Sum of all penalties before clamping
    pub fn total_penalty(&self) -> f64 {
        self.penalties.iter().map(|p| p.amount).sum()
    }
}

/// Health score calculator bound to a policy
#[derive(Debug, Clone, Default)]
pub struct HealthCalculator {
    policy: HealthPolicy,
}

impl HealthCalculator {
    pub fn new(policy: HealthPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &HealthPolicy {
        &self.policy
    }

    /// Score as of today's local date
    pub fn score(&self, profile: &WorkerProfile) -> f64 {
        self.score_at(profile, Local::now().date_naive())
    }

    /// Score with age and tenure measured on `as_of`
    pub fn score_at(&self, profile: &WorkerProfile, as_of: NaiveDate) -> f64 {
        self.assess_at(profile, as_of).score
    }

    /// Full breakdown with age and tenure measured on `as_of`
    pub fn assess_at(&self, profile: &WorkerProfile, as_of: NaiveDate) -> HealthReport {
        let policy = &self.policy;
        let mut penalties = Vec::new();
        let mut charge = |source: PenaltySource, amount: f64| {
            if amount > 0.0 {
                penalties.push(Penalty { source, amount });
            }
        };

        for (&category, names) in &profile.diagnoses {
            let count = names.len();
            charge(
                PenaltySource::Diagnoses { category, count },
                policy.diagnosis_penalty(category, count),
            );
        }

        if let Some(group) = profile.disability_group {
            charge(
                PenaltySource::Disability { group },
                policy.disability.for_group(group),
            );
        }

        if profile.has_professional_harm() {
            charge(PenaltySource::ProfessionalHarm, policy.professional_harm);
        }

        if let Some(years) = profile.age_at(as_of) {
            charge(PenaltySource::Age { years }, policy.age_penalty(years));
        }

        if let Some(years) = profile.tenure_at(as_of) {
            charge(PenaltySource::Tenure { years }, policy.tenure_penalty(years));
        }

        let total: f64 = penalties.iter().map(|p| p.amount).sum();
        let score = (1.0 - total).clamp(0.0, 1.0);
        debug!(
            "Health score {:.3} with {} penalties (total {:.3})",
            score,
            penalties.len(),
            total
        );

        HealthReport {
            score,
            band: HealthBand::from_score(score),
            penalties,
        }
    }
}
