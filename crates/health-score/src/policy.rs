//! Penalty Weights

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::{DiagnosisCategory, DisabilityGroup};
use crate::error::PolicyError;

/// Penalty per disability group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisabilityPenalties {
    pub group_1: f64,
    pub group_2: f64,
    pub group_3: f64,
}

impl Default for DisabilityPenalties {
    fn default() -> Self {
        Self {
            group_1: 0.25,
            group_2: 0.15,
            group_3: 0.10,
        }
    }
}

impl DisabilityPenalties {
    pub fn for_group(&self, group: DisabilityGroup) -> f64 {
        match group {
            DisabilityGroup::I => self.group_1,
            DisabilityGroup::II => self.group_2,
            DisabilityGroup::III => self.group_3,
        }
    }
}

/// All weights and thresholds used by the health calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthPolicy {
    /// Base penalty per diagnosis category; unlisted categories cost nothing
    pub category_penalties: BTreeMap<DiagnosisCategory, f64>,
    /// Extra fraction of the base penalty per additional diagnosis in a category
    pub count_step: f64,
    /// Cap on a category's penalty as a multiple of its base penalty
    pub count_cap: f64,
    pub disability: DisabilityPenalties,
    /// Flat penalty when an occupational harm code is recorded
    pub professional_harm: f64,
    /// Age in years above which the age penalty applies
    pub age_threshold: u32,
    /// Penalty per year of age above the threshold
    pub age_rate: f64,
    pub age_cap: f64,
    /// Years of service above which the tenure penalty applies
    pub tenure_threshold: u32,
    /// Penalty per year of service above the threshold
    pub tenure_rate: f64,
    pub tenure_cap: f64,
}

impl Default for HealthPolicy {
    fn default() -> Self {
        let category_penalties = [
            (DiagnosisCategory::Cardiovascular, 0.20),
            (DiagnosisCategory::Musculoskeletal, 0.15),
            (DiagnosisCategory::Vision, 0.12),
            (DiagnosisCategory::Gastrointestinal, 0.10),
            (DiagnosisCategory::Ent, 0.08),
            (DiagnosisCategory::Respiratory, 0.07),
            (DiagnosisCategory::Urinary, 0.06),
            (DiagnosisCategory::Endocrine, 0.05),
            (DiagnosisCategory::Other, 0.03),
        ]
        .into_iter()
        .collect();

        Self {
            category_penalties,
            count_step: 0.2,
            count_cap: 2.0,
            disability: DisabilityPenalties::default(),
            professional_harm: 0.15,
            age_threshold: 50,
            age_rate: 0.005,
            age_cap: 0.10,
            tenure_threshold: 20,
            tenure_rate: 0.01,
            tenure_cap: 0.15,
        }
    }
}

impl HealthPolicy {
    /// Penalty for `count` diagnoses in one category
    pub fn diagnosis_penalty(&self, category: DiagnosisCategory, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        let base = self.category_penalties.get(&category).copied().unwrap_or(0.0);
        let scaled = base * (1.0 + self.count_step * (count as f64 - 1.0));
        scaled.min(base * self.count_cap)
    }

    /// Penalty for the given age in whole years
    pub fn age_penalty(&self, age: u32) -> f64 {
        over_threshold(age, self.age_threshold, self.age_rate, self.age_cap)
    }

    /// Penalty for the given tenure in whole years
    pub fn tenure_penalty(&self, years: u32) -> f64 {
        over_threshold(years, self.tenure_threshold, self.tenure_rate, self.tenure_cap)
    }

    /// Reject negative or non-finite weights
    pub fn validate(&self) -> Result<(), PolicyError> {
        let mut fields: Vec<(String, f64)> = self
            .category_penalties
            .iter()
            .map(|(c, p)| (format!("category_penalties.{}", c), *p))
            .collect();
        fields.extend([
            ("count_step".to_string(), self.count_step),
            ("disability.group_1".to_string(), self.disability.group_1),
            ("disability.group_2".to_string(), self.disability.group_2),
            ("disability.group_3".to_string(), self.disability.group_3),
            ("professional_harm".to_string(), self.professional_harm),
            ("age_rate".to_string(), self.age_rate),
            ("age_cap".to_string(), self.age_cap),
            ("tenure_rate".to_string(), self.tenure_rate),
            ("tenure_cap".to_string(), self.tenure_cap),
        ]);

        if let Some((field, value)) = fields
            .into_iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
        {
            return Err(PolicyError::InvalidPenalty { field, value });
        }
        if !self.count_cap.is_finite() || self.count_cap < 1.0 {
            return Err(PolicyError::InvalidCountCap(self.count_cap));
        }
        Ok(())
    }
}

fn over_threshold(value: u32, threshold: u32, rate: f64, cap: f64) -> f64 {
    if value <= threshold {
        return 0.0;
    }
    (f64::from(value - threshold) * rate).min(cap)
}
