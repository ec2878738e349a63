//! Worker Attributes Consumed by the Calculator

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::category::{DiagnosisCategory, DisabilityGroup};

/// The health-relevant part of a worker record. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerProfile {
    /// Diagnosis names grouped by category
    pub diagnoses: BTreeMap<DiagnosisCategory, Vec<String>>,
    pub disability_group: Option<DisabilityGroup>,
    /// Occupational harm code; any non-blank code counts
    pub professional_harm_code: Option<String>,
    pub birth_date: Option<NaiveDate>,
    /// Calendar year employment started
    pub start_year: Option<i32>,
}

impl WorkerProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnosis under its category
    pub fn add_diagnosis(&mut self, category: DiagnosisCategory, name: impl Into<String>) {
        self.diagnoses.entry(category).or_default().push(name.into());
    }

    /// Total number of recorded diagnoses
    pub fn diagnosis_count(&self) -> usize {
        self.diagnoses.values().map(Vec::len).sum()
    }

    pub fn has_professional_harm(&self) -> bool {
        self.professional_harm_code
            .as_deref()
            .is_some_and(|code| !code.trim().is_empty())
    }

    /// Completed years of age on `as_of`
    pub fn age_at(&self, as_of: NaiveDate) -> Option<u32> {
        let birth = self.birth_date?;
        let mut years = as_of.year() - birth.year();
        if (as_of.month(), as_of.day()) < (birth.month(), birth.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }

    /// Years of service counted by calendar year on `as_of`
    pub fn tenure_at(&self, as_of: NaiveDate) -> Option<u32> {
        u32::try_from(as_of.year() - self.start_year?).ok()
    }
}
