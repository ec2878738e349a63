//! Diagnosis Categories and Disability Groups

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Body system a diagnosis belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisCategory {
    Cardiovascular,
    Musculoskeletal,
    Vision,
    Gastrointestinal,
    /// Ear, nose and throat
    Ent,
    Respiratory,
    Urinary,
    Endocrine,
    Other,
}

impl DiagnosisCategory {
    /// All categories, heaviest default penalty first
    pub const ALL: [DiagnosisCategory; 9] = [
        DiagnosisCategory::Cardiovascular,
        DiagnosisCategory::Musculoskeletal,
        DiagnosisCategory::Vision,
        DiagnosisCategory::Gastrointestinal,
        DiagnosisCategory::Ent,
        DiagnosisCategory::Respiratory,
        DiagnosisCategory::Urinary,
        DiagnosisCategory::Endocrine,
        DiagnosisCategory::Other,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosisCategory::Cardiovascular => "cardiovascular",
            DiagnosisCategory::Musculoskeletal => "musculoskeletal",
            DiagnosisCategory::Vision => "vision",
            DiagnosisCategory::Gastrointestinal => "gastrointestinal",
            DiagnosisCategory::Ent => "ent",
            DiagnosisCategory::Respiratory => "respiratory",
            DiagnosisCategory::Urinary => "urinary",
            DiagnosisCategory::Endocrine => "endocrine",
            DiagnosisCategory::Other => "other",
        }
    }
}

impl fmt::Display for DiagnosisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagnosisCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown diagnosis category: {}", s))
    }
}

/// Officially assigned disability group; group I is the most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DisabilityGroup {
    I,
    II,
    III,
}

impl DisabilityGroup {
    /// Group from its number; anything other than 1-3 is no group
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(DisabilityGroup::I),
            2 => Some(DisabilityGroup::II),
            3 => Some(DisabilityGroup::III),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            DisabilityGroup::I => 1,
            DisabilityGroup::II => 2,
            DisabilityGroup::III => 3,
        }
    }
}

impl TryFrom<u8> for DisabilityGroup {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n).ok_or_else(|| format!("Invalid disability group: {}", n))
    }
}

impl From<DisabilityGroup> for u8 {
    fn from(group: DisabilityGroup) -> Self {
        group.number()
    }
}
