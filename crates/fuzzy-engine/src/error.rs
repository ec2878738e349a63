//! Engine Error Types

use membership::MembershipError;
use thiserror::Error;

/// Errors while editing a variable's terms
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TermError {
    #[error("Term '{0}' already exists")]
    Duplicate(String),

    #[error("Unknown term '{0}'")]
    Unknown(String),

    #[error("Term '{term}': {source}")]
    Shape {
        term: String,
        #[source]
        source: MembershipError,
    },
}

/// Errors that abort a configuration load.
///
/// Rule positions are zero-based indices into the document's `rules` array.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Configuration file error: {0}")]
    Io(String),

    #[error("Missing input variable: {0}")]
    MissingVariable(String),

    #[error("Unexpected input variable: {0}")]
    UnexpectedVariable(String),

    #[error("Variable '{0}' is declared twice")]
    DuplicateVariable(String),

    #[error("Configuration has no output variable")]
    MissingOutput,

    #[error("Expected exactly one output variable, found: {}", .0.join(", "))]
    MultipleOutputs(Vec<String>),

    #[error("Variable '{0}' has no terms")]
    NoTerms(String),

    #[error("Variable '{variable}' has an invalid range: {source}")]
    InvalidRange {
        variable: String,
        #[source]
        source: MembershipError,
    },

    #[error("Unknown membership function type '{kind}' for term '{term}' of variable '{variable}'")]
    UnknownMembershipType {
        variable: String,
        term: String,
        kind: String,
    },

    #[error("Invalid parameters for term '{term}' of variable '{variable}': {source}")]
    InvalidParameter {
        variable: String,
        term: String,
        #[source]
        source: MembershipError,
    },

    #[error("Term '{term}' is declared twice in variable '{variable}'")]
    DuplicateTerm { variable: String, term: String },

    #[error("Rule {rule} has no conditions")]
    EmptyRule { rule: usize },

    #[error("Rule {rule}: unknown variable '{variable}'")]
    UnknownVariable { rule: usize, variable: String },

    #[error("Rule {rule}: unknown term '{term}' for variable '{variable}'")]
    UnknownTerm {
        rule: usize,
        variable: String,
        term: String,
    },

    #[error("Rule {rule}: unknown term '{term}' for output variable '{output}'")]
    UnknownOutputTerm {
        rule: usize,
        output: String,
        term: String,
    },

    #[error("No rules to build the system from")]
    NoRules,

    #[error("Cannot set output '{0}' after rules have been added")]
    OutputAfterRules(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

/// Errors during a single risk calculation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("No rule fired: aggregated output set is empty")]
    EmptyAggregate,

    #[error("Input '{0}' is not a finite number")]
    NonFiniteInput(String),

    #[error("Missing value for input '{0}'")]
    MissingInput(String),

    #[error("Fuzzy system is not configured")]
    NotConfigured,
}
