//! Fuzzy Risk Inference Engine
//!
//! Loads linguistic variables and rules from a JSON document and maps four
//! crisp exposure factors to a risk value and category:
//! - Fuzzification by interpolation over each variable's sampled terms
//! - Left-to-right AND/OR rule folding (min/max)
//! - Max aggregation and centroid defuzzification
//! - Atomic engine replacement on reconfiguration

mod document;
mod engine;
mod error;
mod handle;
mod loader;
mod presets;
mod rule;
mod variable;

pub use document::{ConditionSpec, FuzzyDocument, NamedMap, RuleSpec, TermSpec, VariableSpec};
pub use engine::{
    EngineBuilder, Evaluation, RiskAssessment, RiskEngine, RiskInputs, FAILED_CATEGORY,
    INPUT_VARIABLES, UNCLASSIFIED,
};
pub use error::{ConfigError, EvaluationError, TermError};
pub use handle::EngineHandle;
pub use loader::ConfigLoader;
pub use rule::{Condition, Operator, Rule};
pub use variable::{Role, Term, Variable};

pub use membership::{Shape, ShapeKind, Universe};
