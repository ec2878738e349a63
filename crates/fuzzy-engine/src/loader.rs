//! Configuration Loading
//!
//! Builds a `RiskEngine` from a `FuzzyDocument`. Variables are built first so
//! that rules can resolve names; any failure aborts the whole load and no
//! engine is returned.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use membership::{ShapeKind, Universe};
use tracing::{info, warn};

use crate::document::{FuzzyDocument, VariableSpec};
use crate::engine::{EngineBuilder, RiskEngine, INPUT_VARIABLES};
use crate::variable::{Role, Variable};
use crate::{ConfigError, TermError};

/// Entry points for turning configuration into an engine
pub struct ConfigLoader;

impl ConfigLoader {
    /// Parse and build from a JSON string
    pub fn load_str(json: &str) -> Result<RiskEngine, ConfigError> {
        Self::from_document(&FuzzyDocument::from_json(json)?)
    }

    /// Read, parse and build from a JSON file
    pub fn load_file(path: impl AsRef<Path>) -> Result<RiskEngine, ConfigError> {
        let path = path.as_ref();
        let engine = Self::from_document(&Self::read_document(path)?)?;
        info!("Loaded fuzzy configuration from {}", path.display());
        Ok(engine)
    }

    /// Read and parse a JSON file without building it
    pub fn read_document(path: impl AsRef<Path>) -> Result<FuzzyDocument, ConfigError> {
        let json = fs::read_to_string(path)?;
        FuzzyDocument::from_json(&json)
    }

    /// Load a file, first writing the default document if it does not exist
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<RiskEngine, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(
                "Configuration {} not found, writing defaults",
                path.display()
            );
            Self::save(&FuzzyDocument::default(), path)?;
        }
        Self::load_file(path)
    }

    /// Write a document as indented JSON, creating parent directories
    pub fn save(document: &FuzzyDocument, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, document.to_json_pretty()?)?;
        Ok(())
    }

    /// Check a document without keeping the engine
    pub fn validate(document: &FuzzyDocument) -> Result<(), ConfigError> {
        Self::from_document(document).map(|_| ())
    }

    /// Build an engine from a parsed document
    pub fn from_document(document: &FuzzyDocument) -> Result<RiskEngine, ConfigError> {
        let result = Self::builder(document).and_then(|mut builder| {
            for rule in &document.rules {
                builder.add_rule(rule)?;
            }
            builder.build()
        });

        match &result {
            Ok(engine) => info!(
                "Fuzzy system ready: {} inputs, {} output terms, {} rules",
                engine.inputs().len(),
                engine.output().terms().len(),
                engine.rules().len()
            ),
            Err(e) => warn!("Rejected fuzzy configuration: {}", e),
        }
        result
    }

    /// Validate and build every variable, leaving rules unresolved
    pub fn builder(document: &FuzzyDocument) -> Result<EngineBuilder, ConfigError> {
        if let Some(name) = document
            .variables
            .names()
            .find(|name| !INPUT_VARIABLES.contains(name))
        {
            return Err(ConfigError::UnexpectedVariable(name.to_string()));
        }

        let mut builder = EngineBuilder::new();
        for name in INPUT_VARIABLES {
            let spec = document
                .variables
                .get(name)
                .ok_or_else(|| ConfigError::MissingVariable(name.to_string()))?;
            builder.add_input(build_variable(name, Role::Input, spec)?)?;
        }

        let mut outputs = document.output.iter();
        let (name, spec) = outputs.next().ok_or(ConfigError::MissingOutput)?;
        if outputs.next().is_some() {
            return Err(ConfigError::MultipleOutputs(
                document.output.names().map(String::from).collect(),
            ));
        }
        if document.variables.contains(name) {
            return Err(ConfigError::DuplicateVariable(name.to_string()));
        }
        builder.set_output(build_variable(name, Role::Output, spec)?)?;

        Ok(builder)
    }
}

fn build_variable(name: &str, role: Role, spec: &VariableSpec) -> Result<Variable, ConfigError> {
    if spec.terms.is_empty() {
        return Err(ConfigError::NoTerms(name.to_string()));
    }

    let universe = match spec.range {
        Some([lo, hi, step]) => {
            Universe::new(lo, hi, step).map_err(|source| ConfigError::InvalidRange {
                variable: name.to_string(),
                source,
            })?
        }
        None => Universe::unit(),
    };

    let mut variable = Variable::new(name, role, universe);
    for (term, spec) in spec.terms.iter() {
        let kind =
            ShapeKind::from_str(&spec.kind).map_err(|_| ConfigError::UnknownMembershipType {
                variable: name.to_string(),
                term: term.to_string(),
                kind: spec.kind.clone(),
            })?;

        variable
            .add_term(term, kind, &spec.params)
            .map_err(|e| match e {
                TermError::Shape { term, source } => ConfigError::InvalidParameter {
                    variable: name.to_string(),
                    term,
                    source,
                },
                TermError::Duplicate(term) | TermError::Unknown(term) => {
                    ConfigError::DuplicateTerm {
                        variable: name.to_string(),
                        term,
                    }
                }
            })?;
    }

    Ok(variable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConditionSpec, RuleSpec, TermSpec};
    use membership::MembershipError;

    fn with_rule_term(term: &str) -> FuzzyDocument {
        let mut doc = FuzzyDocument::default();
        doc.rules.push(RuleSpec {
            conditions: vec![
                ConditionSpec::new("noise", "low", None),
                ConditionSpec::new("vibration", term, Some(crate::Operator::Or)),
            ],
            then: "medium".to_string(),
        });
        doc
    }

    #[test]
    fn test_default_document_loads() {
        let engine = ConfigLoader::from_document(&FuzzyDocument::default()).unwrap();
        let names: Vec<_> = engine.inputs().iter().map(|v| v.name()).collect();
        assert_eq!(names, INPUT_VARIABLES);
        assert_eq!(engine.output().name(), "risk");
        assert_eq!(engine.rules().len(), 3);
    }

    #[test]
    fn test_dangling_term_reference() {
        let err = ConfigLoader::from_document(&with_rule_term("extreme")).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownTerm {
                rule: 3,
                variable: "vibration".to_string(),
                term: "extreme".to_string()
            }
        );
        assert!(ConfigLoader::from_document(&with_rule_term("high")).is_ok());
    }

    #[test]
    fn test_unknown_membership_type() {
        let mut doc = FuzzyDocument::default();
        doc.variables
            .get_mut("chemical")
            .unwrap()
            .terms
            .insert("toxic", TermSpec::new("cauchymf", vec![1.0, 2.0]));

        let err = ConfigLoader::validate(&doc).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownMembershipType {
                variable: "chemical".to_string(),
                term: "toxic".to_string(),
                kind: "cauchymf".to_string()
            }
        );
    }

    #[test]
    fn test_zero_sigma_is_invalid_parameter() {
        let mut doc = FuzzyDocument::default();
        doc.variables
            .get_mut("health")
            .unwrap()
            .terms
            .insert("peak", TermSpec::new("gaussmf", vec![0.5, 0.0]));

        let err = ConfigLoader::validate(&doc).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { ref variable, ref term, source: MembershipError::InvalidParameter { .. } }
                if variable == "health" && term == "peak"
        ));
    }

    #[test]
    fn test_wrong_arity_is_invalid_parameter() {
        let mut doc = FuzzyDocument::default();
        doc.variables
            .get_mut("noise")
            .unwrap()
            .terms
            .insert("flat", TermSpec::new("trapmf", vec![0.0, 0.5, 1.0]));

        assert!(matches!(
            ConfigLoader::validate(&doc),
            Err(ConfigError::InvalidParameter {
                source: MembershipError::WrongArity { expected: 4, actual: 3, .. },
                ..
            })
        ));
    }

    #[test]
    fn test_no_rules() {
        let mut doc = FuzzyDocument::default();
        doc.rules.clear();
        assert_eq!(ConfigLoader::validate(&doc), Err(ConfigError::NoRules));
    }

    #[test]
    fn test_variable_set_is_fixed() {
        let mut doc = FuzzyDocument::default();
        doc.variables.insert("dust", VariableSpec::default());
        assert_eq!(
            ConfigLoader::validate(&doc),
            Err(ConfigError::UnexpectedVariable("dust".to_string()))
        );

        let json = FuzzyDocument::default()
            .to_json_pretty()
            .unwrap()
            .replace("\"chemical\"", "\"solvent\"");
        assert_eq!(
            ConfigLoader::load_str(&json).unwrap_err(),
            ConfigError::UnexpectedVariable("solvent".to_string())
        );
    }

    #[test]
    fn test_missing_input_variable() {
        let json = r#"{"variables": {}, "output": {}, "rules": []}"#;
        assert_eq!(
            ConfigLoader::load_str(json).unwrap_err(),
            ConfigError::MissingVariable("vibration".to_string())
        );
    }

    #[test]
    fn test_output_cardinality() {
        let mut doc = FuzzyDocument::default();
        let risk = doc.output.get("risk").unwrap().clone();

        doc.output = Default::default();
        assert_eq!(ConfigLoader::validate(&doc), Err(ConfigError::MissingOutput));

        doc.output.insert("risk", risk.clone());
        doc.output.insert("severity", risk);
        assert_eq!(
            ConfigLoader::validate(&doc),
            Err(ConfigError::MultipleOutputs(vec![
                "risk".to_string(),
                "severity".to_string()
            ]))
        );
    }

    #[test]
    fn test_empty_terms_and_bad_range() {
        let mut doc = FuzzyDocument::default();
        doc.variables.get_mut("noise").unwrap().terms = Default::default();
        assert_eq!(
            ConfigLoader::validate(&doc),
            Err(ConfigError::NoTerms("noise".to_string()))
        );

        let mut doc = FuzzyDocument::default();
        doc.variables.get_mut("noise").unwrap().range = Some([1.0, 0.0, 0.1]);
        assert!(matches!(
            ConfigLoader::validate(&doc),
            Err(ConfigError::InvalidRange { ref variable, .. }) if variable == "noise"
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            ConfigLoader::load_str("{\"variables\": "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("fuzzy_config.json");

        let engine = ConfigLoader::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(
            ConfigLoader::read_document(&path).unwrap(),
            FuzzyDocument::default()
        );

        let again = ConfigLoader::load_file(&path).unwrap();
        assert_eq!(again, engine);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ConfigLoader::load_file(dir.path().join("absent.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
