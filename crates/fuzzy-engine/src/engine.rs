//! Mamdani Inference
//!
//! `EngineBuilder` collects variables and resolves rules by name; `build`
//! freezes them into an immutable `RiskEngine` that can be shared across
//! threads and evaluated without locking.

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::document::{ConditionSpec, FuzzyDocument, RuleSpec, TermSpec, VariableSpec};
use crate::rule::{Condition, Operator, Rule};
use crate::variable::Variable;
use crate::{ConfigError, EvaluationError};

/// Fixed input variable names, in evaluation order
pub const INPUT_VARIABLES: [&str; 4] = ["vibration", "noise", "chemical", "health"];

/// Category reported when no output term has positive membership at the centroid
pub const UNCLASSIFIED: &str = "unknown";

/// Category reported on a failed calculation
pub const FAILED_CATEGORY: &str = "error";

/// Crisp input values for one calculation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskInputs {
    pub vibration: f64,
    pub noise: f64,
    pub chemical: f64,
    pub health: f64,
}

impl RiskInputs {
    pub fn new(vibration: f64, noise: f64, chemical: f64, health: f64) -> Self {
        Self {
            vibration,
            noise,
            chemical,
            health,
        }
    }

    /// Look up a value by input variable name
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "vibration" => Some(self.vibration),
            "noise" => Some(self.noise),
            "chemical" => Some(self.chemical),
            "health" => Some(self.health),
            _ => None,
        }
    }
}

/// Result of `calculate_risk`; never an error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Crisp risk within the output universe, 0 on failure
    pub value: f64,
    /// Position of `value` within the output universe, e.g. `"75.0%"`
    pub percent: String,
    /// Dominant output term, `"unknown"` or `"error"`
    pub category: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RiskAssessment {
    /// A failed calculation carrying the error message
    pub fn failed(error: impl fmt::Display) -> Self {
        Self {
            value: 0.0,
            percent: "0%".to_string(),
            category: FAILED_CATEGORY.to_string(),
            success: false,
            error: Some(error.to_string()),
        }
    }
}

impl From<Evaluation> for RiskAssessment {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            value: evaluation.value,
            percent: format!("{:.1}%", evaluation.fraction * 100.0),
            category: evaluation.category,
            success: true,
            error: None,
        }
    }
}

/// Intermediate results of one inference pass
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Clamped crisp inputs, in input declaration order
    pub inputs: Vec<f64>,
    /// `degrees[v][t]`: degree of term `t` of input `v`
    pub degrees: Vec<Vec<f64>>,
    /// Firing strength of each rule
    pub rule_strengths: Vec<f64>,
    /// Activation of each output term after max aggregation
    pub activations: Vec<f64>,
    /// Defuzzified centroid
    pub value: f64,
    /// Position of the centroid within the output universe, in `[0, 1]`
    pub fraction: f64,
    pub category: String,
}

/// Collects variables and rules before an engine is built
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    inputs: Vec<Variable>,
    output: Option<Variable>,
    rules: Vec<Rule>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input variable; names must be unique
    pub fn add_input(&mut self, variable: Variable) -> Result<&mut Self, ConfigError> {
        if self.inputs.iter().any(|v| v.name() == variable.name()) {
            return Err(ConfigError::DuplicateVariable(variable.name().to_string()));
        }
        self.inputs.push(variable);
        Ok(self)
    }

    /// Set the output variable, replacing any previous one.
    ///
    /// Rejected once rules exist, since their consequents index the current output's terms.
    pub fn set_output(&mut self, variable: Variable) -> Result<&mut Self, ConfigError> {
        if !self.rules.is_empty() {
            return Err(ConfigError::OutputAfterRules(variable.name().to_string()));
        }
        self.output = Some(variable);
        Ok(self)
    }

    /// Resolve a rule's names against the variables added so far.
    ///
    /// The output must be set first. Errors carry the rule's zero-based index.
    pub fn add_rule(&mut self, spec: &RuleSpec) -> Result<&mut Self, ConfigError> {
        let rule = self.rules.len();
        let output = self.output.as_ref().ok_or(ConfigError::MissingOutput)?;

        if spec.conditions.is_empty() {
            return Err(ConfigError::EmptyRule { rule });
        }

        let mut conditions = Vec::with_capacity(spec.conditions.len());
        for (i, cond) in spec.conditions.iter().enumerate() {
            let variable = self
                .inputs
                .iter()
                .position(|v| v.name() == cond.variable)
                .ok_or_else(|| ConfigError::UnknownVariable {
                    rule,
                    variable: cond.variable.clone(),
                })?;
            let term = self.inputs[variable]
                .term_index(&cond.term)
                .ok_or_else(|| ConfigError::UnknownTerm {
                    rule,
                    variable: cond.variable.clone(),
                    term: cond.term.clone(),
                })?;

            conditions.push(Condition {
                variable,
                term,
                operator: if i == 0 { None } else { cond.operator },
            });
        }

        let consequent =
            output
                .term_index(&spec.then)
                .ok_or_else(|| ConfigError::UnknownOutputTerm {
                    rule,
                    output: output.name().to_string(),
                    term: spec.then.clone(),
                })?;

        self.rules.push(Rule::new(conditions, consequent));
        Ok(self)
    }

    /// Freeze into a runnable engine
    pub fn build(self) -> Result<RiskEngine, ConfigError> {
        let output = self.output.ok_or(ConfigError::MissingOutput)?;
        if self.rules.is_empty() {
            return Err(ConfigError::NoRules);
        }

        Ok(RiskEngine {
            inputs: self.inputs,
            output,
            rules: self.rules,
        })
    }
}

/// A fully built inference system. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskEngine {
    inputs: Vec<Variable>,
    output: Variable,
    rules: Vec<Rule>,
}

impl RiskEngine {
    /// Input variables in declaration order
    pub fn inputs(&self) -> &[Variable] {
        &self.inputs
    }

    pub fn output(&self) -> &Variable {
        &self.output
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Input variable by name
    pub fn input(&self, name: &str) -> Option<&Variable> {
        self.inputs.iter().find(|v| v.name() == name)
    }

    /// Run inference on the four fixed inputs
    pub fn evaluate(&self, inputs: &RiskInputs) -> Result<Evaluation, EvaluationError> {
        self.evaluate_with(|name| inputs.get(name))
    }

    /// Run inference, looking up each input variable's crisp value by name
    pub fn evaluate_with<F>(&self, lookup: F) -> Result<Evaluation, EvaluationError>
    where
        F: Fn(&str) -> Option<f64>,
    {
        let mut inputs = Vec::with_capacity(self.inputs.len());
        let mut degrees = Vec::with_capacity(self.inputs.len());
        for variable in &self.inputs {
            let raw = lookup(variable.name())
                .ok_or_else(|| EvaluationError::MissingInput(variable.name().to_string()))?;
            if !raw.is_finite() {
                return Err(EvaluationError::NonFiniteInput(variable.name().to_string()));
            }
            let x = variable.universe().clamp(raw);
            degrees.push(variable.fuzzify(x));
            inputs.push(x);
        }

        let rule_strengths: Vec<f64> = self
            .rules
            .iter()
            .map(|rule| rule.firing_strength(&degrees))
            .collect();

        let mut activations = vec![0.0_f64; self.output.terms().len()];
        for (rule, strength) in self.rules.iter().zip(&rule_strengths) {
            let slot = &mut activations[rule.consequent()];
            *slot = slot.max(*strength);
        }

        let centroid = self.centroid(&activations)?;
        let universe = self.output.universe();
        let value = universe.clamp(centroid);

        Ok(Evaluation {
            inputs,
            degrees,
            rule_strengths,
            activations,
            value,
            fraction: universe.fraction(value),
            category: self.classify(value).to_string(),
        })
    }

    /// Centroid of the aggregated output set: each term clipped at its
    /// activation, max across terms, at every grid point
    fn centroid(&self, activations: &[f64]) -> Result<f64, EvaluationError> {
        let terms = self.output.terms();
        let mut moment = 0.0;
        let mut area = 0.0;

        for (i, &x) in self.output.universe().points().iter().enumerate() {
            let mu = terms
                .iter()
                .zip(activations)
                .map(|(term, &level)| term.curve()[i].min(level))
                .fold(0.0, f64::max);
            moment += x * mu;
            area += mu;
        }

        if area <= 0.0 {
            return Err(EvaluationError::EmptyAggregate);
        }
        Ok(moment / area)
    }

    /// Output term with the strictly greatest membership at `value`.
    ///
    /// Ties go to the first-declared term; all-zero gives `"unknown"`.
    pub fn classify(&self, value: f64) -> &str {
        let mut best: Option<(&str, f64)> = None;
        for (term, degree) in self.output.terms().iter().zip(self.output.fuzzify(value)) {
            if degree > best.map_or(0.0, |(_, d)| d) {
                best = Some((term.name(), degree));
            }
        }
        best.map_or(UNCLASSIFIED, |(name, _)| name)
    }

    /// Run inference, converting every failure into a failed result
    pub fn calculate_risk(&self, inputs: RiskInputs) -> RiskAssessment {
        match self.evaluate(&inputs) {
            Ok(evaluation) => {
                debug!(
                    "Risk {:.3} ({}) for {:?}",
                    evaluation.value, evaluation.category, inputs
                );
                evaluation.into()
            }
            Err(e) => {
                warn!("Risk calculation failed for {:?}: {}", inputs, e);
                RiskAssessment::failed(e)
            }
        }
    }

    /// Human-readable listing of variables, terms and rules
    pub fn describe(&self) -> String {
        let mut out = String::new();

        out.push_str("Input variables:\n");
        for variable in &self.inputs {
            describe_variable(&mut out, variable);
        }
        out.push_str("Output variable:\n");
        describe_variable(&mut out, &self.output);

        let _ = writeln!(out, "Rules ({}):", self.rules.len());
        for (i, rule) in self.rules.iter().enumerate() {
            let _ = write!(out, "  {}. IF", i + 1);
            for (j, cond) in rule.conditions().iter().enumerate() {
                let variable = &self.inputs[cond.variable];
                if j > 0 {
                    let op = cond.operator.unwrap_or(Operator::And);
                    let _ = write!(out, " {}", op.as_str().to_uppercase());
                }
                let _ = write!(
                    out,
                    " {} IS {}",
                    variable.name(),
                    variable.terms()[cond.term].name()
                );
            }
            let _ = writeln!(
                out,
                " THEN {} IS {}",
                self.output.name(),
                self.output.terms()[rule.consequent()].name()
            );
        }

        out
    }

    /// Rebuild the configuration document this engine represents.
    ///
    /// Ranges are always written out explicitly.
    pub fn to_document(&self) -> FuzzyDocument {
        let spec = |variable: &Variable| {
            let u = variable.universe();
            VariableSpec {
                range: Some([u.lo(), u.hi(), u.step()]),
                terms: variable
                    .terms()
                    .iter()
                    .map(|t| (t.name(), TermSpec::new(t.shape().kind().as_str(), t.shape().params())))
                    .collect(),
            }
        };

        let rules = self
            .rules
            .iter()
            .map(|rule| RuleSpec {
                conditions: rule
                    .conditions()
                    .iter()
                    .map(|c| {
                        let variable = &self.inputs[c.variable];
                        ConditionSpec::new(variable.name(), variable.terms()[c.term].name(), c.operator)
                    })
                    .collect(),
                then: self.output.terms()[rule.consequent()].name().to_string(),
            })
            .collect();

        FuzzyDocument {
            variables: self.inputs.iter().map(|v| (v.name(), spec(v))).collect(),
            output: [(self.output.name(), spec(&self.output))].into_iter().collect(),
            rules,
        }
    }
}

fn describe_variable(out: &mut String, variable: &Variable) {
    let u = variable.universe();
    let _ = writeln!(
        out,
        "  {} [{}, {}] step {}",
        variable.name(),
        u.lo(),
        u.hi(),
        u.step()
    );
    for term in variable.terms() {
        let _ = writeln!(
            out,
            "    {}: {} {:?}",
            term.name(),
            term.shape().kind(),
            term.shape().params()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigLoader, Role, ShapeKind, Universe};
    use proptest::prelude::*;

    fn unit_engine() -> RiskEngine {
        ConfigLoader::from_document(&FuzzyDocument::unit_default()).unwrap()
    }

    fn ranged_engine() -> RiskEngine {
        ConfigLoader::from_document(&FuzzyDocument::ranged()).unwrap()
    }

    fn single_rule_engine(output_terms: &[(&str, [f64; 3])]) -> RiskEngine {
        let mut vibration = Variable::new("vibration", Role::Input, Universe::unit());
        vibration
            .add_term("high", ShapeKind::Triangular, &[0.5, 1.0, 1.0])
            .unwrap();
        let mut risk = Variable::new("risk", Role::Output, Universe::unit());
        for (name, params) in output_terms {
            risk.add_term(*name, ShapeKind::Triangular, params).unwrap();
        }

        let mut builder = EngineBuilder::new();
        builder.add_input(vibration).unwrap();
        builder.set_output(risk).unwrap();
        builder
            .add_rule(&RuleSpec {
                conditions: vec![ConditionSpec::new("vibration", "high", None)],
                then: output_terms[0].0.to_string(),
            })
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_high_exposure_scenario() {
        let engine = unit_engine();
        let eval = engine.evaluate(&RiskInputs::new(0.9, 0.9, 0.9, 0.1)).unwrap();

        assert!((eval.activations[3] - 0.5).abs() < 1e-9);
        assert!(eval.activations.iter().enumerate().all(|(i, a)| i == 3 || *a == 0.0));
        assert!((eval.value - 0.75).abs() < 1e-9);
        assert_eq!(eval.category, "high");

        let result = engine.calculate_risk(RiskInputs::new(0.9, 0.9, 0.9, 0.1));
        assert!(result.success);
        assert_eq!(result.percent, "75.0%");
        assert_eq!(result.category, "high");
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_low_exposure_scenario_on_unit_document() {
        // Rule 2's OR chain still fires very_high at 0.1, pulling the
        // centroid out of very_low
        let eval = unit_engine()
            .evaluate(&RiskInputs::new(0.05, 0.05, 0.05, 0.95))
            .unwrap();

        assert!((eval.activations[0] - 0.875).abs() < 1e-9);
        assert!((eval.activations[4] - 0.1).abs() < 1e-9);
        assert!((eval.value - 0.2095712).abs() < 1e-5);
        assert_eq!(eval.category, "low");
    }

    #[test]
    fn test_zero_exposure_is_very_low() {
        let eval = unit_engine()
            .evaluate(&RiskInputs::new(0.0, 0.0, 0.0, 1.0))
            .unwrap();
        assert!((eval.value - 0.08).abs() < 1e-6);
        assert_eq!(eval.category, "very_low");
    }

    #[test]
    fn test_ranged_document_scenarios() {
        let engine = ranged_engine();

        let poor_health = engine.calculate_risk(RiskInputs::new(0.9, 0.9, 0.9, 0.1));
        assert!((poor_health.value - 89.1078).abs() < 1e-3);
        assert_eq!(poor_health.category, "very_high");

        let high = engine.calculate_risk(RiskInputs::new(9.0, 9.0, 9.0, 0.1));
        assert!((high.value - 75.0).abs() < 1e-9);
        assert_eq!(high.category, "high");

        let low = engine.calculate_risk(RiskInputs::new(0.05, 0.05, 0.05, 0.95));
        assert!((low.value - 9.6327).abs() < 1e-3);
        assert_eq!(low.category, "very_low");
        assert_eq!(low.percent, "9.6%");
    }

    #[test]
    fn test_mixed_inputs_hit_very_high() {
        let eval = unit_engine()
            .evaluate(&RiskInputs::new(0.5, 0.5, 0.5, 0.5))
            .unwrap();
        assert!((eval.activations[4] - 0.75).abs() < 1e-9);
        assert!((eval.value - 0.91531).abs() < 1e-4);
        assert_eq!(eval.category, "very_high");
    }

    #[test]
    fn test_empty_aggregate_is_failed_result() {
        let engine = single_rule_engine(&[("high", [0.5, 1.0, 1.0])]);

        assert_eq!(
            engine.evaluate(&RiskInputs::default()),
            Err(EvaluationError::EmptyAggregate)
        );

        let result = engine.calculate_risk(RiskInputs::default());
        assert!(!result.success);
        assert_eq!(result.value, 0.0);
        assert_eq!(result.percent, "0%");
        assert_eq!(result.category, FAILED_CATEGORY);
        assert!(result.error.unwrap().contains("empty"));
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let engine = unit_engine();
        assert_eq!(
            engine.evaluate(&RiskInputs::new(0.5, f64::NAN, 0.5, 0.5)),
            Err(EvaluationError::NonFiniteInput("noise".to_string()))
        );
        let result = engine.calculate_risk(RiskInputs::new(0.5, 0.5, f64::INFINITY, 0.5));
        assert!(!result.success);
    }

    #[test]
    fn test_missing_input_from_lookup() {
        let err = unit_engine()
            .evaluate_with(|name| (name != "health").then_some(0.5))
            .unwrap_err();
        assert_eq!(err, EvaluationError::MissingInput("health".to_string()));
    }

    #[test]
    fn test_classify_tie_goes_to_first_declared() {
        let engine = single_rule_engine(&[
            ("first", [0.0, 0.5, 1.0]),
            ("second", [0.0, 0.5, 1.0]),
        ]);
        assert_eq!(engine.classify(0.5), "first");
        assert_eq!(engine.classify(0.3), "first");
    }

    #[test]
    fn test_classify_unknown_when_no_membership() {
        let engine = single_rule_engine(&[("narrow", [0.4, 0.5, 0.6])]);
        assert_eq!(engine.classify(0.9), UNCLASSIFIED);
        assert_eq!(engine.classify(0.5), "narrow");
    }

    #[test]
    fn test_builder_rejects_bad_references() {
        let doc = FuzzyDocument::unit_default();
        let base = ConfigLoader::builder(&doc).unwrap();

        let mut builder = base.clone();
        let err = builder
            .add_rule(&RuleSpec {
                conditions: vec![ConditionSpec::new("dust", "high", None)],
                then: "high".to_string(),
            })
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownVariable {
                rule: 0,
                variable: "dust".to_string()
            }
        );

        let mut builder = base.clone();
        let err = builder
            .add_rule(&RuleSpec {
                conditions: vec![ConditionSpec::new("noise", "high", None)],
                then: "catastrophic".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownOutputTerm { rule: 0, .. }));

        let mut builder = base.clone();
        let err = builder
            .add_rule(&RuleSpec {
                conditions: vec![],
                then: "high".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyRule { rule: 0 });

        assert_eq!(base.build().unwrap_err(), ConfigError::NoRules);
    }

    #[test]
    fn test_builder_requires_output() {
        let mut builder = EngineBuilder::new();
        builder
            .add_input(Variable::new("noise", Role::Input, Universe::unit()))
            .unwrap();
        assert!(builder
            .add_input(Variable::new("noise", Role::Input, Universe::unit()))
            .is_err());
        assert_eq!(builder.build().unwrap_err(), ConfigError::MissingOutput);
    }

    #[test]
    fn test_output_cannot_change_after_rules() {
        let mut builder = ConfigLoader::builder(&FuzzyDocument::unit_default()).unwrap();
        builder
            .add_rule(&RuleSpec {
                conditions: vec![ConditionSpec::new("vibration", "high", None)],
                then: "very_high".to_string(),
            })
            .unwrap();

        let mut narrow = Variable::new("risk", Role::Output, Universe::unit());
        narrow
            .add_term("only", ShapeKind::Triangular, &[0.0, 0.5, 1.0])
            .unwrap();
        assert_eq!(
            builder.set_output(narrow).unwrap_err(),
            ConfigError::OutputAfterRules("risk".to_string())
        );

        // The original output is kept, so consequents still resolve
        let engine = builder.build().unwrap();
        assert_eq!(engine.output().terms().len(), 5);
        let result = engine.calculate_risk(RiskInputs::new(0.9, 0.9, 0.9, 0.1));
        assert!(result.success);
        assert_eq!(result.category, "very_high");
        assert!(engine.describe().contains("THEN risk IS very_high"));
    }

    #[test]
    fn test_first_operator_dropped_at_build() {
        let engine = unit_engine();
        for rule in engine.rules() {
            assert_eq!(rule.conditions()[0].operator, None);
        }
    }

    #[test]
    fn test_describe_lists_everything() {
        let text = unit_engine().describe();
        assert!(text.contains("vibration [0, 1] step 0.01"));
        assert!(text.contains("very_high: trimf [0.75, 1.0, 1.0]"));
        assert!(text.contains(
            "1. IF vibration IS high OR noise IS high AND chemical IS high THEN risk IS high"
        ));
        assert!(text.contains("Rules (3):"));
    }

    #[test]
    fn test_to_document_reloads_identically() {
        let engine = ranged_engine();
        let rebuilt = ConfigLoader::from_document(&engine.to_document()).unwrap();
        assert_eq!(rebuilt, engine);
    }

    #[test]
    fn test_assessment_serializes_without_error_field() {
        let json = serde_json::to_value(unit_engine().calculate_risk(RiskInputs::new(
            0.9, 0.9, 0.9, 0.1,
        )))
        .unwrap();
        assert_eq!(json["category"], "high");
        assert!(json.get("error").is_none());
    }

    proptest! {
        #[test]
        fn prop_out_of_range_inputs_are_clamped(
            v in -5.0f64..6.0,
            n in -5.0f64..6.0,
            c in -5.0f64..6.0,
            h in -5.0f64..6.0,
        ) {
            let engine = unit_engine();
            let raw = engine.calculate_risk(RiskInputs::new(v, n, c, h));
            let clamped = engine.calculate_risk(RiskInputs::new(
                v.clamp(0.0, 1.0),
                n.clamp(0.0, 1.0),
                c.clamp(0.0, 1.0),
                h.clamp(0.0, 1.0),
            ));
            prop_assert_eq!(raw, clamped);
        }

        #[test]
        fn prop_calculation_is_deterministic(
            v in 0.0f64..1.0,
            n in 0.0f64..1.0,
            c in 0.0f64..1.0,
            h in 0.0f64..1.0,
        ) {
            let engine = unit_engine();
            let inputs = RiskInputs::new(v, n, c, h);
            let first = engine.evaluate(&inputs);
            let second = engine.evaluate(&inputs);
            prop_assert_eq!(&first, &second);
            if let Ok(eval) = first {
                prop_assert!((0.0..=1.0).contains(&eval.value));
                prop_assert!(eval.rule_strengths.iter().all(|s| (0.0..=1.0).contains(s)));
            }
        }
    }
}
