//! Built-in Configuration Documents

use crate::document::{ConditionSpec, FuzzyDocument, NamedMap, RuleSpec, TermSpec, VariableSpec};
use crate::rule::Operator;

fn trimf(a: f64, b: f64, c: f64) -> TermSpec {
    TermSpec::new("trimf", vec![a, b, c])
}

fn variable(range: Option<[f64; 3]>, terms: [(&str, TermSpec); 3]) -> VariableSpec {
    VariableSpec {
        range,
        terms: terms.into_iter().collect(),
    }
}

fn risk(range: Option<[f64; 3]>, scale: f64) -> NamedMap<VariableSpec> {
    let s = scale;
    let terms = [
        ("very_low", trimf(0.0, 0.0, 0.25 * s)),
        ("low", trimf(0.0, 0.25 * s, 0.5 * s)),
        ("medium", trimf(0.25 * s, 0.5 * s, 0.75 * s)),
        ("high", trimf(0.5 * s, 0.75 * s, s)),
        ("very_high", trimf(0.75 * s, s, s)),
    ];
    [(
        "risk",
        VariableSpec {
            range,
            terms: terms.into_iter().collect(),
        },
    )]
    .into_iter()
    .collect()
}

fn when(variable: &str, term: &str, operator: Option<Operator>) -> ConditionSpec {
    ConditionSpec::new(variable, term, operator)
}

/// The three sample rules shipped with every built-in document
fn sample_rules() -> Vec<RuleSpec> {
    use Operator::{And, Or};

    vec![
        RuleSpec {
            conditions: vec![
                when("vibration", "high", Some(Or)),
                when("noise", "high", Some(Or)),
                when("chemical", "high", None),
            ],
            then: "high".to_string(),
        },
        RuleSpec {
            conditions: vec![
                when("health", "bad", Some(And)),
                when("vibration", "medium", Some(Or)),
                when("noise", "medium", Some(Or)),
                when("chemical", "medium", None),
            ],
            then: "very_high".to_string(),
        },
        RuleSpec {
            conditions: vec![
                when("vibration", "low", Some(And)),
                when("noise", "low", Some(And)),
                when("chemical", "low", Some(And)),
                when("health", "good", None),
            ],
            then: "very_low".to_string(),
        },
    ]
}

impl FuzzyDocument {
    /// Every variable on the default `[0, 1]` universe.
    ///
    /// This is the document written when no configuration file exists.
    pub fn unit_default() -> Self {
        let level = |x: f64| {
            [
                ("low", trimf(0.0, 0.0, x)),
                ("medium", trimf(0.0, x, 2.0 * x)),
                ("high", trimf(x, 2.0 * x, 1.0)),
            ]
        };

        Self {
            variables: [
                ("vibration", variable(None, level(0.5))),
                ("noise", variable(None, level(0.5))),
                ("chemical", variable(None, level(0.4))),
                ("health", variable(None, health_terms())),
            ]
            .into_iter()
            .collect(),
            output: risk(None, 1.0),
            rules: sample_rules(),
        }
    }

    /// Physical scales: exposures on `[0, 10]`, health on `[0, 1]`, risk on `[0, 100]`
    pub fn ranged() -> Self {
        let scale = Some([0.0, 10.0, 0.1]);
        let level = |x: f64| {
            [
                ("low", trimf(0.0, 0.0, x)),
                ("medium", trimf(0.0, x, 2.0 * x)),
                ("high", trimf(x, 2.0 * x, 10.0)),
            ]
        };

        Self {
            variables: [
                ("vibration", variable(scale, level(5.0))),
                ("noise", variable(scale, level(5.0))),
                ("chemical", variable(scale, level(4.0))),
                ("health", variable(Some([0.0, 1.0, 0.01]), health_terms())),
            ]
            .into_iter()
            .collect(),
            output: risk(Some([0.0, 100.0, 1.0]), 100.0),
            rules: sample_rules(),
        }
    }
}

fn health_terms() -> [(&'static str, TermSpec); 3] {
    [
        ("bad", trimf(0.0, 0.0, 0.5)),
        ("average", trimf(0.0, 0.5, 1.0)),
        ("good", trimf(0.5, 1.0, 1.0)),
    ]
}

impl Default for FuzzyDocument {
    fn default() -> Self {
        Self::unit_default()
    }
}
