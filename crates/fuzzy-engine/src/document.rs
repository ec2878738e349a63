//! Configuration Document
//!
//! Typed form of the JSON configuration. Field names and nesting match the
//! files written by the configuration editor:
//!
//! ```json
//! {
//!   "variables": { "vibration": { "range": [0, 1, 0.01], "terms": { "low": { "type": "trimf", "params": [0, 0, 0.5] } } } },
//!   "output": { "risk": { "terms": { ... } } },
//!   "rules": [ { "if": [ { "variable": "vibration", "term": "low", "operator": "and" } ], "then": "very_low" } ]
//! }
//! ```
//!
//! `range` is optional and defaults to `[0, 1, 0.01]`.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::rule::Operator;
use crate::ConfigError;

/// Name-keyed entries kept in document order.
///
/// Serialized as a JSON object. Duplicate keys are rejected on parse.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMap<T>(Vec<(String, T)>);

impl<T> NamedMap<T> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an entry; returns false and leaves the map unchanged if the name exists
    pub fn insert(&mut self, name: impl Into<String>, value: T) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.0.push((name, value));
        true
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.0.iter_mut().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Default for NamedMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Into<String>, T> FromIterator<(S, T)> for NamedMap<T> {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl<T: Serialize> Serialize for NamedMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct NamedMapVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for NamedMapVisitor<T> {
    type Value = NamedMap<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of named entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = NamedMap(Vec::with_capacity(access.size_hint().unwrap_or(0)));
        while let Some((name, value)) = access.next_entry::<String, T>()? {
            if map.contains(&name) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate entry '{}'",
                    name
                )));
            }
            map.0.push((name, value));
        }
        Ok(map)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for NamedMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NamedMapVisitor(PhantomData))
    }
}

/// Whole configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyDocument {
    /// Input variables by name
    pub variables: NamedMap<VariableSpec>,
    /// The single output variable, keyed by its name
    #[serde(default)]
    pub output: NamedMap<VariableSpec>,
    /// Rules in evaluation order
    pub rules: Vec<RuleSpec>,
}

impl FuzzyDocument {
    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render as indented JSON
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One variable: optional `[lo, hi, step]` range and its terms
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VariableSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 3]>,
    #[serde(default)]
    pub terms: NamedMap<TermSpec>,
}

/// One term: membership function name and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSpec {
    #[serde(rename = "type", default = "default_shape")]
    pub kind: String,
    #[serde(default)]
    pub params: Vec<f64>,
}

fn default_shape() -> String {
    "trimf".to_string()
}

impl TermSpec {
    pub fn new(kind: impl Into<String>, params: Vec<f64>) -> Self {
        Self {
            kind: kind.into(),
            params,
        }
    }
}

/// One rule: conditions under `if`, output term under `then`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(rename = "if")]
    pub conditions: Vec<ConditionSpec>,
    pub then: String,
}

/// One `variable IS term` condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    pub variable: String,
    pub term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
}

impl ConditionSpec {
    pub fn new(variable: impl Into<String>, term: impl Into<String>, operator: Option<Operator>) -> Self {
        Self {
            variable: variable.into(),
            term: term.into(),
            operator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "variables": {
            "noise": {
                "terms": {
                    "quiet": {"type": "trimf", "params": [0, 0, 0.5]},
                    "loud": {"params": [0.5, 1, 1]}
                }
            },
            "vibration": {
                "range": [0, 10, 0.1],
                "terms": {"high": {"type": "gaussmf", "params": [10, 2]}}
            }
        },
        "output": {"risk": {"terms": {"low": {"type": "trimf", "params": [0, 0, 1]}}}},
        "rules": [
            {"if": [{"variable": "noise", "term": "loud", "operator": "or"},
                    {"variable": "vibration", "term": "high"}], "then": "low"}
        ]
    }"#;

    #[test]
    fn test_parse_preserves_order_and_defaults() {
        let doc = FuzzyDocument::from_json(MINIMAL).unwrap();
        assert_eq!(doc.variables.names().collect::<Vec<_>>(), vec!["noise", "vibration"]);

        let noise = doc.variables.get("noise").unwrap();
        assert_eq!(noise.range, None);
        assert_eq!(noise.terms.names().collect::<Vec<_>>(), vec!["quiet", "loud"]);
        assert_eq!(noise.terms.get("loud").unwrap().kind, "trimf");

        let vibration = doc.variables.get("vibration").unwrap();
        assert_eq!(vibration.range, Some([0.0, 10.0, 0.1]));

        let rule = &doc.rules[0];
        assert_eq!(rule.then, "low");
        assert_eq!(rule.conditions[0].operator, Some(Operator::Or));
        assert_eq!(rule.conditions[1].operator, None);
    }

    #[test]
    fn test_duplicate_term_is_parse_error() {
        let json = r#"{
            "variables": {"noise": {"terms": {"a": {"params": [0, 0, 1]}, "a": {"params": [0, 1, 1]}}}},
            "rules": []
        }"#;
        let err = FuzzyDocument::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(msg) if msg.contains("duplicate entry 'a'")));
    }

    #[test]
    fn test_missing_sections_are_parse_errors() {
        assert!(matches!(
            FuzzyDocument::from_json(r#"{"rules": []}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            FuzzyDocument::from_json(r#"{"variables": {}}"#),
            Err(ConfigError::Parse(_))
        ));
        let doc = FuzzyDocument::from_json(r#"{"variables": {}, "rules": []}"#).unwrap();
        assert!(doc.output.is_empty());
    }

    #[test]
    fn test_serialized_form_keeps_field_names() {
        let doc = FuzzyDocument::from_json(MINIMAL).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();

        assert!(value["variables"]["noise"].get("range").is_none());
        assert_eq!(value["variables"]["vibration"]["range"][1], 10.0);
        assert_eq!(value["variables"]["noise"]["terms"]["loud"]["type"], "trimf");
        assert_eq!(value["rules"][0]["if"][0]["operator"], "or");
        assert!(value["rules"][0]["if"][1].get("operator").is_none());
        assert_eq!(value["rules"][0]["then"], "low");

        let again = FuzzyDocument::from_json(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(again, doc);
    }

    #[test]
    fn test_named_map_insert_rejects_existing() {
        let mut map = NamedMap::new();
        assert!(map.insert("a", 1));
        assert!(!map.insert("a", 2));
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.len(), 1);
    }
}
