//! Fuzzy Rules
//!
//! A rule's antecedent is folded strictly left to right: each condition
//! after the first combines with everything accumulated before it, so
//! `A or B and C` reads as `(A or B) and C`. There is no precedence.

use serde::{Deserialize, Serialize};

/// How a condition combines with the accumulated antecedent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Minimum (Mamdani T-norm)
    #[serde(alias = "AND")]
    And,
    /// Maximum (Mamdani T-conorm)
    #[serde(alias = "OR")]
    Or,
}

impl Operator {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
        }
    }

    /// Combine the running result with the next condition's degree
    pub fn combine(self, accumulated: f64, degree: f64) -> f64 {
        match self {
            Operator::And => accumulated.min(degree),
            Operator::Or => accumulated.max(degree),
        }
    }
}

/// One `variable IS term` test, resolved to indices at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    /// Index of the input variable
    pub variable: usize,
    /// Index of the term within that variable
    pub term: usize,
    /// Combination with prior conditions; `None` on the first condition
    pub operator: Option<Operator>,
}

/// A rule: conditions folded left to right, implying one output term
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    conditions: Vec<Condition>,
    consequent: usize,
}

impl Rule {
    /// Conditions must be non-empty; the loader rejects empty antecedents
    pub(crate) fn new(conditions: Vec<Condition>, consequent: usize) -> Self {
        debug_assert!(!conditions.is_empty());
        Self {
            conditions,
            consequent,
        }
    }

    /// Conditions in evaluation order
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Index of the implied output term
    pub fn consequent(&self) -> usize {
        self.consequent
    }

    /// Degree to which the antecedent holds.
    ///
    /// `degrees[v][t]` is the fuzzified degree of term `t` of input `v`.
    /// A missing operator after the first condition means AND.
    pub fn firing_strength(&self, degrees: &[Vec<f64>]) -> f64 {
        let degree = |c: &Condition| degrees[c.variable][c.term];

        let mut conditions = self.conditions.iter();
        let Some(first) = conditions.next() else {
            return 0.0;
        };

        conditions
            .fold(degree(first), |acc, c| {
                c.operator.unwrap_or(Operator::And).combine(acc, degree(c))
            })
            .clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(variable: usize, operator: Option<Operator>) -> Condition {
        Condition {
            variable,
            term: 0,
            operator,
        }
    }

    #[test]
    fn test_single_condition_passes_degree_through() {
        let rule = Rule::new(vec![cond(0, None)], 0);
        assert_eq!(rule.firing_strength(&[vec![0.42]]), 0.42);
    }

    #[test]
    fn test_fold_is_left_to_right() {
        // A=0.3, B=0.7 (or), C=0.9 (and): max(0.3, 0.7) = 0.7, then min(0.7, 0.9) = 0.7
        let degrees = vec![vec![0.3], vec![0.7], vec![0.9]];
        let rule = Rule::new(
            vec![
                cond(0, None),
                cond(1, Some(Operator::Or)),
                cond(2, Some(Operator::And)),
            ],
            0,
        );
        assert_eq!(rule.firing_strength(&degrees), 0.7);
    }

    #[test]
    fn test_fold_differs_from_precedence() {
        // (A or B) and C with C=0.1 gives 0.1; A or (B and C) would give 0.8
        let degrees = vec![vec![0.8], vec![0.2], vec![0.1]];
        let rule = Rule::new(
            vec![
                cond(0, None),
                cond(1, Some(Operator::Or)),
                cond(2, Some(Operator::And)),
            ],
            0,
        );
        assert_eq!(rule.firing_strength(&degrees), 0.1);
    }

    #[test]
    fn test_missing_operator_means_and() {
        let degrees = vec![vec![0.6], vec![0.4]];
        let rule = Rule::new(vec![cond(0, None), cond(1, None)], 0);
        assert_eq!(rule.firing_strength(&degrees), 0.4);
    }

    #[test]
    fn test_first_operator_ignored() {
        let degrees = vec![vec![0.6], vec![0.4]];
        let rule = Rule::new(
            vec![cond(0, Some(Operator::Or)), cond(1, Some(Operator::And))],
            0,
        );
        assert_eq!(rule.firing_strength(&degrees), 0.4);
    }

    #[test]
    fn test_operator_wire_names() {
        let and: Operator = serde_json::from_str("\"and\"").unwrap();
        let or: Operator = serde_json::from_str("\"OR\"").unwrap();
        assert_eq!(and, Operator::And);
        assert_eq!(or, Operator::Or);
        assert!(serde_json::from_str::<Operator>("\"xor\"").is_err());
        assert_eq!(serde_json::to_string(&Operator::Or).unwrap(), "\"or\"");
    }
}
