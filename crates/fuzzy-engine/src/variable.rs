//! Linguistic Variables and Terms

use membership::{Shape, ShapeKind, Universe};
use tracing::debug;

use crate::TermError;

/// Whether a variable is fed by the caller or produced by inference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Input,
    Output,
}

impl Role {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Input => "input",
            Role::Output => "output",
        }
    }
}

/// A named membership function sampled over its variable's universe
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    name: String,
    shape: Shape,
    curve: Vec<f64>,
}

impl Term {
    /// Term name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bound membership function
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Degrees at each point of the owning variable's universe
    pub fn curve(&self) -> &[f64] {
        &self.curve
    }
}

/// A linguistic variable: a universe plus its terms in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    role: Role,
    universe: Universe,
    terms: Vec<Term>,
}

impl Variable {
    /// Create a variable with no terms
    pub fn new(name: impl Into<String>, role: Role, universe: Universe) -> Self {
        Self {
            name: name.into(),
            role,
            universe,
            terms: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Terms in declaration order
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Term names in declaration order
    pub fn term_names(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.name.as_str())
    }

    /// Position of a term in declaration order
    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.name == name)
    }

    /// Add a term, sorting breakpoint parameters and sampling its curve
    pub fn add_term(
        &mut self,
        name: impl Into<String>,
        kind: ShapeKind,
        params: &[f64],
    ) -> Result<(), TermError> {
        let name = name.into();
        if self.term_index(&name).is_some() {
            return Err(TermError::Duplicate(name));
        }

        let shape = Shape::sorted(kind, params).map_err(|source| TermError::Shape {
            term: name.clone(),
            source,
        })?;

        if shape.params() != params {
            debug!(
                "Reordered {} breakpoints for {}.{}: {:?}",
                kind,
                self.name,
                name,
                shape.params()
            );
        }

        let curve = shape.sample(&self.universe);
        self.terms.push(Term { name, shape, curve });
        Ok(())
    }

    /// Remove a term, returning it
    pub fn remove_term(&mut self, name: &str) -> Result<Term, TermError> {
        let index = self
            .term_index(name)
            .ok_or_else(|| TermError::Unknown(name.to_string()))?;
        Ok(self.terms.remove(index))
    }

    /// Replace the universe and resample every term
    pub fn set_universe(&mut self, universe: Universe) {
        for term in &mut self.terms {
            term.curve = term.shape.sample(&universe);
        }
        self.universe = universe;
    }

    /// Interpolated membership of a crisp value in the named term
    pub fn membership_of(&self, term: &str, x: f64) -> Result<f64, TermError> {
        let index = self
            .term_index(term)
            .ok_or_else(|| TermError::Unknown(term.to_string()))?;
        Ok(self.degree(index, x))
    }

    /// Interpolated membership of a crisp value in the term at `index`
    pub(crate) fn degree(&self, index: usize, x: f64) -> f64 {
        self.universe.interpolate(&self.terms[index].curve, x)
    }

    /// Degrees of a crisp value in every term, in declaration order
    pub fn fuzzify(&self, x: f64) -> Vec<f64> {
        (0..self.terms.len()).map(|i| self.degree(i, x)).collect()
    }
}
