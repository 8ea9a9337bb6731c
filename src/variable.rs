//! Linguistic variables: a named universe plus its labeled membership curves.

use std::fmt;

use crate::error::{AtmoError, Result};
use crate::membership::{Shape, Universe};

// ------------- Term -------------
#[derive(Debug, Clone)]
pub struct Term {
    label: String,
    shape: Shape,
    degrees: Vec<f64>, // the shape sampled over the owning variable's universe
}

impl Term {
    pub fn label(&self) -> &str {
        &self.label
    }
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
    pub fn degrees(&self) -> &[f64] {
        &self.degrees
    }
}

// ------------- Kind -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// Receives one crisp value per evaluation.
    Input,
    /// Receives an aggregated fuzzy set and yields one crisp value.
    Output,
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VariableKind::Input => write!(f, "input"),
            VariableKind::Output => write!(f, "output"),
        }
    }
}

// ------------- Defuzzification -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Defuzzification {
    /// Center of gravity, `Σ(μ·x) / Σμ`.
    #[default]
    Centroid,
    /// First point where the running area reaches half of the total.
    Bisector,
    MeanOfMaximum,
    SmallestOfMaximum,
    LargestOfMaximum,
}

impl Defuzzification {
    /// Crisp value of `degrees` over `universe`, or `None` for an all-zero set.
    pub fn apply(&self, universe: &Universe, degrees: &[f64]) -> Option<f64> {
        let points = universe.points();
        let area: f64 = degrees.iter().sum();
        if area <= 0.0 {
            return None;
        }
        match self {
            Defuzzification::Centroid => {
                let moment: f64 = degrees.iter().zip(points).map(|(m, x)| m * x).sum();
                Some(moment / area)
            }
            Defuzzification::Bisector => {
                let half = area / 2.0;
                let mut running = 0.0;
                for (m, x) in degrees.iter().zip(points) {
                    running += m;
                    if running >= half {
                        return Some(*x);
                    }
                }
                Some(universe.max())
            }
            maximum => {
                let peak = degrees.iter().cloned().fold(0.0, f64::max);
                let at_peak: Vec<f64> = degrees
                    .iter()
                    .zip(points)
                    .filter(|(m, _)| **m == peak)
                    .map(|(_, x)| *x)
                    .collect();
                match maximum {
                    Defuzzification::SmallestOfMaximum => at_peak.first().copied(),
                    Defuzzification::LargestOfMaximum => at_peak.last().copied(),
                    _ => Some(at_peak.iter().sum::<f64>() / at_peak.len() as f64),
                }
            }
        }
    }
}

// ------------- Linguistic Variable -------------
#[derive(Debug, Clone)]
pub struct LinguisticVariable {
    name: String,
    kind: VariableKind,
    universe: Universe,
    terms: Vec<Term>,
    defuzzification: Defuzzification,
}

impl LinguisticVariable {
    pub fn input(name: &str, universe: Universe) -> Self {
        Self::new(name, VariableKind::Input, universe)
    }
    pub fn output(name: &str, universe: Universe) -> Self {
        Self::new(name, VariableKind::Output, universe)
    }
    fn new(name: &str, kind: VariableKind, universe: Universe) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            universe,
            terms: Vec::new(),
            defuzzification: Defuzzification::default(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn kind(&self) -> VariableKind {
        self.kind
    }
    pub fn universe(&self) -> &Universe {
        &self.universe
    }
    pub fn defuzzification(&self) -> Defuzzification {
        self.defuzzification
    }
    pub fn set_defuzzification(&mut self, method: Defuzzification) {
        self.defuzzification = method;
    }
    /// Adds a term; labels are unique within a variable.
    pub fn add_term(&mut self, label: &str, shape: Shape) -> Result<()> {
        if self.terms.iter().any(|t| t.label == label) {
            return Err(AtmoError::DuplicateTerm {
                variable: self.name.clone(),
                term: label.to_owned(),
            });
        }
        let degrees = shape.sample(&self.universe);
        self.terms.push(Term {
            label: label.to_owned(),
            shape,
            degrees,
        });
        Ok(())
    }
    /// Builder form of [`add_term`](Self::add_term) for a trapezoid.
    pub fn with_trapezoid(mut self, label: &str, a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        let shape = Shape::trapezoid(a, b, c, d).map_err(|e| label_breakpoints(e, label))?;
        self.add_term(label, shape)?;
        Ok(self)
    }
    /// Builder form of [`add_term`](Self::add_term) for a triangle.
    pub fn with_triangle(mut self, label: &str, a: f64, b: f64, c: f64) -> Result<Self> {
        let shape = Shape::triangle(a, b, c).map_err(|e| label_breakpoints(e, label))?;
        self.add_term(label, shape)?;
        Ok(self)
    }
    pub fn with_defuzzification(mut self, method: Defuzzification) -> Self {
        self.defuzzification = method;
        self
    }
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.label.as_str())
    }
    pub fn term(&self, label: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.label == label)
    }
    pub fn has_term(&self, label: &str) -> bool {
        self.term(label).is_some()
    }
    pub(crate) fn term_index(&self, label: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.label == label)
    }
    pub(crate) fn term_at(&self, index: usize) -> &Term {
        &self.terms[index]
    }
    pub fn len(&self) -> usize {
        self.terms.len()
    }
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
    /// Degree of `value` in the term `label`, linearly interpolated between
    /// the two bracketing universe samples and saturated outside the universe.
    pub fn membership(&self, label: &str, value: f64) -> Result<f64> {
        let term = self.term(label).ok_or_else(|| AtmoError::UnknownTerm {
            variable: self.name.clone(),
            term: label.to_owned(),
        })?;
        if !value.is_finite() {
            return Err(AtmoError::InvalidInput {
                variable: self.name.clone(),
                message: format!("{value} is not a finite number"),
            });
        }
        Ok(self.degree_at(term, value))
    }
    pub(crate) fn degree_at(&self, term: &Term, value: f64) -> f64 {
        self.universe.interpolate(&term.degrees, value)
    }
}

fn label_breakpoints(error: AtmoError, label: &str) -> AtmoError {
    match error {
        AtmoError::InvalidBreakpoints { message, .. } => AtmoError::InvalidBreakpoints {
            term: label.to_owned(),
            message,
        },
        other => other,
    }
}
