//! Fuzzy rules: an antecedent expression over input terms and the output
//! terms it implies.
//!
//! Antecedents are small expression trees combined with the Zadeh operators:
//! `AND` is `min`, `OR` is `max` and `NOT` is `1 - x`. A rule fires with the
//! value of its antecedent, and that same strength feeds every consequent it
//! names, which is how one rule sets several outputs at once.

use std::fmt;

// ------------- Antecedent -------------
#[derive(Debug, Clone, PartialEq)]
pub enum Antecedent {
    Term { variable: String, label: String },
    And(Box<Antecedent>, Box<Antecedent>),
    Or(Box<Antecedent>, Box<Antecedent>),
    Not(Box<Antecedent>),
    /// A fixed degree; the neutral element of an empty `all_of`/`any_of`.
    Constant(f64),
}

/// Leaf: "`variable` is `label`".
pub fn is(variable: &str, label: &str) -> Antecedent {
    Antecedent::Term {
        variable: variable.to_owned(),
        label: label.to_owned(),
    }
}

/// Left fold of `parts` with AND; an empty list is always true.
pub fn all_of(parts: Vec<Antecedent>) -> Antecedent {
    fold(parts, Antecedent::and, 1.0)
}

/// Left fold of `parts` with OR; an empty list is never true.
pub fn any_of(parts: Vec<Antecedent>) -> Antecedent {
    fold(parts, Antecedent::or, 0.0)
}

/// AND of the negations of `parts`; the guard form "not this and not that".
pub fn none_of(parts: Vec<Antecedent>) -> Antecedent {
    all_of(parts.into_iter().map(Antecedent::negated).collect())
}

fn fold(
    parts: Vec<Antecedent>,
    join: fn(Antecedent, Antecedent) -> Antecedent,
    neutral: f64,
) -> Antecedent {
    let mut parts = parts.into_iter();
    match parts.next() {
        Some(first) => parts.fold(first, join),
        None => Antecedent::Constant(neutral),
    }
}

impl Antecedent {
    pub fn and(self, other: Antecedent) -> Antecedent {
        Antecedent::And(Box::new(self), Box::new(other))
    }
    pub fn or(self, other: Antecedent) -> Antecedent {
        Antecedent::Or(Box::new(self), Box::new(other))
    }
    pub fn negated(self) -> Antecedent {
        Antecedent::Not(Box::new(self))
    }
    /// Evaluates the tree; `degree(variable, label)` supplies the leaves.
    pub fn evaluate<F>(&self, degree: &F) -> f64
    where
        F: Fn(&str, &str) -> f64,
    {
        match self {
            Antecedent::Term { variable, label } => degree(variable, label),
            Antecedent::And(x, y) => x.evaluate(degree).min(y.evaluate(degree)),
            Antecedent::Or(x, y) => x.evaluate(degree).max(y.evaluate(degree)),
            Antecedent::Not(x) => 1.0 - x.evaluate(degree),
            Antecedent::Constant(c) => *c,
        }
    }
    /// Every `(variable, label)` leaf, left to right.
    pub fn terms(&self) -> Vec<(&str, &str)> {
        let mut found = Vec::new();
        self.collect_terms(&mut found);
        found
    }
    fn collect_terms<'a>(&'a self, found: &mut Vec<(&'a str, &'a str)>) {
        match self {
            Antecedent::Term { variable, label } => found.push((variable, label)),
            Antecedent::And(x, y) | Antecedent::Or(x, y) => {
                x.collect_terms(found);
                y.collect_terms(found);
            }
            Antecedent::Not(x) => x.collect_terms(found),
            Antecedent::Constant(_) => (),
        }
    }
}

impl fmt::Display for Antecedent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Antecedent::Term { variable, label } => write!(f, "{variable}[{label}]"),
            Antecedent::And(x, y) => write!(f, "({x} & {y})"),
            Antecedent::Or(x, y) => write!(f, "({x} | {y})"),
            Antecedent::Not(x) => write!(f, "~{x}"),
            Antecedent::Constant(c) => write!(f, "{c}"),
        }
    }
}

// ------------- Consequent -------------
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Consequent {
    variable: String,
    label: String,
}

impl Consequent {
    pub fn new(variable: &str, label: &str) -> Self {
        Self {
            variable: variable.to_owned(),
            label: label.to_owned(),
        }
    }
    pub fn variable(&self) -> &str {
        &self.variable
    }
    pub fn label(&self) -> &str {
        &self.label
    }
}

// ------------- Rule -------------
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    antecedent: Antecedent,
    consequents: Vec<Consequent>,
}

impl Rule {
    pub fn new(name: &str, antecedent: Antecedent) -> Self {
        Self {
            name: name.to_owned(),
            antecedent,
            consequents: Vec::new(),
        }
    }
    /// Adds the implication "then `variable` is `label`".
    pub fn implies(mut self, variable: &str, label: &str) -> Self {
        self.consequents.push(Consequent::new(variable, label));
        self
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn antecedent(&self) -> &Antecedent {
        &self.antecedent
    }
    pub fn consequents(&self) -> &[Consequent] {
        &self.consequents
    }
    /// Firing strength in `[0, 1]` for the given leaf degrees.
    pub fn firing_strength<F>(&self, degree: &F) -> f64
    where
        F: Fn(&str, &str) -> f64,
    {
        self.antecedent.evaluate(degree).clamp(0.0, 1.0)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: IF {} THEN ", self.name, self.antecedent)?;
        for (i, c) in self.consequents.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}[{}]", c.variable, c.label)?;
        }
        Ok(())
    }
}
