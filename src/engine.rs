//! The inference engine and its per-call evaluation sessions.
//!
//! An [`Engine`] is an immutable, validated bundle of linguistic variables and
//! rules. Evaluation happens in a [`Session`]: set every input, call
//! [`Session::compute`], read the outputs. Computing runs Mamdani inference:
//!
//! 1. every rule's firing strength is evaluated from the crisp inputs;
//! 2. each consequent term is clipped at the strongest rule naming it;
//! 3. the clipped terms of an output are aggregated pointwise by maximum;
//! 4. the aggregate is defuzzified (centroid unless the output says otherwise).
//!
//! An all-zero aggregate has no crisp value; it is reported as
//! [`AtmoError::UndefinedDefuzzification`] and the output stays unset.

// name-keyed lookups use a seedless hasher
use core::hash::BuildHasherDefault;
use seahash::SeaHasher;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{AtmoError, Result};
use crate::rule::Rule;
use crate::variable::{LinguisticVariable, VariableKind};

pub type OtherHasher = BuildHasherDefault<SeaHasher>;

// ------------- Engine -------------
#[derive(Debug)]
pub struct Engine {
    name: String,
    variables: Vec<LinguisticVariable>,
    index: HashMap<String, usize, OtherHasher>,
    rules: Vec<Rule>,
}

impl Engine {
    pub fn builder(name: &str) -> EngineBuilder {
        EngineBuilder {
            name: name.to_owned(),
            variables: Vec::new(),
            rules: Vec::new(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn variable(&self, name: &str) -> Option<&LinguisticVariable> {
        self.index.get(name).map(|i| &self.variables[*i])
    }
    pub fn inputs(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.variables.iter().filter(|v| v.kind() == VariableKind::Input)
    }
    pub fn outputs(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.variables.iter().filter(|v| v.kind() == VariableKind::Output)
    }
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
    /// A fresh session with no inputs set.
    pub fn session(&self) -> Session<'_> {
        Session {
            engine: self,
            values: vec![None; self.variables.len()],
            computed: None,
        }
    }
    // leaves are validated at build time, so unknown names cannot occur here
    fn degree(&self, values: &[Option<f64>], variable: &str, label: &str) -> f64 {
        let Some(&i) = self.index.get(variable) else {
            return 0.0;
        };
        let var = &self.variables[i];
        match (var.term(label), values[i]) {
            (Some(term), Some(value)) => var.degree_at(term, value),
            _ => 0.0,
        }
    }
}

// ------------- Builder -------------
pub struct EngineBuilder {
    name: String,
    variables: Vec<LinguisticVariable>,
    rules: Vec<Rule>,
}

impl EngineBuilder {
    pub fn variable(mut self, variable: LinguisticVariable) -> Self {
        self.variables.push(variable);
        self
    }
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }
    /// Validates the configuration: unique variable and rule names, every
    /// rule reads at least one input term and implies at least one output
    /// term, and every referenced variable and term exists in the right role.
    pub fn build(self) -> Result<Engine> {
        let mut index: HashMap<String, usize, OtherHasher> = HashMap::default();
        for (i, variable) in self.variables.iter().enumerate() {
            if index.insert(variable.name().to_owned(), i).is_some() {
                return Err(AtmoError::DuplicateVariable(variable.name().to_owned()));
            }
        }
        let mut rule_names: HashSet<&str, OtherHasher> = HashSet::default();
        for rule in &self.rules {
            if !rule_names.insert(rule.name()) {
                return Err(AtmoError::DuplicateRule(rule.name().to_owned()));
            }
            let leaves = rule.antecedent().terms();
            if leaves.is_empty() {
                return Err(AtmoError::EmptyRule {
                    rule: rule.name().to_owned(),
                    message: "antecedent references no input term".into(),
                });
            }
            if rule.consequents().is_empty() {
                return Err(AtmoError::EmptyRule {
                    rule: rule.name().to_owned(),
                    message: "rule implies no output term".into(),
                });
            }
            for (variable, label) in leaves {
                check_reference(&self.variables, &index, variable, label, VariableKind::Input)?;
            }
            for consequent in rule.consequents() {
                check_reference(
                    &self.variables,
                    &index,
                    consequent.variable(),
                    consequent.label(),
                    VariableKind::Output,
                )?;
            }
        }
        Ok(Engine {
            name: self.name,
            variables: self.variables,
            index,
            rules: self.rules,
        })
    }
}

fn check_reference(
    variables: &[LinguisticVariable],
    index: &HashMap<String, usize, OtherHasher>,
    variable: &str,
    label: &str,
    kind: VariableKind,
) -> Result<()> {
    let i = index
        .get(variable)
        .ok_or_else(|| AtmoError::UnknownVariable(variable.to_owned()))?;
    let var = &variables[*i];
    if var.kind() != kind {
        return Err(AtmoError::WrongRole {
            variable: variable.to_owned(),
            role: kind.to_string(),
        });
    }
    if !var.has_term(label) {
        return Err(AtmoError::UnknownTerm {
            variable: variable.to_owned(),
            term: label.to_owned(),
        });
    }
    Ok(())
}

// ------------- Session -------------
#[derive(Debug)]
struct Computation {
    strengths: Vec<f64>,
    // per variable, per term; empty for inputs
    activations: Vec<Vec<f64>>,
    aggregated: Vec<Option<Vec<f64>>>,
    outputs: Vec<Option<f64>>,
}

/// Ephemeral state of one inference call. Sessions are cheap; make a new one
/// for each unrelated set of inputs.
#[derive(Debug)]
pub struct Session<'e> {
    engine: &'e Engine,
    values: Vec<Option<f64>>,
    computed: Option<Computation>,
}

impl<'e> Session<'e> {
    pub fn engine(&self) -> &'e Engine {
        self.engine
    }
    /// Sets the crisp value of a declared input. Values outside the universe
    /// are accepted and saturate at the boundary terms.
    pub fn set_input(&mut self, name: &str, value: f64) -> Result<&mut Self> {
        let i = *self
            .engine
            .index
            .get(name)
            .ok_or_else(|| AtmoError::UnknownVariable(name.to_owned()))?;
        if self.engine.variables[i].kind() != VariableKind::Input {
            return Err(AtmoError::WrongRole {
                variable: name.to_owned(),
                role: VariableKind::Input.to_string(),
            });
        }
        if !value.is_finite() {
            return Err(AtmoError::InvalidInput {
                variable: name.to_owned(),
                message: format!("{value} is not a finite number"),
            });
        }
        self.values[i] = Some(value);
        self.computed = None;
        Ok(self)
    }
    pub fn input(&self, name: &str) -> Option<f64> {
        self.engine.index.get(name).and_then(|i| self.values[*i])
    }
    /// Runs inference. Fails with `IncompleteInput` naming the first unset
    /// input, or with `UndefinedDefuzzification` naming the first output no
    /// rule fired for; the other outputs are still computed and readable.
    pub fn compute(&mut self) -> Result<()> {
        let engine = self.engine;
        if let Some(missing) = engine
            .variables
            .iter()
            .enumerate()
            .find(|(i, v)| v.kind() == VariableKind::Input && self.values[*i].is_none())
        {
            return Err(AtmoError::IncompleteInput {
                variable: missing.1.name().to_owned(),
            });
        }

        let values = &self.values;
        let degree = |variable: &str, label: &str| engine.degree(values, variable, label);
        let strengths: Vec<f64> = engine.rules.iter().map(|r| r.firing_strength(&degree)).collect();

        let mut activations: Vec<Vec<f64>> = engine
            .variables
            .iter()
            .map(|v| match v.kind() {
                VariableKind::Input => Vec::new(),
                VariableKind::Output => vec![0.0; v.len()],
            })
            .collect();
        for (rule, strength) in engine.rules.iter().zip(&strengths) {
            for consequent in rule.consequents() {
                let Some(&v) = engine.index.get(consequent.variable()) else {
                    continue;
                };
                let Some(t) = engine.variables[v].term_index(consequent.label()) else {
                    continue;
                };
                let slot = &mut activations[v][t];
                *slot = slot.max(*strength);
            }
        }

        let mut aggregated = Vec::with_capacity(engine.variables.len());
        let mut outputs = Vec::with_capacity(engine.variables.len());
        let mut undefined: Option<&str> = None;
        for (v, variable) in engine.variables.iter().enumerate() {
            if variable.kind() == VariableKind::Input {
                aggregated.push(None);
                outputs.push(None);
                continue;
            }
            let mut set = vec![0.0_f64; variable.universe().len()];
            for (t, level) in activations[v].iter().enumerate() {
                if *level <= 0.0 {
                    continue;
                }
                let term = variable.term_at(t);
                for (agg, mu) in set.iter_mut().zip(term.degrees()) {
                    *agg = agg.max(mu.min(*level));
                }
            }
            let crisp = variable.defuzzification().apply(variable.universe(), &set);
            if crisp.is_none() && undefined.is_none() {
                undefined = Some(variable.name());
            }
            aggregated.push(Some(set));
            outputs.push(crisp);
        }

        self.computed = Some(Computation {
            strengths,
            activations,
            aggregated,
            outputs,
        });
        match undefined {
            Some(output) => Err(AtmoError::UndefinedDefuzzification {
                output: output.to_owned(),
            }),
            None => Ok(()),
        }
    }
    /// Crisp value of an output after `compute`; `None` if it could not be
    /// computed.
    pub fn output(&self, name: &str) -> Option<f64> {
        let computed = self.computed.as_ref()?;
        self.engine.index.get(name).and_then(|i| computed.outputs[*i])
    }
    /// Every output that has a crisp value, by name.
    pub fn outputs(&self) -> BTreeMap<String, f64> {
        let mut found = BTreeMap::new();
        if let Some(computed) = &self.computed {
            for (variable, value) in self.engine.variables.iter().zip(&computed.outputs) {
                if let Some(value) = value {
                    found.insert(variable.name().to_owned(), *value);
                }
            }
        }
        found
    }
    /// Rule name and firing strength, in rule order.
    pub fn firing_strengths(&self) -> Vec<(&'e str, f64)> {
        match &self.computed {
            Some(computed) => self
                .engine
                .rules
                .iter()
                .zip(&computed.strengths)
                .map(|(r, s)| (r.name(), *s))
                .collect(),
            None => Vec::new(),
        }
    }
    /// The level `output`'s term `label` was clipped at.
    pub fn activation(&self, output: &str, label: &str) -> Option<f64> {
        let computed = self.computed.as_ref()?;
        let v = *self.engine.index.get(output)?;
        let t = self.engine.variables[v].term_index(label)?;
        computed.activations[v].get(t).copied()
    }
    /// The aggregated fuzzy set of an output, one degree per universe point.
    pub fn aggregated(&self, output: &str) -> Option<&[f64]> {
        let computed = self.computed.as_ref()?;
        let v = *self.engine.index.get(output)?;
        computed.aggregated[v].as_deref()
    }
    /// The output term with the highest activation; ties go to the term
    /// declared first. `None` when nothing fired.
    pub fn dominant_term(&self, output: &str) -> Option<&'e str> {
        let computed = self.computed.as_ref()?;
        let v = *self.engine.index.get(output)?;
        let variable = &self.engine.variables[v];
        let mut best: Option<(usize, f64)> = None;
        for (t, level) in computed.activations[v].iter().enumerate() {
            if *level > 0.0 && best.is_none_or(|(_, b)| *level > b) {
                best = Some((t, *level));
            }
        }
        best.map(|(t, _)| variable.term_at(t).label())
    }
}

/// One-shot evaluation: sets every named value that is a declared input of
/// `engine` (other names are ignored), computes, and returns the outputs.
pub fn evaluate<'a, I>(engine: &Engine, inputs: I) -> Result<BTreeMap<String, f64>>
where
    I: IntoIterator<Item = (&'a String, &'a f64)>,
{
    let mut session = engine.session();
    for (name, value) in inputs {
        let is_input = engine
            .variable(name)
            .is_some_and(|v| v.kind() == VariableKind::Input);
        if is_input {
            session.set_input(name, *value)?;
        }
    }
    session.compute()?;
    Ok(session.outputs())
}
