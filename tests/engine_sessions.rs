use std::collections::BTreeMap;

use atmofuzz::engine::{Engine, evaluate};
use atmofuzz::membership::Universe;
use atmofuzz::rule::{Rule, is};
use atmofuzz::subsystem::{OTHER_RISK, build_gas_engine, build_other_engine};
use atmofuzz::variable::{Defuzzification, LinguisticVariable};
use atmofuzz::AtmoError;

fn level() -> LinguisticVariable {
    LinguisticVariable::input("level", Universe::new(0.0, 10.0, 1.0).unwrap())
        .with_trapezoid("low", 0.0, 0.0, 3.0, 6.0)
        .unwrap()
        .with_trapezoid("high", 4.0, 7.0, 10.0, 10.0)
        .unwrap()
}

fn alarm() -> LinguisticVariable {
    LinguisticVariable::output("alarm", Universe::new(0.0, 10.0, 1.0).unwrap())
        .with_triangle("off", 0.0, 0.0, 5.0)
        .unwrap()
        .with_triangle("on", 5.0, 10.0, 10.0)
        .unwrap()
}

fn inputs(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn build_rejects_bad_references() {
    let unknown_variable = Engine::builder("t")
        .variable(level())
        .variable(alarm())
        .rule(Rule::new("r", is("pressure", "low")).implies("alarm", "off"))
        .build();
    assert!(
        matches!(unknown_variable, Err(AtmoError::UnknownVariable(name)) if name == "pressure")
    );

    let unknown_term = Engine::builder("t")
        .variable(level())
        .variable(alarm())
        .rule(Rule::new("r", is("level", "medium")).implies("alarm", "off"))
        .build();
    assert!(matches!(unknown_term, Err(AtmoError::UnknownTerm { .. })));

    let output_as_antecedent = Engine::builder("t")
        .variable(level())
        .variable(alarm())
        .rule(Rule::new("r", is("alarm", "on")).implies("alarm", "off"))
        .build();
    assert!(matches!(output_as_antecedent, Err(AtmoError::WrongRole { .. })));

    let input_as_consequent = Engine::builder("t")
        .variable(level())
        .variable(alarm())
        .rule(Rule::new("r", is("level", "low")).implies("level", "high"))
        .build();
    assert!(matches!(input_as_consequent, Err(AtmoError::WrongRole { .. })));
}

#[test]
fn build_rejects_duplicates_and_empty_rules() {
    let twice = Engine::builder("t").variable(level()).variable(level()).build();
    assert!(matches!(twice, Err(AtmoError::DuplicateVariable(_))));

    let same_rule = Engine::builder("t")
        .variable(level())
        .variable(alarm())
        .rule(Rule::new("r", is("level", "low")).implies("alarm", "off"))
        .rule(Rule::new("r", is("level", "high")).implies("alarm", "on"))
        .build();
    assert!(matches!(same_rule, Err(AtmoError::DuplicateRule(_))));

    let no_consequent = Engine::builder("t")
        .variable(level())
        .variable(alarm())
        .rule(Rule::new("r", is("level", "low")))
        .build();
    assert!(matches!(no_consequent, Err(AtmoError::EmptyRule { .. })));
}

#[test]
fn session_rejects_bad_inputs() {
    let engine = build_gas_engine().unwrap();
    let mut session = engine.session();
    assert!(matches!(session.set_input("o3", 1.0), Err(AtmoError::UnknownVariable(_))));
    assert!(matches!(session.set_input("Gas_Risk", 1.0), Err(AtmoError::WrongRole { .. })));
    assert!(matches!(session.set_input("co", f64::NAN), Err(AtmoError::InvalidInput { .. })));
    session.set_input("co", 200.0).unwrap().set_input("no2", 10.0).unwrap();
    match session.compute() {
        Err(AtmoError::IncompleteInput { variable }) => assert_eq!(variable, "so2"),
        other => panic!("expected IncompleteInput, got {other:?}"),
    }
    assert!(session.outputs().is_empty());
}

#[test]
fn nothing_fired_is_undefined() {
    // o3 good but nh3 medium: no rule of the other engine covers it
    let engine = build_other_engine().unwrap();
    let err = evaluate(&engine, &inputs(&[("o3", 40.0), ("nh3", 150.0)])).unwrap_err();
    match err {
        AtmoError::UndefinedDefuzzification { output } => assert_eq!(output, OTHER_RISK),
        other => panic!("expected UndefinedDefuzzification, got {other:?}"),
    }
    let mut session = engine.session();
    session.set_input("o3", 40.0).unwrap().set_input("nh3", 150.0).unwrap();
    assert!(session.compute().is_err());
    assert_eq!(session.output(OTHER_RISK), None);
    assert_eq!(session.dominant_term(OTHER_RISK), None);
    assert!(session.firing_strengths().iter().all(|(_, s)| *s == 0.0));
}

#[test]
fn evaluation_is_deterministic() {
    let engine = build_gas_engine().unwrap();
    let values = inputs(&[("co", 11_000.0), ("no2", 350.0), ("so2", 90.0)]);
    let first = evaluate(&engine, &values).unwrap();
    for _ in 0..5 {
        assert_eq!(evaluate(&engine, &values).unwrap(), first);
    }
}

#[test]
fn extra_names_are_ignored() {
    let engine = build_gas_engine().unwrap();
    let values = inputs(&[("co", 200.0), ("no2", 10.0), ("so2", 5.0), ("ozone", 80.0)]);
    let outputs = evaluate(&engine, &values).unwrap();
    assert_eq!(outputs.len(), 1);
    assert!((outputs["Gas_Risk"] - 11.41).abs() < 0.01);
}

#[test]
fn session_introspection() {
    let engine = Engine::builder("alarm")
        .variable(level())
        .variable(alarm())
        .rules([
            Rule::new("calm", is("level", "low")).implies("alarm", "off"),
            Rule::new("raised", is("level", "high")).implies("alarm", "on"),
        ])
        .build()
        .unwrap();
    let mut session = engine.session();
    session.set_input("level", 5.0).unwrap();
    session.compute().unwrap();

    let strengths = session.firing_strengths();
    assert_eq!(strengths[0].0, "calm");
    assert!((strengths[0].1 - 1.0 / 3.0).abs() < 1e-9);
    assert!((strengths[1].1 - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(session.activation("alarm", "off"), Some(strengths[0].1));
    assert_eq!(session.aggregated("alarm").map(<[f64]>::len), Some(11));
    // equal activations: the first declared term wins
    assert_eq!(session.dominant_term("alarm"), Some("off"));
    assert!((session.output("alarm").unwrap() - 5.0).abs() < 1e-9);

    session.set_input("level", 9.0).unwrap();
    assert_eq!(session.output("alarm"), None);
    session.compute().unwrap();
    assert_eq!(session.dominant_term("alarm"), Some("on"));
    assert!(session.output("alarm").unwrap() > 5.0);
}

#[test]
fn output_method_is_honored() {
    let engine = Engine::builder("alarm")
        .variable(level())
        .variable(alarm().with_defuzzification(Defuzzification::LargestOfMaximum))
        .rule(Rule::new("raised", is("level", "high")).implies("alarm", "on"))
        .build()
        .unwrap();
    let outputs = evaluate(&engine, &inputs(&[("level", 10.0)])).unwrap();
    assert_eq!(outputs["alarm"], 10.0);
}
