use atmofuzz::AtmoError;
use atmofuzz::membership::{Shape, Universe};
use atmofuzz::rule::{Rule, all_of, any_of, is, none_of};
use atmofuzz::variable::{Defuzzification, LinguisticVariable, VariableKind};

fn pm2_5() -> LinguisticVariable {
    LinguisticVariable::input("pm2_5", Universe::new(0.0, 500.0, 1.0).unwrap())
        .with_trapezoid("good", 0.0, 0.0, 10.0, 15.0)
        .unwrap()
        .with_trapezoid("moderate", 10.0, 15.0, 30.0, 40.0)
        .unwrap()
}

#[test]
fn membership_reads_sampled_terms() {
    let var = pm2_5();
    assert_eq!(var.kind(), VariableKind::Input);
    assert_eq!(var.terms().collect::<Vec<_>>(), ["good", "moderate"]);
    assert_eq!(var.membership("good", 5.0).unwrap(), 1.0);
    assert!((var.membership("good", 12.5).unwrap() - 0.5).abs() < 1e-9);
    assert!((var.membership("moderate", 12.5).unwrap() - 0.5).abs() < 1e-9);
    // beyond the universe the end sample holds
    assert_eq!(var.membership("good", -20.0).unwrap(), 1.0);
    assert_eq!(var.membership("moderate", 900.0).unwrap(), 0.0);
}

#[test]
fn membership_errors() {
    let var = pm2_5();
    match var.membership("hazardous", 10.0) {
        Err(AtmoError::UnknownTerm { variable, term }) => {
            assert_eq!(variable, "pm2_5");
            assert_eq!(term, "hazardous");
        }
        other => panic!("expected UnknownTerm, got {other:?}"),
    }
    assert!(matches!(var.membership("good", f64::NAN), Err(AtmoError::InvalidInput { .. })));
}

#[test]
fn duplicate_term_is_rejected() {
    let mut var = pm2_5();
    let err = var.add_term("good", Shape::triangle(0.0, 1.0, 2.0).unwrap()).unwrap_err();
    assert!(matches!(err, AtmoError::DuplicateTerm { .. }));
    assert_eq!(var.len(), 2);
}

#[test]
fn breakpoint_errors_name_the_term() {
    let err = LinguisticVariable::output("risk", Universe::new(0.0, 100.0, 1.0).unwrap())
        .with_triangle("low", 30.0, 15.0, 0.0)
        .unwrap_err();
    match err {
        AtmoError::InvalidBreakpoints { term, .. } => assert_eq!(term, "low"),
        other => panic!("expected InvalidBreakpoints, got {other:?}"),
    }
}

#[test]
fn defuzzification_methods() {
    let u = Universe::new(0.0, 4.0, 1.0).unwrap();
    let set = [0.0, 1.0, 1.0, 0.0, 0.0];
    assert_eq!(Defuzzification::Centroid.apply(&u, &set), Some(1.5));
    assert_eq!(Defuzzification::Bisector.apply(&u, &set), Some(1.0));
    assert_eq!(Defuzzification::MeanOfMaximum.apply(&u, &set), Some(1.5));
    assert_eq!(Defuzzification::SmallestOfMaximum.apply(&u, &set), Some(1.0));
    assert_eq!(Defuzzification::LargestOfMaximum.apply(&u, &set), Some(2.0));
    let methods = [
        Defuzzification::Centroid,
        Defuzzification::Bisector,
        Defuzzification::MeanOfMaximum,
    ];
    for method in methods {
        assert_eq!(method.apply(&u, &[0.0; 5]), None);
    }
    assert_eq!(Defuzzification::default(), Defuzzification::Centroid);
}

#[test]
fn zadeh_operators() {
    let degree = |variable: &str, label: &str| match (variable, label) {
        ("a", "x") => 0.2,
        ("b", "y") => 0.7,
        _ => 0.0,
    };
    assert_eq!(is("a", "x").and(is("b", "y")).evaluate(&degree), 0.2);
    assert_eq!(is("a", "x").or(is("b", "y")).evaluate(&degree), 0.7);
    assert!((is("b", "y").negated().evaluate(&degree) - 0.3).abs() < 1e-12);
    assert!((none_of(vec![is("a", "x"), is("b", "y")]).evaluate(&degree) - 0.3).abs() < 1e-12);
    assert_eq!(all_of(vec![]).evaluate(&degree), 1.0);
    assert_eq!(any_of(vec![]).evaluate(&degree), 0.0);
}

#[test]
fn rule_lists_leaves_and_prints() {
    let rule = Rule::new("guarded", is("a", "x").and(is("b", "y").negated()))
        .implies("out", "high")
        .implies("rec", "stay");
    assert_eq!(rule.antecedent().terms(), [("a", "x"), ("b", "y")]);
    assert_eq!(rule.consequents().len(), 2);
    assert_eq!(rule.to_string(), "guarded: IF (a[x] & ~b[y]) THEN out[high], rec[stay]");
}
