use atmofuzz::AtmoError;
use atmofuzz::membership::{Shape, Universe, trapezoid, triangle};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn universe_includes_upper_bound() {
    let u = Universe::new(0.0, 5.0, 0.1).unwrap();
    assert_eq!(u.len(), 51);
    assert!(close(u.max(), 5.0));
    let u = Universe::new(0.0, 50_000.0, 10.0).unwrap();
    assert_eq!(u.len(), 5_001);
    assert_eq!(u.min(), 0.0);
}

#[test]
fn universe_stops_below_off_grid_bound() {
    let u = Universe::new(0.0, 10.5, 1.0).unwrap();
    assert_eq!(u.len(), 11);
    assert_eq!(u.max(), 10.0);
}

#[test]
fn invalid_universes_are_rejected() {
    let bad = [
        (0.0, 10.0, 0.0),
        (0.0, 10.0, -1.0),
        (5.0, 5.0, 1.0),
        (0.0, f64::NAN, 1.0),
        // the point count overflows
        (0.0, 1e300, 1e-300),
        // finite but far too many points
        (0.0, 1e7, 1.0),
        // a single point cannot span the interval
        (0.0, 1.0, 5.0),
    ];
    for (min, max, step) in bad {
        let err = Universe::new(min, max, step).unwrap_err();
        assert!(matches!(err, AtmoError::InvalidUniverse { .. }), "{min} {max} {step}: {err}");
    }
    let both_ends = Universe::new(0.0, 1.0, 1.0).unwrap();
    assert_eq!((both_ends.len(), both_ends.max()), (2, 1.0));
    assert!(Universe::from_points(vec![1.0]).is_err());
    assert!(Universe::from_points(vec![0.0, 2.0, 1.0]).is_err());
    assert_eq!(Universe::from_points(vec![0.0, 0.5, 2.0]).unwrap().len(), 3);
}

#[test]
fn trapezoid_degrees() {
    let shape = Shape::trapezoid(10.0, 15.0, 30.0, 40.0).unwrap();
    assert_eq!(shape.degree(5.0), 0.0);
    assert_eq!(shape.degree(10.0), 0.0);
    assert!(close(shape.degree(12.5), 0.5));
    assert_eq!(shape.degree(15.0), 1.0);
    assert_eq!(shape.degree(30.0), 1.0);
    assert!(close(shape.degree(35.0), 0.5));
    assert_eq!(shape.degree(40.0), 0.0);
    assert_eq!(shape.degree(41.0), 0.0);
}

#[test]
fn shoulders_have_no_division_by_zero() {
    let left = Shape::trapezoid(0.0, 0.0, 10.0, 15.0).unwrap();
    assert_eq!(left.degree(0.0), 1.0);
    assert_eq!(left.degree(10.0), 1.0);
    assert!(close(left.degree(12.5), 0.5));
    assert_eq!(left.degree(-1.0), 0.0);

    let right = Shape::trapezoid(140.0, 160.0, 500.0, 500.0).unwrap();
    assert_eq!(right.degree(500.0), 1.0);
    assert!(close(right.degree(150.0), 0.5));
    assert_eq!(right.degree(501.0), 0.0);

    let step = Shape::trapezoid(5.0, 5.0, 5.0, 5.0).unwrap();
    assert_eq!(step.degree(5.0), 1.0);
    assert_eq!(step.degree(4.9), 0.0);
}

#[test]
fn triangle_peaks_at_apex() {
    let shape = Shape::triangle(2.0, 4.0, 6.0).unwrap();
    assert_eq!(shape.degree(4.0), 1.0);
    assert!(close(shape.degree(3.0), 0.5));
    assert!(close(shape.degree(5.0), 0.5));
    assert_eq!(shape.degree(2.0), 0.0);
    assert_eq!(shape.degree(6.0), 0.0);
    assert_eq!(shape.to_string(), "triangle(2, 4, 6)");
}

#[test]
fn degrees_stay_in_unit_interval() {
    let u = Universe::new(0.0, 100.0, 0.5).unwrap();
    for samples in [
        trapezoid(&u, 15.0, 30.0, 45.0, 60.0).unwrap(),
        trapezoid(&u, 75.0, 90.0, 100.0, 100.0).unwrap(),
        triangle(&u, 0.0, 15.0, 30.0).unwrap(),
    ] {
        assert_eq!(samples.len(), u.len());
        assert!(samples.iter().all(|m| (0.0..=1.0).contains(m)));
    }
}

#[test]
fn decreasing_breakpoints_are_rejected() {
    let err = Shape::trapezoid(10.0, 5.0, 20.0, 30.0).unwrap_err();
    assert!(matches!(err, AtmoError::InvalidBreakpoints { .. }));
    assert!(Shape::triangle(0.0, 5.0, 4.0).is_err());
    assert!(Shape::triangle(0.0, f64::INFINITY, 4.0).is_err());
}

#[test]
fn interpolation_between_samples_and_saturation() {
    let u = Universe::new(0.0, 10.0, 2.0).unwrap();
    let samples = [0.0, 1.0, 1.0, 0.5, 0.0, 0.0];
    assert!(close(u.interpolate(&samples, 1.0), 0.5));
    assert!(close(u.interpolate(&samples, 7.0), 0.25));
    assert_eq!(u.interpolate(&samples, 4.0), 1.0);
    assert_eq!(u.interpolate(&samples, -3.0), 0.0);
    assert_eq!(u.interpolate(&samples, 99.0), 0.0);
}
