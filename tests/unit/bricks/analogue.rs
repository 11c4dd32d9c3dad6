use super::*;
use crate::bricks::AnalogueArgs;
use crate::expression::AnalogueContext;

fn args(last_y: f64, equation: Equation) -> BrickArgs {
    BrickArgs {
        width: 40.0,
        height: 20.0,
        last_y,
        analogue: AnalogueArgs {
            equation,
            context: AnalogueContext::default(),
        },
        ..BrickArgs::default()
    }
}

#[test]
fn meta_settles_on_the_requested_rail() {
    let b = meta('m', &args(f64::NAN, Equation::default())).unwrap();
    assert_eq!(b.get_last_y(), 20.0);
    let b = meta('M', &args(0.0, Equation::default())).unwrap();
    assert_eq!(b.get_last_y(), 0.0);
    let seg = &b.splines[0].object;
    assert_eq!(seg[0], SplineSegment::move_by(0.0, 0.0));
    assert_eq!(seg[1].order, crate::foundation::core::SplineOrder::LineTo);
}

#[test]
fn meta_sample_count_is_even() {
    let b = meta('m', &args(10.0, Equation::default())).unwrap();
    let samples = b.splines[0]
        .object
        .iter()
        .filter(|s| {
            matches!(
                s.order,
                crate::foundation::core::SplineOrder::LineTo
                    | crate::foundation::core::SplineOrder::Continue
            )
        })
        .count()
        - 2;
    assert_eq!(samples % 2, 0);
}

#[test]
fn cap_charges_to_the_level() {
    let b = cap('c', &args(20.0, Equation::Level(1.8))).unwrap();
    assert!(b.get_last_y().abs() < 1e-12);
    assert_eq!(b.splines[0].object[0], SplineSegment::move_by(0.0, 20.0));
}

#[test]
fn step_evaluates_expressions() {
    let b = step('s', &args(20.0, Equation::Expr("VDDA / 2".to_owned()))).unwrap();
    assert!((b.get_last_y() - 10.0).abs() < 1e-12);
    let b = step('s', &args(f64::NAN, Equation::Level(0.0))).unwrap();
    assert_eq!(b.paths[0].object[0], Point::new(0.0, 20.0));
}

#[test]
fn analogue_plots_transformed_points() {
    let eq = Equation::Expr("[(t, 1.8 * t / Tmax) for t in time]".to_owned());
    let b = analogue('a', &args(20.0, eq)).unwrap();
    let pts = &b.paths[0].object;
    assert_eq!(pts.len(), 42);
    assert_eq!(pts[0], Point::new(0.0, 20.0));
    assert!(pts[41].y.abs() < 1e-12);
}

#[test]
fn first_analogue_starts_on_its_last_sample() {
    let a = BrickArgs {
        is_first: true,
        ..args(f64::NAN, Equation::Points(vec![(10.0, 0.9), (40.0, 0.9)]))
    };
    let b = analogue('a', &a).unwrap();
    assert!((b.paths[0].object[0].y - 10.0).abs() < 1e-12);
}

#[test]
fn bad_equations_are_errors() {
    assert!(step('s', &args(0.0, Equation::Expr("[1, 2]".to_owned()))).is_err());
    assert!(analogue('a', &args(0.0, Equation::Expr("3".to_owned()))).is_err());
    assert!(cap('c', &args(0.0, Equation::Expr("1 +".to_owned()))).is_err());
}
