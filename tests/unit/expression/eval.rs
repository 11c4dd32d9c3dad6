use super::*;
use crate::expression::parser::parse_expr;

fn run(src: &str) -> Result<Value, ExprError> {
    let mut env = Environment::new(7);
    env.eval(&parse_expr(src).unwrap())
}

fn n(src: &str) -> f64 {
    run(src).unwrap().as_number().unwrap()
}

#[test]
fn arithmetic_follows_usual_rules() {
    assert_eq!(n("1 + 2 * 3 - 4 / 2"), 5.0);
    assert_eq!(n("2 ** 3 ** 2"), 512.0);
    assert_eq!(n("-2 ** 2"), -4.0);
    assert_eq!(n("-7 % 3"), 2.0);
    assert_eq!(n("7 % -3"), -2.0);
}

#[test]
fn comparisons_and_logic() {
    assert_eq!(run("1 < 2 and 3 >= 3").unwrap(), Value::Bool(true));
    assert_eq!(run("not 0").unwrap(), Value::Bool(true));
    assert_eq!(n("0 or 5"), 5.0);
    assert_eq!(run("[1, 2] == [1, 2]").unwrap(), Value::Bool(true));
}

#[test]
fn builtins() {
    assert_eq!(n("max(1, 4, 2)"), 4.0);
    assert_eq!(n("min([3, 1, 2])"), 1.0);
    assert_eq!(n("sum(range(5))"), 10.0);
    assert_eq!(n("len(range(2, 10, 3))"), 3.0);
    assert_eq!(n("round(2.5)"), 2.0);
    assert_eq!(n("round(1.2345, 2)"), 1.23);
    assert_eq!(n("int(-2.7)"), -2.0);
    assert!((n("atan2(1, 1)") - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    assert!((n("sin(pi / 2)") - 1.0).abs() < 1e-12);
}

#[test]
fn list_operations() {
    assert_eq!(n("len([0] * 4 + [1, 2])"), 6.0);
    assert_eq!(n("[5, 6, 7][-1]"), 7.0);
    let pts = run("[(t, t * 2) for t in range(3)]")
        .unwrap()
        .as_points()
        .unwrap();
    assert_eq!(pts, vec![(0.0, 0.0), (1.0, 2.0), (2.0, 4.0)]);
}

#[test]
fn comprehension_variable_does_not_leak() {
    let mut env = Environment::new(0);
    env.eval(&parse_expr("[t for t in range(3)]").unwrap()).unwrap();
    assert!(env.get("t").is_none());
}

#[test]
fn errors_are_reported() {
    assert!(run("1 / 0").unwrap_err().message.contains("division by zero"));
    assert!(run("foo").unwrap_err().message.contains("unknown variable"));
    assert!(run("open(1)").unwrap_err().message.contains("unknown function"));
    assert!(run("[1][3]").unwrap_err().message.contains("out of range"));
    assert!(run("sqrt(-1)").is_err());
}

#[test]
fn list_growth_is_capped() {
    assert!(run("[0] * 200000").unwrap_err().message.contains("too large"));
    assert!(run("range(1000000)").is_err());
}

#[test]
fn rnd_is_deterministic_per_seed() {
    let a = run("[rnd() for t in range(4)]").unwrap();
    let b = run("[rnd() for t in range(4)]").unwrap();
    assert_eq!(a, b);
    let Value::List(items) = a else {
        panic!("expected a list");
    };
    for v in items {
        let v = v.as_number().unwrap();
        assert!((0.0..1.0).contains(&v));
    }
}
