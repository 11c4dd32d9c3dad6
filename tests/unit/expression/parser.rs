use super::*;

fn num(v: f64) -> Expr {
    Expr::Number(v)
}

#[test]
fn product_binds_tighter_than_sum() {
    let e = parse_expr("1 + 2 * 3").unwrap();
    assert_eq!(
        e,
        Expr::Binary {
            op: BinaryOp::Add,
            left: Box::new(num(1.0)),
            right: Box::new(Expr::Binary {
                op: BinaryOp::Mul,
                left: Box::new(num(2.0)),
                right: Box::new(num(3.0)),
            }),
        }
    );
}

#[test]
fn power_is_right_associative_and_beats_unary_minus() {
    let e = parse_expr("-2 ** 3 ** 2").unwrap();
    let Expr::Unary { op, expr } = e else {
        panic!("expected unary at the root");
    };
    assert_eq!(op, UnaryOp::Neg);
    let Expr::Binary { op, right, .. } = *expr else {
        panic!("expected power below the sign");
    };
    assert_eq!(op, BinaryOp::Pow);
    assert!(matches!(*right, Expr::Binary { op: BinaryOp::Pow, .. }));
}

#[test]
fn parenthesized_expression_is_not_a_tuple() {
    assert_eq!(parse_expr("(4)").unwrap(), num(4.0));
    assert_eq!(
        parse_expr("(4, 5)").unwrap(),
        Expr::List(vec![num(4.0), num(5.0)])
    );
}

#[test]
fn comprehension_shape() {
    let e = parse_expr("[(t, sin(t)) for t in time]").unwrap();
    let Expr::Comprehension { var, iter, .. } = e else {
        panic!("expected a comprehension");
    };
    assert_eq!(var, "t");
    assert_eq!(*iter, Expr::Var("time".to_owned()));
}

#[test]
fn trailing_comma_in_list() {
    assert_eq!(
        parse_expr("[1, 2,]").unwrap(),
        Expr::List(vec![num(1.0), num(2.0)])
    );
}

#[test]
fn calls_require_identifier_targets() {
    assert!(parse_expr("(1)(2)").is_err());
    assert!(matches!(
        parse_expr("max(1, 2)").unwrap(),
        Expr::Call { ref func, ref args } if func == "max" && args.len() == 2
    ));
}

#[test]
fn unbalanced_input_fails() {
    assert!(parse_expr("(1 + 2").is_err());
    assert!(parse_expr("1 2").is_err());
    assert!(parse_expr("").is_err());
}

#[test]
fn deep_nesting_is_bounded() {
    let src = format!("{}1{}", "(".repeat(500), ")".repeat(500));
    let err = parse_expr(&src).unwrap_err();
    assert!(err.message.contains("nested too deeply"));
}
