use super::*;

fn frame() -> Frame {
    Frame {
        xmin: 50.0,
        width: 400.0,
        height: 200.0,
        brick_width: 40.0,
        brick_height: 20.0,
    }
}

fn rows(heights: &[f64]) -> RenderContext {
    let mut ctx = RenderContext::new();
    for h in heights {
        ctx.register_y_step(*h, false);
    }
    ctx
}

fn text(s: &str) -> Endpoint {
    Endpoint::Text(s.to_owned())
}

#[test]
fn missing_or_blank_endpoints_resolve_to_nothing() {
    let ctx = rows(&[]);
    assert_eq!(from_to_parser(None, &frame(), &ctx).unwrap(), None);
    assert_eq!(from_to_parser(Some(&text("  ")), &frame(), &ctx).unwrap(), None);
}

#[test]
fn numbers_stay_indices() {
    let ctx = rows(&[]);
    let r = from_to_parser(Some(&Endpoint::Scalar(3.5)), &frame(), &ctx).unwrap();
    assert_eq!(r, Some(Resolved::Scalar(3.5)));
    let r = from_to_parser(Some(&text("1 + 2")), &frame(), &ctx).unwrap();
    assert_eq!(r, Some(Resolved::Scalar(3.0)));
}

#[test]
fn pairs_follow_the_row_table() {
    let ctx = rows(&[25.0, 25.0, 25.0]);
    let r = from_to_parser(Some(&Endpoint::Pair(2.0, 1.5)), &frame(), &ctx).unwrap();
    assert_eq!(r, Some(Resolved::Point(Point::new(80.0, 35.0))));
    let r = from_to_parser(Some(&text("2, 1.5")), &frame(), &ctx).unwrap();
    assert_eq!(r, Some(Resolved::Point(Point::new(80.0, 35.0))));
}

#[test]
fn node_names_resolve_to_registered_points() {
    let mut ctx = rows(&[]);
    ctx.nodes.insert("a", Point::new(81.5, 10.0));
    let r = from_to_parser(Some(&text("a")), &frame(), &ctx).unwrap();
    assert_eq!(r, Some(Resolved::Point(Point::new(81.5, 10.0))));
}

#[test]
fn percent_components_scale_with_the_image() {
    let ctx = rows(&[25.0, 25.0]);
    let r = from_to_parser(Some(&text("10%, 50%")), &frame(), &ctx).unwrap();
    assert_eq!(r, Some(Resolved::Point(Point::new(40.0, 100.0))));
    let r = from_to_parser(Some(&text("1.5, 3%")), &frame(), &ctx).unwrap();
    assert_eq!(r, Some(Resolved::Point(Point::new(60.0, 6.0))));
}

#[test]
fn row_offsets_are_in_row_heights() {
    let ctx = rows(&[25.0, 25.0]);
    let r = from_to_parser(Some(&text("1, 1 + 0.5%")), &frame(), &ctx);
    assert!(r.is_err());
    let r = from_to_parser(Some(&text("1%, 1 +0.5")), &frame(), &ctx).unwrap();
    assert_eq!(r, Some(Resolved::Point(Point::new(4.0, 35.0))));
}

#[test]
fn unknown_names_are_fatal() {
    let ctx = rows(&[]);
    let err = from_to_parser(Some(&text("nowhere")), &frame(), &ctx).unwrap_err();
    assert!(matches!(err, UndulateError::Annotation(_)));
    assert_eq!(err.exit_code(), 3);
}
