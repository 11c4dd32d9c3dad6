use super::*;
use crate::foundation::core::SplineOrder;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn connector_parses_markers_around_the_body() {
    let c = Connector::parse("<-~>").unwrap();
    assert_eq!(c.start, Some(Marker::Arrow));
    assert_eq!(c.body, Body::WaveEnd);
    assert_eq!(c.end, Some(Marker::Arrow));

    let c = Connector::parse("*~#").unwrap();
    assert_eq!((c.start, c.body, c.end), (Some(Marker::Circle), Body::Wave, Some(Marker::Square)));

    let c = Connector::parse("-|-").unwrap();
    assert_eq!((c.start, c.body, c.end), (None, Body::Stairs, None));
}

#[test]
fn unknown_bodies_do_not_parse() {
    assert_eq!(Connector::parse("=>"), None);
    assert_eq!(Connector::parse("<>"), None);
    assert_eq!(Connector::parse("-/-"), None);
    assert_eq!(Connector::parse(""), None);
}

#[test]
fn straight_connector_points_outward_at_both_ends() {
    let c = Connector::parse("<->").unwrap();
    let path = c.path(Point::new(0.0, 0.0), Point::new(40.0, 20.0));
    assert_eq!(path.segments.len(), 2);
    assert_eq!(path.start_direction, Vec2::new(-40.0, -20.0));
    assert_eq!(path.end_direction, Vec2::new(40.0, 20.0));
    assert_eq!(path.middle, Point::new(20.0, 10.0));
}

#[test]
fn stairs_turn_at_the_middle() {
    let path = Connector::parse("-|-")
        .unwrap()
        .path(Point::new(0.0, 0.0), Point::new(40.0, 20.0));
    let corners: Vec<_> = path.segments.iter().map(|s| (s.x, s.y)).collect();
    assert_eq!(corners, vec![(0.0, 0.0), (20.0, 0.0), (20.0, 20.0), (40.0, 20.0)]);
    assert_eq!(path.middle, Point::new(20.0, 20.0));
    assert_eq!(path.end_direction, Vec2::new(20.0, 0.0));
}

#[test]
fn wave_is_one_cubic_curve() {
    let path = Connector::parse("~")
        .unwrap()
        .path(Point::new(0.0, 0.0), Point::new(100.0, 20.0));
    assert_eq!(path.segments[1].order, SplineOrder::CurveTo);
    assert!(close(path.segments[1].x, 90.0));
    assert!(close(path.segments[2].x, 10.0));
    assert_eq!(path.segments[3].y, 20.0);
}

#[test]
fn arrow_marker_sits_back_from_the_tip() {
    let Mark::Arrow(arrow) = marker(Marker::Arrow, Point::new(40.0, 10.0), Vec2::new(1.0, 0.0))
    else {
        panic!("expected an arrow");
    };
    assert_eq!(arrow.style, "edge-arrow");
    assert!(close(arrow.object.angle, 0.0));
    assert!(close(arrow.object.x, 37.0));
    assert!(close(arrow.object.y, 10.0));
}

#[test]
fn circle_and_square_markers_are_centered() {
    let Mark::Spline(circle) = marker(Marker::Circle, Point::new(10.0, 10.0), Vec2::ZERO) else {
        panic!("expected a spline");
    };
    assert_eq!(circle.object.first().map(|s| (s.x, s.y)), Some((13.0, 10.0)));
    assert_eq!(circle.object.last().map(|s| s.order), Some(SplineOrder::Close));

    let Mark::Polygon(square) = marker(Marker::Square, Point::new(10.0, 10.0), Vec2::ZERO) else {
        panic!("expected a polygon");
    };
    assert_eq!(square.object.len(), 5);
    assert_eq!(square.object[0], Point::new(7.0, 7.0));
    assert_eq!(square.object[2], Point::new(13.0, 13.0));
}

#[test]
fn compressor_masks_then_strokes() {
    let marks = compressor(100.0, 0.0, 80.0);
    assert_eq!(marks.len(), 3);
    assert_eq!(marks[0].style(), "hide");
    assert_eq!(marks[1].style(), "big_gap");
    let Mark::Polygon(fill) = &marks[0] else {
        panic!("expected a polygon");
    };
    assert_eq!(fill.object.len(), 10);
    assert_eq!(fill.object[2], Point::new(96.0, 40.0));
    assert_eq!(fill.object[7], Point::new(90.0, 40.0));
}

#[test]
fn fixed_styles_ignore_overrides() {
    let mut styles = StyleOverrides::new();
    styles.insert("stroke".into(), "red".into());
    let deco = Decoration {
        marks: compressor(0.0, 0.0, 10.0),
        styles,
    };
    assert!(deco.styles_for(&deco.marks[0]).is_empty());
    let edge = Mark::Spline(Drawable::new("edge", Vec::new()));
    assert_eq!(deco.styles_for(&edge).get("stroke").map(String::as_str), Some("red"));
}
