use super::*;

#[test]
fn absolute_spline_points_are_kept_verbatim() {
    let pts = spline_points(&[
        SplineSegment::move_to(0.0, 10.0),
        SplineSegment::curve_to(3.0, 10.0),
        SplineSegment::cont(3.0, 10.0),
        SplineSegment::cont(20.0, 10.0),
        SplineSegment::line_to(40.0, 10.0),
    ]);
    assert_eq!(pts.len(), 5);
    assert_eq!(pts[4], Point::new(40.0, 10.0));
}

#[test]
fn relative_lines_chain_from_the_current_point() {
    let pts = spline_points(&[
        SplineSegment::move_to(40.0, 17.5),
        SplineSegment::line_by(0.0, 2.5),
        SplineSegment::line_by(-40.0, 0.0),
        SplineSegment::line_by(0.0, -2.5),
    ]);
    assert_eq!(
        pts,
        vec![
            Point::new(40.0, 17.5),
            Point::new(40.0, 20.0),
            Point::new(0.0, 20.0),
            Point::new(0.0, 17.5),
        ]
    );
}

#[test]
fn relative_curve_controls_share_one_anchor() {
    let pts = spline_points(&[
        SplineSegment::move_to(10.0, 10.0),
        SplineSegment::new(SplineOrder::CurveBy, 1.0, 0.0),
        SplineSegment::cont(2.0, 0.0),
        SplineSegment::cont(3.0, 5.0),
        SplineSegment::cont(1.0, 1.0),
    ]);
    assert_eq!(pts[1], Point::new(11.0, 10.0));
    assert_eq!(pts[3], Point::new(13.0, 15.0));
    // a fourth coordinate starts a new relative instance at the curve end
    assert_eq!(pts[4], Point::new(14.0, 16.0));
}

#[test]
fn close_contributes_no_point() {
    let pts = spline_points(&[
        SplineSegment::move_to(1.0, 1.0),
        SplineSegment::line_to(2.0, 2.0),
        SplineSegment::close(),
    ]);
    assert_eq!(pts.len(), 2);
}

#[test]
fn spline_letters_roundtrip() {
    for letter in ["M", "m", "L", "l", "C", "c", "S", "s", "Q", "q", "T", "t", ""] {
        let order = SplineOrder::from_letter(letter).unwrap();
        assert_eq!(order.letter(), letter);
    }
    assert_eq!(SplineOrder::from_letter("Z"), Some(SplineOrder::Close));
    assert_eq!(SplineOrder::from_letter("k"), None);
}
