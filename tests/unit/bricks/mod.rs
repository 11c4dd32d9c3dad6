use super::*;
use crate::foundation::core::SplineSegment;

fn args() -> BrickArgs {
    BrickArgs {
        width: 40.0,
        height: 20.0,
        ..BrickArgs::default()
    }
}

#[test]
fn empty_brick_reports_its_height() {
    let b = Brick::new(' ', &args());
    assert!(b.is_blank());
    assert_eq!(b.get_last_y(), 20.0);
    assert_eq!(b.get_first_y(), 20.0);
}

#[test]
fn last_y_takes_first_of_equal_maxima() {
    let mut b = Brick::new('=', &args());
    b.paths.push(Drawable::new(
        "path",
        vec![Point::new(0.0, 5.0), Point::new(40.0, 3.0), Point::new(40.0, 17.0)],
    ));
    assert_eq!(b.get_last_y(), 3.0);
    assert_eq!(b.get_first_y(), 5.0);
}

#[test]
fn path_wins_ties_against_splines() {
    let mut b = Brick::new('z', &args());
    b.paths
        .push(Drawable::new("path", vec![Point::new(40.0, 1.0)]));
    b.splines.push(Drawable::new(
        "path",
        vec![SplineSegment::move_to(40.0, 9.0)],
    ));
    assert_eq!(b.get_last_y(), 1.0);
}

#[test]
fn relative_spline_points_are_resolved() {
    let mut b = Brick::new(':', &args());
    b.splines.push(Drawable::new(
        "path",
        vec![
            SplineSegment::move_to(10.0, 2.0),
            SplineSegment::line_by(30.0, 5.0),
        ],
    ));
    assert_eq!(b.get_last_y(), 7.0);
    assert_eq!(b.get_first_y(), 2.0);
}

#[test]
fn or_nan_only_replaces_nan() {
    assert_eq!(or_nan(f64::NAN, 4.0), 4.0);
    assert_eq!(or_nan(0.0, 4.0), 0.0);
}
