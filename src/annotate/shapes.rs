use crate::foundation::core::{ArrowDescription, Drawable, Point, SplineSegment, TextSpan, Vec2};
use crate::foundation::math::{arrow_angle, deg_to_rad};
use crate::scene::StyleOverrides;

const MARKER_OFFSET: f64 = 3.0;
const CIRCLE_RADIUS: f64 = 3.0;
// control point distance of a quarter circle
const KAPPA: f64 = 0.5523;
const SQUARE_SIZE: f64 = 6.0;

// styles drawn as-is, whatever the annotation overrides
const FIXED_STYLES: [&str; 3] = ["hide", "big_gap", "edge-background"];

/// One primitive of an annotation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mark {
    /// Curve, line or connector body.
    Spline(Drawable<Vec<SplineSegment>>),
    /// Filled outline such as a marker.
    Polygon(Drawable<Vec<Point>>),
    /// Arrowhead glyph.
    Arrow(Drawable<ArrowDescription>),
    /// Label.
    Text(Drawable<TextSpan>),
}

impl Mark {
    /// Style lookup key of the primitive.
    pub fn style(&self) -> &str {
        match self {
            Self::Spline(d) => &d.style,
            Self::Polygon(d) => &d.style,
            Self::Arrow(d) => &d.style,
            Self::Text(d) => &d.style,
        }
    }
}

/// Geometry of one annotation with the style overrides it carries.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Decoration {
    /// Primitives in drawing order.
    pub marks: Vec<Mark>,
    /// Overrides applied to every primitive but the fixed ones.
    pub styles: StyleOverrides,
}

impl Decoration {
    /// Overrides applying to `mark`.
    pub fn styles_for(&self, mark: &Mark) -> StyleOverrides {
        if FIXED_STYLES.contains(&mark.style()) {
            StyleOverrides::new()
        } else {
            self.styles.clone()
        }
    }
}

/// Glyph drawn at a connector end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    /// Arrowhead pointing away from the body.
    Arrow,
    /// Dot centered on the endpoint.
    Circle,
    /// Square centered on the endpoint.
    Square,
}

impl Marker {
    fn from_start(c: char) -> Option<Self> {
        match c {
            '<' => Some(Self::Arrow),
            '*' => Some(Self::Circle),
            '#' => Some(Self::Square),
            _ => None,
        }
    }

    fn from_end(c: char) -> Option<Self> {
        match c {
            '>' => Some(Self::Arrow),
            '*' => Some(Self::Circle),
            '#' => Some(Self::Square),
            _ => None,
        }
    }
}

/// Path followed between two endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Body {
    /// `~`
    Wave,
    /// `-~`
    WaveEnd,
    /// `~-`
    WaveStart,
    /// `-`
    Straight,
    /// `-|`
    HorizontalFirst,
    /// `|-`
    VerticalFirst,
    /// `-|-`
    Stairs,
}

impl Body {
    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "~" => Self::Wave,
            "-~" => Self::WaveEnd,
            "~-" => Self::WaveStart,
            "-" => Self::Straight,
            "-|" => Self::HorizontalFirst,
            "|-" => Self::VerticalFirst,
            "-|-" => Self::Stairs,
            _ => return None,
        })
    }
}

/// Outline of a connector and the outward directions at its ends.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorPath {
    /// Spline of the body.
    pub segments: Vec<SplineSegment>,
    /// Direction leaving the start point, away from the body.
    pub start_direction: Vec2,
    /// Direction leaving the end point, away from the body.
    pub end_direction: Vec2,
    /// Anchor of the label.
    pub middle: Point,
}

/// An arrow-like shape: optional markers around a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connector {
    /// Glyph at the start point.
    pub start: Option<Marker>,
    /// Shape of the line between the endpoints.
    pub body: Body,
    /// Glyph at the end point.
    pub end: Option<Marker>,
}

impl Connector {
    /// Parse `[<*#]?<body>[>*#]?`.
    pub fn parse(shape: &str) -> Option<Self> {
        let mut rest = shape.trim();
        let start = rest.chars().next().and_then(Marker::from_start);
        if start.is_some() {
            rest = &rest[1..];
        }
        let end = rest.chars().last().and_then(Marker::from_end);
        if end.is_some() {
            rest = &rest[..rest.len() - 1];
        }
        let body = Body::parse(rest)?;
        Some(Self { start, body, end })
    }

    /// Body between `s` and `e` with the directions used to orient the markers.
    pub fn path(&self, s: Point, e: Point) -> ConnectorPath {
        let mid = s.midpoint(e);
        let horizontal_out = Vec2::new(s.x - e.x, 0.0);
        let horizontal_in = Vec2::new(e.x - s.x, 0.0);
        let vertical_out = Vec2::new(0.0, s.y - e.y);
        let vertical_in = Vec2::new(0.0, e.y - s.y);
        let (segments, start_direction, end_direction, middle) = match self.body {
            Body::Wave => (
                vec![
                    SplineSegment::move_to(s.x, s.y),
                    SplineSegment::curve_to(s.x * 0.1 + e.x * 0.9, s.y),
                    SplineSegment::cont(s.x * 0.9 + e.x * 0.1, e.y),
                    SplineSegment::cont(e.x, e.y),
                ],
                horizontal_out,
                horizontal_in,
                mid,
            ),
            Body::WaveEnd => (
                vec![
                    SplineSegment::move_to(s.x, s.y),
                    SplineSegment::curve_to(e.x, s.y),
                    SplineSegment::cont(e.x, e.y),
                    SplineSegment::cont(e.x, e.y),
                ],
                horizontal_out,
                vertical_in,
                mid,
            ),
            Body::WaveStart => (
                vec![
                    SplineSegment::move_to(s.x, s.y),
                    SplineSegment::curve_to(s.x, s.y),
                    SplineSegment::cont(s.x, e.y),
                    SplineSegment::cont(e.x, e.y),
                ],
                vertical_out,
                horizontal_in,
                mid,
            ),
            Body::Straight => (
                vec![
                    SplineSegment::move_to(s.x, s.y),
                    SplineSegment::line_to(e.x, e.y),
                ],
                s - e,
                e - s,
                mid,
            ),
            Body::HorizontalFirst => (
                vec![
                    SplineSegment::move_to(s.x, s.y),
                    SplineSegment::line_to(e.x, s.y),
                    SplineSegment::cont(e.x, e.y),
                ],
                horizontal_out,
                vertical_in,
                Point::new(e.x, s.y),
            ),
            Body::VerticalFirst => (
                vec![
                    SplineSegment::move_to(s.x, s.y),
                    SplineSegment::line_to(s.x, e.y),
                    SplineSegment::cont(e.x, e.y),
                ],
                vertical_out,
                horizontal_in,
                Point::new(s.x, e.y),
            ),
            Body::Stairs => (
                vec![
                    SplineSegment::move_to(s.x, s.y),
                    SplineSegment::line_to(mid.x, s.y),
                    SplineSegment::cont(mid.x, e.y),
                    SplineSegment::cont(e.x, e.y),
                ],
                Vec2::new(s.x - mid.x, 0.0),
                Vec2::new(e.x - mid.x, 0.0),
                Point::new(mid.x, e.y),
            ),
        };
        ConnectorPath {
            segments,
            start_direction,
            end_direction,
            middle,
        }
    }
}

/// Glyph of `marker` at `at`, facing `direction`.
pub fn marker(marker: Marker, at: Point, direction: Vec2) -> Mark {
    match marker {
        Marker::Arrow => {
            let angle = arrow_angle(direction.y, direction.x);
            let th = deg_to_rad(angle);
            Mark::Arrow(Drawable::new(
                "edge-arrow",
                ArrowDescription {
                    x: at.x - MARKER_OFFSET * th.cos(),
                    y: at.y - MARKER_OFFSET * th.sin(),
                    angle,
                },
            ))
        }
        Marker::Circle => {
            let (r, k) = (CIRCLE_RADIUS, KAPPA * CIRCLE_RADIUS);
            let (x, y) = (at.x, at.y);
            Mark::Spline(Drawable::new(
                "edge-arrow",
                vec![
                    SplineSegment::move_to(x + r, y),
                    SplineSegment::curve_to(x + r, y + k),
                    SplineSegment::cont(x + k, y + r),
                    SplineSegment::cont(x, y + r),
                    SplineSegment::cont(x - k, y + r),
                    SplineSegment::cont(x - r, y + k),
                    SplineSegment::cont(x - r, y),
                    SplineSegment::cont(x - r, y - k),
                    SplineSegment::cont(x - k, y - r),
                    SplineSegment::cont(x, y - r),
                    SplineSegment::cont(x + k, y - r),
                    SplineSegment::cont(x + r, y - k),
                    SplineSegment::cont(x + r, y),
                    SplineSegment::close(),
                ],
            ))
        }
        Marker::Square => {
            let h = SQUARE_SIZE / 2.0;
            Mark::Polygon(Drawable::new(
                "edge-arrow",
                vec![
                    Point::new(at.x - h, at.y - h),
                    Point::new(at.x - h, at.y + h),
                    Point::new(at.x + h, at.y + h),
                    Point::new(at.x + h, at.y - h),
                    Point::new(at.x - h, at.y - h),
                ],
            ))
        }
    }
}

/// Double chevron marking a time compression at `x`, from `y1` to `y2`.
pub fn compressor(x: f64, y1: f64, y2: f64) -> Vec<Mark> {
    let ym = (y1 + y2) / 2.0;
    let chevron = |dx: f64, tip: f64| {
        vec![
            SplineSegment::move_to(x + dx, y1),
            SplineSegment::line_to(x + dx, ym - 10.0),
            SplineSegment::line_to(x + tip, ym),
            SplineSegment::line_to(x + dx, ym + 10.0),
            SplineSegment::line_to(x + dx, y2),
        ]
    };
    let left = chevron(0.0, -10.0);
    let right = chevron(5.0, -4.0);
    let fill = right
        .iter()
        .chain(left.iter().rev())
        .map(|s| Point::new(s.x, s.y))
        .collect();
    vec![
        Mark::Polygon(Drawable::new("hide", fill)),
        Mark::Spline(Drawable::new("big_gap", left)),
        Mark::Spline(Drawable::new("big_gap", right)),
    ]
}

/// Horizontal or vertical rule between two points.
pub fn rule(from: Point, to: Point) -> Mark {
    Mark::Spline(Drawable::new(
        "path",
        vec![
            SplineSegment::move_to(from.x, from.y),
            SplineSegment::line_to(to.x, to.y),
        ],
    ))
}

/// Opaque box behind a label whose bounding box is `bbox`, centered on `at`.
pub fn text_background(at: Point, bbox: crate::foundation::core::Rect) -> Mark {
    let (x0, y0) = (at.x + bbox.x0, at.y + bbox.y0);
    let (x1, y1) = (at.x + bbox.x1, at.y + bbox.y1);
    Mark::Polygon(Drawable::new(
        "edge-background",
        vec![
            Point::new(x0, y0),
            Point::new(x0, y1),
            Point::new(x1, y1),
            Point::new(x1, y0),
            Point::new(x0, y0),
        ],
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/annotate/shapes.rs"]
mod tests;
