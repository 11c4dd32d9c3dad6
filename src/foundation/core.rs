pub use kurbo::{Affine, Point, Rect, Vec2};

/// Instruction of the path mini-language used by splines.
///
/// Upper-case SVG letters are absolute, lower-case letters are relative to the
/// current point. [`SplineOrder::Continue`] carries an extra coordinate for the
/// previous multi-point instruction (Bezier control points).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SplineOrder {
    /// `M`
    MoveTo,
    /// `m`
    MoveBy,
    /// `L`
    LineTo,
    /// `l`
    LineBy,
    /// `C`
    CurveTo,
    /// `c`
    CurveBy,
    /// `S`
    SmoothTo,
    /// `s`
    SmoothBy,
    /// `Q`
    QuadTo,
    /// `q`
    QuadBy,
    /// `T`
    SmoothQuadTo,
    /// `t`
    SmoothQuadBy,
    /// `Z` / `z`
    Close,
    /// Empty order: continuation coordinate.
    Continue,
}

impl SplineOrder {
    /// Parse an SVG path letter; the empty string maps to [`SplineOrder::Continue`].
    pub fn from_letter(s: &str) -> Option<Self> {
        Some(match s {
            "M" => Self::MoveTo,
            "m" => Self::MoveBy,
            "L" => Self::LineTo,
            "l" => Self::LineBy,
            "C" => Self::CurveTo,
            "c" => Self::CurveBy,
            "S" => Self::SmoothTo,
            "s" => Self::SmoothBy,
            "Q" => Self::QuadTo,
            "q" => Self::QuadBy,
            "T" => Self::SmoothQuadTo,
            "t" => Self::SmoothQuadBy,
            "Z" | "z" => Self::Close,
            "" => Self::Continue,
            _ => return None,
        })
    }

    /// SVG letter of the instruction (`""` for continuations).
    pub fn letter(self) -> &'static str {
        match self {
            Self::MoveTo => "M",
            Self::MoveBy => "m",
            Self::LineTo => "L",
            Self::LineBy => "l",
            Self::CurveTo => "C",
            Self::CurveBy => "c",
            Self::SmoothTo => "S",
            Self::SmoothBy => "s",
            Self::QuadTo => "Q",
            Self::QuadBy => "q",
            Self::SmoothQuadTo => "T",
            Self::SmoothQuadBy => "t",
            Self::Close => "z",
            Self::Continue => "",
        }
    }

    /// Whether coordinates are relative to the current point.
    pub fn is_relative(self) -> bool {
        matches!(
            self,
            Self::MoveBy
                | Self::LineBy
                | Self::CurveBy
                | Self::SmoothBy
                | Self::QuadBy
                | Self::SmoothQuadBy
        )
    }

    // number of coordinates consumed by one instance of the instruction
    fn arity(self) -> usize {
        match self {
            Self::CurveTo | Self::CurveBy => 3,
            Self::SmoothTo | Self::SmoothBy | Self::QuadTo | Self::QuadBy => 2,
            Self::Close => 0,
            _ => 1,
        }
    }
}

/// One instruction of a spline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SplineSegment {
    /// Path instruction.
    pub order: SplineOrder,
    /// Absolute or relative x coordinate.
    pub x: f64,
    /// Absolute or relative y coordinate.
    pub y: f64,
}

impl SplineSegment {
    /// Build a segment from its parts.
    pub fn new(order: SplineOrder, x: f64, y: f64) -> Self {
        Self { order, x, y }
    }

    /// `M x,y`
    pub fn move_to(x: f64, y: f64) -> Self {
        Self::new(SplineOrder::MoveTo, x, y)
    }

    /// `m dx,dy`
    pub fn move_by(x: f64, y: f64) -> Self {
        Self::new(SplineOrder::MoveBy, x, y)
    }

    /// `L x,y`
    pub fn line_to(x: f64, y: f64) -> Self {
        Self::new(SplineOrder::LineTo, x, y)
    }

    /// `l dx,dy`
    pub fn line_by(x: f64, y: f64) -> Self {
        Self::new(SplineOrder::LineBy, x, y)
    }

    /// `C x,y` (first control point of a cubic curve).
    pub fn curve_to(x: f64, y: f64) -> Self {
        Self::new(SplineOrder::CurveTo, x, y)
    }

    /// Continuation coordinate of the previous instruction.
    pub fn cont(x: f64, y: f64) -> Self {
        Self::new(SplineOrder::Continue, x, y)
    }

    /// `z`
    pub fn close() -> Self {
        Self::new(SplineOrder::Close, 0.0, 0.0)
    }
}

/// Resolve every coordinate of a spline to absolute brick coordinates.
///
/// Close instructions contribute no point. A continuation repeats the previous
/// instruction once its arity is exhausted, relative instances being anchored
/// on the current point at the start of each instance.
pub fn spline_points(segments: &[SplineSegment]) -> Vec<Point> {
    let mut out = Vec::with_capacity(segments.len());
    let mut current = Point::ZERO;
    let mut subpath_start = Point::ZERO;
    let mut order = SplineOrder::MoveTo;
    let mut anchor = Point::ZERO;
    let mut consumed = 0usize;

    for seg in segments {
        match seg.order {
            SplineOrder::Close => {
                current = subpath_start;
                consumed = 0;
                continue;
            }
            SplineOrder::Continue => {
                if consumed >= order.arity() {
                    // implicit repetition, a repeated move becomes a line
                    order = match order {
                        SplineOrder::MoveTo => SplineOrder::LineTo,
                        SplineOrder::MoveBy => SplineOrder::LineBy,
                        other => other,
                    };
                    anchor = current;
                    consumed = 0;
                }
            }
            explicit => {
                order = explicit;
                anchor = current;
                consumed = 0;
            }
        }

        let p = if order.is_relative() {
            Point::new(anchor.x + seg.x, anchor.y + seg.y)
        } else {
            Point::new(seg.x, seg.y)
        };
        consumed += 1;
        if consumed == order.arity() {
            current = p;
        }
        if matches!(order, SplineOrder::MoveTo | SplineOrder::MoveBy) {
            subpath_start = p;
        }
        out.push(p);
    }
    out
}

/// Placement and rotation (degrees) of the fixed-geometry arrowhead glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArrowDescription {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Rotation in degrees.
    pub angle: f64,
}

/// Text payload of a drawable: anchor position and content.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextSpan {
    /// Anchor x.
    pub x: f64,
    /// Anchor y.
    pub y: f64,
    /// Text content.
    pub text: String,
}

impl TextSpan {
    /// Build a text span.
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }
}

/// A style tag coupled with raw geometry. Styles are resolved by the renderer.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Drawable<T> {
    /// Style lookup key (`"path"`, `"hatch"`, `"s3-polygon"`, ...).
    pub style: String,
    /// Geometric payload.
    pub object: T,
}

impl<T> Drawable<T> {
    /// Couple a style tag with a payload.
    pub fn new(style: impl Into<String>, object: T) -> Self {
        Self {
            style: style.into(),
            object,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
