//! Bricks: the geometry of one symbol slot of a wavelane.
//!
//! A [`Brick`] is produced by a constructor registered in the
//! [`BrickFactory`] from a [`BrickArgs`] bag. Bricks are immutable once built;
//! continuity adjustments regenerate a brick from modified arguments.

pub(crate) mod analogue;
pub(crate) mod digital;
pub(crate) mod factory;
pub(crate) mod filters;
pub(crate) mod register;

use crate::expression::AnalogueContext;
use crate::foundation::core::{
    ArrowDescription, Drawable, Point, SplineSegment, TextSpan, spline_points,
};

pub use factory::{BrickFactory, Constructor, Param, ParamValue, SymbolSpec, Tag};
pub use filters::{FilterBank, LaneParams};

/// Level or waveform of an analogue brick.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Equation {
    /// Constant voltage.
    Level(f64),
    /// `(time, voltage)` samples relative to the brick.
    Points(Vec<(f64, f64)>),
    /// Expression evaluated in the sandboxed analogue environment.
    Expr(String),
}

impl Default for Equation {
    fn default() -> Self {
        Self::Level(0.0)
    }
}

/// Parameters of the digital family.
#[derive(Clone, Debug, PartialEq)]
pub struct DigitalArgs {
    /// Label of data bricks.
    pub data: String,
    /// Suppress the data label (merged data run).
    pub hide_data: bool,
    /// The symbol before this one in the wave string is a data symbol.
    pub follow_data: bool,
    /// Clock high/low ratio, impulse position.
    pub duty_cycle: f64,
}

impl Default for DigitalArgs {
    fn default() -> Self {
        Self {
            data: String::new(),
            hide_data: false,
            follow_data: false,
            duty_cycle: 0.5,
        }
    }
}

/// Parameters of the analogue family.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalogueArgs {
    /// Level, expression or sample points drawn by the brick.
    pub equation: Equation,
    /// Voltage window and seed of the draw.
    pub context: AnalogueContext,
}

/// Parameters of the register-field family.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldArgs {
    /// Bit index printed above the field.
    pub position: i64,
    /// Extra text lines printed below the field.
    pub attributes: Vec<String>,
    /// Fill style of the field (`s3-polygon`, `hatch`, ...); empty for none.
    pub style: String,
    /// Field width in bricks, used to span the fill and label.
    pub scale_width: f64,
    /// The field label is drawn per bit rather than centered on the field.
    pub splitted: bool,
}

impl Default for FieldArgs {
    fn default() -> Self {
        Self {
            position: 0,
            attributes: Vec::new(),
            style: String::new(),
            scale_width: 1.0,
            splitted: false,
        }
    }
}

/// Everything a brick constructor reads.
///
/// `last_y` is the y of the incoming signal and `end_y` a hint for the y the
/// brick should end on. Both are `NaN` when unknown.
#[derive(Clone, Debug, PartialEq)]
pub struct BrickArgs {
    /// Width of the brick.
    pub width: f64,
    /// Height of the brick.
    pub height: f64,
    /// Horizontal extent of a transition.
    pub slewing: f64,
    /// Time dilatation of the slot.
    pub period: f64,
    /// Number of slots covered by the brick.
    pub repeat: usize,
    /// No brick precedes this one in the lane.
    pub is_first: bool,
    /// Skip the transition on the left edge.
    pub ignore_start: bool,
    /// Skip the transition on the right edge.
    pub ignore_end: bool,
    /// y of the incoming signal.
    pub last_y: f64,
    /// y the brick should end on.
    pub end_y: f64,
    /// Digital family parameters.
    pub digital: DigitalArgs,
    /// Analogue family parameters.
    pub analogue: AnalogueArgs,
    /// Register-field family parameters.
    pub field: FieldArgs,
}

impl Default for BrickArgs {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 20.0,
            slewing: 0.0,
            period: 1.0,
            repeat: 1,
            is_first: false,
            ignore_start: false,
            ignore_end: false,
            last_y: f64::NAN,
            end_y: f64::NAN,
            digital: DigitalArgs::default(),
            analogue: AnalogueArgs::default(),
            field: FieldArgs::default(),
        }
    }
}

/// Geometry of one symbol.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Brick {
    /// Source character.
    pub symbol: char,
    /// Width of the brick.
    pub width: f64,
    /// Height of the brick.
    pub height: f64,
    /// Horizontal extent of a transition.
    pub slewing: f64,
    /// Number of slots covered.
    pub repeat: usize,
    /// No brick precedes this one in the lane.
    pub is_first: bool,
    /// The left transition is not drawn.
    pub ignore_start: bool,
    /// The right transition is not drawn.
    pub ignore_end: bool,
    /// Resolved incoming y.
    pub last_y: f64,
    /// Resolved ending y hint.
    pub end_y: f64,
    /// Open polylines.
    pub paths: Vec<Drawable<Vec<Point>>>,
    /// Arrowheads on clock edges.
    pub arrows: Vec<Drawable<ArrowDescription>>,
    /// Filled outlines.
    pub polygons: Vec<Drawable<Vec<Point>>>,
    /// Curves.
    pub splines: Vec<Drawable<Vec<SplineSegment>>>,
    /// Labels.
    pub texts: Vec<Drawable<TextSpan>>,
    /// Arguments the brick was built from.
    #[serde(skip)]
    pub args: BrickArgs,
}

impl Brick {
    /// Empty brick carrying the common fields of `args`.
    pub fn new(symbol: char, args: &BrickArgs) -> Self {
        Self {
            symbol,
            width: args.width,
            height: args.height,
            slewing: args.slewing,
            repeat: args.repeat,
            is_first: args.is_first,
            ignore_start: args.ignore_start,
            ignore_end: args.ignore_end,
            last_y: args.last_y,
            end_y: args.end_y,
            paths: Vec::new(),
            arrows: Vec::new(),
            polygons: Vec::new(),
            splines: Vec::new(),
            texts: Vec::new(),
            args: args.clone(),
        }
    }

    /// `true` when the brick draws nothing.
    pub fn is_blank(&self) -> bool {
        self.paths.is_empty()
            && self.arrows.is_empty()
            && self.polygons.is_empty()
            && self.splines.is_empty()
            && self.texts.is_empty()
    }

    /// y of the right-most geometry point.
    ///
    /// Paths win ties against splines; among points of equal x the first one
    /// found wins. A brick without geometry reports its height.
    pub fn get_last_y(&self) -> f64 {
        let path = extreme(self.path_points(), |a, b| b.x > a.x);
        let spline = extreme(self.spline_points(), |a, b| b.x > a.x);
        match (path, spline) {
            (Some(p), Some(s)) if p.x >= s.x => p.y,
            (_, Some(s)) => s.y,
            (Some(p), None) => p.y,
            (None, None) => self.height,
        }
    }

    /// y of the left-most geometry point, with the same tie rules as
    /// [`Brick::get_last_y`].
    pub fn get_first_y(&self) -> f64 {
        let path = extreme(self.path_points(), |a, b| b.x < a.x);
        let spline = extreme(self.spline_points(), |a, b| b.x < a.x);
        match (path, spline) {
            (Some(p), Some(s)) if p.x <= s.x => p.y,
            (_, Some(s)) => s.y,
            (Some(p), None) => p.y,
            (None, None) => self.height,
        }
    }

    fn path_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.paths.iter().flat_map(|d| d.object.iter().copied())
    }

    fn spline_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.splines.iter().flat_map(|d| spline_points(&d.object))
    }
}

// first point for which no later point is strictly better
fn extreme(points: impl Iterator<Item = Point>, better: impl Fn(Point, Point) -> bool) -> Option<Point> {
    points.fold(None, |best, p| match best {
        Some(b) if !better(b, p) => Some(b),
        _ => Some(p),
    })
}

// `value` unless it is NaN
pub(crate) fn or_nan(value: f64, fallback: f64) -> f64 {
    if value.is_nan() { fallback } else { value }
}

#[cfg(test)]
#[path = "../../tests/unit/bricks/mod.rs"]
mod tests;
