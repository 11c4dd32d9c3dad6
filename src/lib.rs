//! Undulate compiles timing diagrams into vector geometry.
//!
//! A diagram is a JSON document mapping signal names to compact wave strings
//! (`"p..."`, `"0.1=x"`). Each character selects a symbol whose brick carries
//! the paths, polygons, splines, arrows and texts of one time slot.
//!
//! # Pipeline overview
//!
//! 1. **Load**: `serde_json::Value -> Group` (legacy `signal` arrays and
//!    register descriptions are normalized first)
//! 2. **Lay out**: every wavelane becomes positioned [`Brick`]s, groups stack
//!    their rows and register node anchors in a [`RenderContext`]
//! 3. **Annotate**: edges and annotations resolve their endpoints against the
//!    registered nodes and rows
//! 4. **Render**: a [`Renderer`] turns the geometry into a document; the
//!    [`SvgRenderer`] is the reference backend and [`svg_to_png`] rasterizes it
//!
//! Every draw owns its registries: [`Undulate::draw`] resets them first, and
//! independent [`Undulate`] instances never share state.
//!
//! ```no_run
//! let doc = undulate::parse_document(r#"{clk: {wave: "p..."}}"#)?;
//! let svg = undulate::draw_svg(&doc, &undulate::DrawOptions::default())?;
//! # Ok::<(), undulate::UndulateError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod annotate;
mod bricks;
mod expression;
mod foundation;
mod layout;
mod pipeline;
mod render;
mod scene;

pub use annotate::{
    Body, Connector, ConnectorPath, Decoration, EdgeSpec, Frame, Mark, Marker, Resolved, annotate,
    compressor, decorate, from_to_parser, marker, parse_edge,
};
pub use bricks::{
    AnalogueArgs, Brick, BrickArgs, BrickFactory, Constructor, DigitalArgs, Equation, FieldArgs,
    FilterBank, LaneParams, Param, ParamValue, SymbolSpec, Tag,
};
pub use expression::{AnalogueContext, Environment, MAX_LIST_LEN, Value as ExprValue, evaluate};
pub use foundation::core::{
    Affine, ArrowDescription, Drawable, Point, Rect, SplineOrder, SplineSegment, TextSpan, Vec2,
    spline_points,
};
pub use foundation::error::{UndulateError, UndulateResult};
pub use foundation::math::arrow_angle;
pub use layout::{
    CompiledLane, DiagramSize, GroupItem, GroupLayout, GroupOptions, LaneOptions, NodeBank,
    PlacedBrick, RenderContext, Ticks, WavegroupCompiler, WavelaneCompiler, YStep, size,
};
pub use pipeline::{DrawOptions, Drawing, Undulate, compile_json, draw_png, draw_svg};
pub use render::{Canvas, Content, EM, PT, Renderer, Rule, Skin, Style, SvgRenderer, svg_to_png};
pub use scene::{
    Annotation, Endpoint, Entry, Field, Group, GroupConfig, Lane, ParamSupply, Register,
    StyleOverrides, is_spacer, load, normalize, parse_document, relax_json,
};
