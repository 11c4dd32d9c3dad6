//! Drawing backends.
//!
//! [`Renderer`] is the contract between the compiled geometry and an output
//! format. [`SvgRenderer`] is the reference backend; [`svg_to_png`] turns its
//! output into a bitmap.

pub(crate) mod raster;
pub(crate) mod renderer;
pub(crate) mod skin;
pub(crate) mod svg;

pub use raster::svg_to_png;
pub use renderer::{Content, Renderer, Style};
pub use skin::{EM, PT, Rule, Skin};
pub use svg::{Canvas, SvgRenderer};
