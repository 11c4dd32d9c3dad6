use serde_json::Value;

use crate::annotate::{Decoration, Frame, annotate};
use crate::expression::AnalogueContext;
use crate::foundation::error::UndulateResult;
use crate::layout::{GroupLayout, GroupOptions, RenderContext, WavegroupCompiler, WavelaneCompiler, size};
use crate::render::{Canvas, Renderer, Skin, SvgRenderer, svg_to_png};
use crate::scene::{self, Group, StyleOverrides};

// room between the longest name and the wave zone
const TITLE_MARGIN: f64 = 8.0;
// attribute lines are spaced by one and a half font size
const ATTRIBUTE_LINE: f64 = 1.5;

/// Options of one draw.
///
/// The `config` key of a document overrides the scale, separation, tick and
/// gap settings for the group it belongs to.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DrawOptions {
    /// Width of one slot.
    pub brick_width: f64,
    /// Height of one row.
    pub brick_height: f64,
    /// Row separation, as a fraction of the brick height at the root.
    pub separation: f64,
    /// Horizontal scale, unless the document sets one.
    pub hscale: f64,
    /// Vertical scale, unless the document sets one.
    pub vscale: f64,
    /// Leave out the slot ticks.
    pub no_ticks: bool,
    /// Offset of gap glyphs; half a brick when unset.
    pub gap_offset: Option<f64>,
    /// Shift of the ticks, in slots.
    pub ticks_phase: f64,
    /// Read the document as a register description.
    pub is_reg: bool,
    /// Voltage window and seed of analogue bricks.
    pub analogue: AnalogueContext,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            brick_width: 40.0,
            brick_height: 20.0,
            separation: 0.25,
            hscale: 1.0,
            vscale: 1.0,
            no_ticks: false,
            gap_offset: None,
            ticks_phase: 0.0,
            is_reg: false,
            analogue: AnalogueContext::default(),
        }
    }
}

impl DrawOptions {
    // fill the root config with the options it does not set
    fn apply(&self, group: &mut Group) {
        let config = &mut group.config;
        config.hscale.get_or_insert(self.hscale);
        config.vscale.get_or_insert(self.vscale);
        config.no_ticks.get_or_insert(self.no_ticks);
        config.ticks_phase.get_or_insert(self.ticks_phase);
        if config.gap_offset.is_none() {
            config.gap_offset = self.gap_offset;
        }
    }
}

/// Everything needed to emit a diagram in any backend.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Drawing {
    /// Size of the document.
    pub canvas: Canvas,
    /// Laid out groups and lanes.
    pub layout: GroupLayout,
    /// Edges and annotations.
    pub decorations: Vec<Decoration>,
}

/// Diagram compiler owning the per-draw registries.
///
/// Rows and nodes recorded by a draw are cleared when the next one starts, so
/// one instance can draw any number of documents in sequence.
#[derive(Clone, Debug)]
pub struct Undulate {
    lanes: WavelaneCompiler,
    renderer: SvgRenderer,
    ctx: RenderContext,
}

impl Default for Undulate {
    fn default() -> Self {
        Self::new(Skin::default())
    }
}

impl Undulate {
    /// Compiler drawing with `skin`.
    pub fn new(skin: Skin) -> Self {
        Self {
            lanes: WavelaneCompiler::standard(),
            renderer: SvgRenderer::new(skin),
            ctx: RenderContext::new(),
        }
    }

    /// Registries left by the last draw.
    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Lay out and annotate `doc`.
    #[tracing::instrument(level = "debug", skip_all, fields(name = name, is_reg = options.is_reg))]
    pub fn draw(&mut self, name: &str, doc: &Value, options: &DrawOptions) -> UndulateResult<Drawing> {
        self.ctx.reset();
        let mut group = scene::load(name, doc, options.is_reg)?;
        options.apply(&mut group);

        let skin = self.renderer.skin();
        let mut group_options = GroupOptions {
            brick_width: options.brick_width,
            brick_height: options.brick_height,
            separation: options.separation,
            gap_offset: options.gap_offset,
            analogue: options.analogue,
            ..GroupOptions::default()
        };
        let estimate = size(&group, 1, &group_options);
        let none = StyleOverrides::new();
        let offsetx = skin.text_bbox("title", &estimate.longest_name, &none).width() + TITLE_MARGIN;
        let mut height = estimate.height;
        if options.is_reg {
            let font = skin.font_size("attr", &none, 9.0);
            height += (estimate.attribute_rows + 1) as f64 * ATTRIBUTE_LINE * font;
        }
        group_options.offsetx = offsetx;
        group_options.width = estimate.width;
        group_options.height = height;

        let compiler = WavegroupCompiler {
            lanes: &self.lanes,
            skin,
        };
        let layout = compiler.compile_wavegroup(&group, 1, 0.0, &group_options, &mut self.ctx)?;
        let canvas = Canvas {
            offsetx,
            width: layout.width.max(estimate.width),
            height: height.max(layout.end_y),
        };
        let frame = Frame {
            xmin: offsetx,
            width: canvas.width,
            height: canvas.height,
            brick_width: layout.brick_width,
            brick_height: layout.brick_height,
        };
        let decorations = annotate(&group, &frame, &self.ctx, skin)?;
        tracing::info!(
            lanes = layout.lanes().len(),
            nodes = self.ctx.nodes.len(),
            decorations = decorations.len(),
            width = canvas.full_width(),
            height = canvas.height,
            "diagram laid out"
        );
        Ok(Drawing {
            canvas,
            layout,
            decorations,
        })
    }

    /// SVG document of `doc`.
    pub fn draw_svg(&mut self, doc: &Value, options: &DrawOptions) -> UndulateResult<String> {
        let drawing = self.draw("root", doc, options)?;
        self.render_svg(&drawing)
    }

    /// SVG document of an already laid out drawing.
    pub fn render_svg(&self, drawing: &Drawing) -> UndulateResult<String> {
        let mut body = self.renderer.wavegroup(&drawing.layout)?;
        body.push_str(&self.renderer.decorations(&drawing.decorations));
        Ok(self.renderer.document(&drawing.canvas, &body))
    }
}

/// SVG document of `doc` drawn with the default skin.
pub fn draw_svg(doc: &Value, options: &DrawOptions) -> UndulateResult<String> {
    Undulate::default().draw_svg(doc, options)
}

/// PNG image of `doc` drawn with the default skin.
pub fn draw_png(doc: &Value, options: &DrawOptions) -> UndulateResult<Vec<u8>> {
    svg_to_png(&draw_svg(doc, options)?)
}

/// Positioned bricks and decorations of `doc`, as JSON.
pub fn compile_json(doc: &Value, options: &DrawOptions) -> UndulateResult<String> {
    let drawing = Undulate::default().draw("root", doc, options)?;
    Ok(serde_json::to_string_pretty(&drawing)?)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
