use crate::bricks::{Param, ParamValue};
use crate::expression::{AnalogueContext, MAX_LIST_LEN};
use crate::foundation::core::{Point, TextSpan};
use crate::foundation::error::UndulateResult;
use crate::layout::context::RenderContext;
use crate::layout::wavelane::{CompiledLane, LaneOptions, WavelaneCompiler};
use crate::render::Skin;
use crate::scene::{Entry, Group, Lane, ParamSupply, StyleOverrides, is_spacer};

/// Options inherited by a group from its parent.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupOptions {
    /// Width of one slot, before scaling.
    pub brick_width: f64,
    /// Height of one row, before scaling.
    pub brick_height: f64,
    /// Row separation; a fraction of the row height at the root, pixels below.
    pub separation: f64,
    /// Left margin reserved for signal names.
    pub offsetx: f64,
    /// Drawing width, used by ticks and group separators.
    pub width: f64,
    /// Drawing height, used by ticks.
    pub height: f64,
    /// Offset of gap glyphs; half a slot when unset.
    pub gap_offset: Option<f64>,
    /// Voltage window and seed of analogue bricks.
    pub analogue: AnalogueContext,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            brick_width: 40.0,
            brick_height: 20.0,
            separation: 0.25,
            offsetx: 0.0,
            width: 0.0,
            height: 0.0,
            gap_offset: None,
            analogue: AnalogueContext::default(),
        }
    }
}

/// Vertical rules marking every slot.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Ticks {
    /// Identifier of the owning group.
    pub id: usize,
    /// x of the first tick.
    pub x: f64,
    /// Distance between two ticks.
    pub step: f64,
    /// Width covered by the ticks.
    pub width: f64,
    /// Length of every tick.
    pub height: f64,
}

impl Ticks {
    /// x of every tick, relative to the first one.
    ///
    /// At most [`MAX_LIST_LEN`] ticks are drawn.
    pub fn positions(&self) -> impl Iterator<Item = f64> + '_ {
        let count = if self.step > 0.0 {
            ((self.width / self.step).max(0.0) as usize).min(MAX_LIST_LEN)
        } else {
            0
        };
        (0..count).map(move |k| self.step * k as f64)
    }
}

/// Child of a laid out group.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupItem {
    /// Compiled wavelane.
    Lane(CompiledLane),
    /// Nested group.
    Group(GroupLayout),
}

/// Positions of everything a group draws, in drawing coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct GroupLayout {
    /// Group name; empty for anonymous groups.
    pub name: String,
    /// Unique identifier within the draw.
    pub id: usize,
    /// Nesting depth, 1 at the root.
    pub depth: usize,
    /// Left margin of the lanes.
    pub offsetx: f64,
    /// Group title, for named nested groups.
    pub title: Option<TextSpan>,
    /// Rule drawn under the title.
    pub separator: Option<[Point; 2]>,
    /// Children, top to bottom.
    pub items: Vec<GroupItem>,
    /// Dotted slot rules, unless disabled.
    pub ticks: Option<Ticks>,
    /// Width of one slot, scale applied.
    pub brick_width: f64,
    /// Height of one row, scale applied.
    pub brick_height: f64,
    /// Space between rows.
    pub separation: f64,
    /// Widest lane extent seen in this group.
    pub width: f64,
    /// y reached after the last row.
    pub end_y: f64,
}

impl GroupLayout {
    /// Every compiled lane of the tree, depth first.
    pub fn lanes(&self) -> Vec<&CompiledLane> {
        let mut out = Vec::new();
        for item in &self.items {
            match item {
                GroupItem::Lane(lane) => out.push(lane),
                GroupItem::Group(group) => out.extend(group.lanes()),
            }
        }
        out
    }
}

/// Recursive vertical layout of groups.
pub struct WavegroupCompiler<'a> {
    /// Compiler of the lanes.
    pub lanes: &'a WavelaneCompiler,
    /// Style sheet used to size titles.
    pub skin: &'a Skin,
}

impl WavegroupCompiler<'_> {
    /// Lay out `group` starting at `y`, recording rows and nodes in `ctx`.
    #[tracing::instrument(level = "debug", skip_all, fields(group = %group.name, depth = depth))]
    pub fn compile_wavegroup(
        &self,
        group: &Group,
        depth: usize,
        y: f64,
        options: &GroupOptions,
        ctx: &mut RenderContext,
    ) -> UndulateResult<GroupLayout> {
        let id = ctx.next_group_id();
        let config = &group.config;
        let brick_width = options.brick_width * config.hscale.unwrap_or(1.0);
        let brick_height = options.brick_height * config.vscale.unwrap_or(1.0);
        let mut separation = config.separation.unwrap_or(options.separation);
        if separation == 0.0 {
            separation = 0.25;
        }
        if depth == 1 {
            separation *= brick_height;
        }
        let gap_offset = config
            .gap_offset
            .or(options.gap_offset)
            .unwrap_or(brick_width * 0.5);
        let offsetx = options.offsetx;
        let mut width = options.width;

        let mut oy = y;
        let mut title = None;
        let mut separator = None;
        if depth > 1 {
            oy += brick_height + separation;
            let style = format!("h{depth}");
            let font = self.skin.font_size(&style, &StyleOverrides::new(), 16.0);
            title = Some(TextSpan::new(
                0.0,
                oy - 0.65 * font - separation,
                group.name.clone(),
            ));
            if depth == 2 {
                separator = Some([
                    Point::new(0.0, oy - separation),
                    Point::new(width + offsetx, oy - separation),
                ]);
            }
            ctx.register_y_step(brick_height + separation, true);
        }

        let lane_options = LaneOptions {
            brick_width,
            brick_height,
            gap_offset,
            analogue: options.analogue,
        };
        let mut items = Vec::with_capacity(group.entries.len());
        for entry in &group.entries {
            let dy = match entry {
                Entry::Lane(lane) => {
                    let compiled = self
                        .lanes
                        .compile_wavelane(lane, &lane_options, oy, ctx)?;
                    let dy = if lane.overlay {
                        0.0
                    } else {
                        brick_height * lane.vscale + separation
                    };
                    let slots = lane.wave.chars().count() as f64;
                    width = width.max(slots * brick_width).max(compiled.extent());
                    items.push(GroupItem::Lane(compiled));
                    ctx.register_y_step(dy, false);
                    dy
                }
                Entry::Spacer(lane) => {
                    self.lanes
                        .compile_wavelane(lane, &lane_options, oy, ctx)?;
                    let dy = brick_height * lane.vscale + separation;
                    ctx.register_y_step(dy, false);
                    dy
                }
                Entry::Group(sub) => {
                    let nested = GroupOptions {
                        brick_width,
                        brick_height,
                        separation,
                        offsetx,
                        width,
                        height: options.height,
                        gap_offset: Some(gap_offset),
                        analogue: options.analogue,
                    };
                    let layout = self.compile_wavegroup(sub, depth + 1, oy, &nested, ctx)?;
                    let dy = layout.end_y - oy;
                    width = width.max(layout.width);
                    items.push(GroupItem::Group(layout));
                    dy
                }
            };
            oy += dy;
        }

        let no_ticks = config.no_ticks.unwrap_or(depth > 1);
        let ticks = (!no_ticks).then(|| Ticks {
            id,
            x: offsetx + config.ticks_phase.unwrap_or(0.0) * brick_width,
            step: brick_width,
            width,
            height: options.height.max(oy),
        });
        tracing::debug!(rows = items.len(), end_y = oy, "wavegroup laid out");

        Ok(GroupLayout {
            name: group.name.clone(),
            id,
            depth,
            offsetx,
            title,
            separator,
            items,
            ticks,
            brick_width,
            brick_height,
            separation,
            width,
            end_y: oy,
        })
    }
}

/// Pre-estimated extent of a drawing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiagramSize {
    /// Longest signal name.
    pub longest_name: String,
    /// Width of the wave zone.
    pub width: f64,
    /// Height of the drawing.
    pub height: f64,
    /// Attribute lines printed below register fields.
    pub attribute_rows: usize,
}

/// Estimate the size of `group` before laying it out.
pub fn size(group: &Group, depth: usize, options: &GroupOptions) -> DiagramSize {
    let config = &group.config;
    let brick_width = options.brick_width * config.hscale.unwrap_or(1.0);
    let brick_height = options.brick_height * config.vscale.unwrap_or(1.0);
    let mut separation = config.separation.unwrap_or(options.separation);
    if separation == 0.0 {
        separation = 0.25;
    }
    if depth == 1 {
        separation *= brick_height;
    }

    let mut out = DiagramSize {
        height: if depth > 1 { brick_height + separation } else { 0.0 },
        ..DiagramSize::default()
    };
    for entry in &group.entries {
        let dy = match entry {
            Entry::Lane(lane) => {
                out.width = out.width.max(lane_length(lane) * brick_width);
                if !is_spacer(&lane.name)
                    && lane.name.chars().count() > out.longest_name.chars().count()
                {
                    out.longest_name = lane.name.clone();
                }
                out.attribute_rows = out.attribute_rows.max(attribute_rows(lane));
                if lane.overlay {
                    0.0
                } else {
                    brick_height * lane.vscale + separation
                }
            }
            Entry::Spacer(lane) => brick_height * lane.vscale + separation,
            Entry::Group(sub) => {
                let nested = GroupOptions {
                    brick_width,
                    brick_height,
                    separation,
                    ..options.clone()
                };
                let inner = size(sub, depth + 1, &nested);
                out.width = out.width.max(inner.width);
                out.attribute_rows += inner.attribute_rows;
                if inner.longest_name.chars().count() > out.longest_name.chars().count() {
                    out.longest_name = inner.longest_name;
                }
                inner.height
            }
        };
        out.height += dy;
    }
    out
}

// slots covered by a lane, periods and repeat included
fn lane_length(lane: &Lane) -> f64 {
    let slots = lane.wave.chars().count() as f64;
    let base = match lane.params.get(&Param::Period) {
        Some(ParamSupply::Sequence(periods)) => periods
            .iter()
            .map(|p| match p {
                ParamValue::Number(v) => *v,
                _ => 1.0,
            })
            .sum(),
        Some(ParamSupply::Broadcast(ParamValue::Number(v))) => slots * v,
        _ => slots,
    };
    base * lane.repeat as f64 * lane.hscale
}

fn attribute_rows(lane: &Lane) -> usize {
    match lane.params.get(&Param::Attribute) {
        Some(ParamSupply::Sequence(values)) => values
            .iter()
            .map(|v| match v {
                ParamValue::Texts(items) => items.len(),
                ParamValue::Text(s) if !s.is_empty() => 1,
                _ => 0,
            })
            .max()
            .unwrap_or(0),
        Some(ParamSupply::Broadcast(ParamValue::Texts(items))) => items.len(),
        _ => 0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wavegroup.rs"]
mod tests;
