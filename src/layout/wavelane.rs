use std::collections::{BTreeMap, BTreeSet};

use crate::bricks::{Brick, BrickArgs, BrickFactory, FilterBank, LaneParams, Param, Tag};
use crate::expression::{AnalogueContext, MAX_LIST_LEN};
use crate::foundation::core::Point;
use crate::foundation::error::{UndulateError, UndulateResult};
use crate::layout::context::RenderContext;
use crate::scene::{Lane, ParamSupply, StyleOverrides};

/// Geometry shared by the lanes of a group.
#[derive(Clone, Debug, PartialEq)]
pub struct LaneOptions {
    /// Width of one slot, group scale applied.
    pub brick_width: f64,
    /// Height of one row, group scale applied.
    pub brick_height: f64,
    /// Horizontal offset of gap glyphs inside their slot.
    pub gap_offset: f64,
    /// Voltage window and seed of analogue bricks.
    pub analogue: AnalogueContext,
}

impl Default for LaneOptions {
    fn default() -> Self {
        Self {
            brick_width: 40.0,
            brick_height: 20.0,
            gap_offset: 20.0,
            analogue: AnalogueContext::default(),
        }
    }
}

/// A brick and the x at which it is drawn.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlacedBrick {
    /// Left edge of the brick in the lane.
    pub x: f64,
    /// The brick geometry.
    #[serde(flatten)]
    pub brick: Brick,
}

/// Positioned bricks of one wavelane.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CompiledLane {
    /// Signal name.
    pub name: String,
    /// y of the top of the row, relative to the drawing area.
    pub y: f64,
    /// Height of the row.
    pub height: f64,
    /// Bricks, left to right.
    pub bricks: Vec<PlacedBrick>,
    /// Style overrides of the lane.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: StyleOverrides,
}

impl CompiledLane {
    /// Right-most x reached by the lane.
    pub fn extent(&self) -> f64 {
        self.bricks
            .iter()
            .filter(|b| b.brick.symbol != '|')
            .map(|b| b.x + b.brick.width)
            .fold(0.0, f64::max)
    }
}

/// Turns wave strings into positioned bricks.
#[derive(Clone, Debug, Default)]
pub struct WavelaneCompiler {
    /// Symbol registry.
    pub factory: BrickFactory,
    /// Post-processing passes.
    pub filters: FilterBank,
}

impl WavelaneCompiler {
    /// Compiler over the standard symbols and filters.
    pub fn standard() -> Self {
        Self {
            factory: BrickFactory::standard(),
            filters: FilterBank::standard(),
        }
    }

    /// Compile `lane` whose row starts at `y`, registering its nodes in `ctx`.
    ///
    /// Unknown symbols abort before any brick is built.
    #[tracing::instrument(level = "debug", skip_all, fields(signal = %lane.name))]
    pub fn compile_wavelane(
        &self,
        lane: &Lane,
        options: &LaneOptions,
        y: f64,
        ctx: &mut RenderContext,
    ) -> UndulateResult<CompiledLane> {
        let expanded = lane.wave.chars().count().saturating_mul(lane.repeat);
        if expanded > MAX_LIST_LEN {
            return Err(UndulateError::invalid_wave(
                &lane.name,
                format!("{expanded} slots after repeat, at most {MAX_LIST_LEN} allowed"),
            ));
        }
        let symbols: Vec<char> = lane.wave.repeat(lane.repeat).chars().collect();
        if let Some((position, &symbol)) = symbols
            .iter()
            .enumerate()
            .find(|(_, s)| !self.factory.contains(**s))
        {
            return Err(UndulateError::UnknownSymbol {
                signal: lane.name.clone(),
                symbol,
                position,
            });
        }

        let slots = self.build_slots(lane, options, &symbols)?;
        self.register_nodes(lane, options, &slots, y, ctx);

        let params = LaneParams {
            signal: lane.name.clone(),
            brick_width: options.brick_width,
            brick_height: options.brick_height,
            hscale: lane.hscale,
            vscale: lane.vscale,
            phase: lane.phase,
            lane_width: None,
        };
        let bricks = self.filters.apply(&self.factory, slots, &params)?;

        let brick_width = options.brick_width * lane.hscale;
        let gap_offset = lane.gap_offset.unwrap_or(options.gap_offset);
        let mut placed = Vec::with_capacity(bricks.len());
        let mut pos = 0.0;
        for brick in bricks {
            let x = if brick.symbol == '|' {
                pos - brick_width + gap_offset - brick.slewing
            } else {
                f64::max(0.0, pos)
            };
            pos += brick.width;
            placed.push(PlacedBrick { x, brick });
        }
        tracing::debug!(bricks = placed.len(), width = pos, "wavelane compiled");

        Ok(CompiledLane {
            name: lane.name.clone(),
            y,
            height: options.brick_height * lane.vscale,
            bricks: placed,
            styles: lane.styles.clone(),
        })
    }

    // one brick per symbol with its share of the lane parameters
    fn build_slots(
        &self,
        lane: &Lane,
        options: &LaneOptions,
        symbols: &[char],
    ) -> UndulateResult<Vec<Brick>> {
        let mut cursors: BTreeMap<Param, usize> = self
            .factory
            .get_parameters()
            .into_keys()
            .map(|p| (p, 0))
            .collect();
        let mut exhausted = BTreeSet::new();
        let mut previous = ' ';
        let mut slots = Vec::with_capacity(symbols.len());

        for (i, &symbol) in symbols.iter().enumerate() {
            let mut args = BrickArgs {
                width: options.brick_width,
                height: options.brick_height,
                is_first: i == 0,
                ..BrickArgs::default()
            };
            args.analogue.context = options.analogue;
            args.digital.follow_data = self.factory.has_tag(previous, Tag::Data);

            for (param, default) in self.factory.params(symbol) {
                let value = match lane.params.get(param) {
                    None => default,
                    Some(ParamSupply::Broadcast(value)) => value,
                    Some(ParamSupply::Sequence(values)) => {
                        let cursor = cursors.entry(*param).or_insert(0);
                        let value = values.get(*cursor);
                        *cursor += 1;
                        value.unwrap_or_else(|| {
                            if exhausted.insert(*param) {
                                tracing::warn!(
                                    signal = %lane.name,
                                    param = param.plural_key(),
                                    "not enough values, using the default"
                                );
                            }
                            default
                        })
                    }
                };
                param
                    .apply(value, &mut args)
                    .map_err(|e| UndulateError::invalid_wave(lane.name.clone(), e.to_string()))?;
            }
            slots.push(self.factory.create(symbol, &args)?);
            previous = symbol;
        }
        Ok(slots)
    }

    // nodes sit on the slot grid, half a slewing after the slot start
    fn register_nodes(
        &self,
        lane: &Lane,
        options: &LaneOptions,
        slots: &[Brick],
        y: f64,
        ctx: &mut RenderContext,
    ) {
        let Some(chain) = lane.node.as_deref() else {
            return;
        };
        let mut words = chain.split(' ');
        let marks = words.next().unwrap_or_default();
        let mut extra_names = words.filter(|w| !w.is_empty());

        let brick_width = options.brick_width * lane.hscale;
        let default_period = lane.number(Param::Period).unwrap_or(1.0);
        let default_slewing = lane.number(Param::Slewing).unwrap_or(0.0);
        let node_y = y + options.brick_height * lane.vscale / 2.0;
        let mut start = -lane.phase * brick_width;

        for (i, mark) in marks.chars().enumerate() {
            let (period, slewing) = slots
                .get(i)
                .map_or((default_period, default_slewing), |b| {
                    (b.args.period, b.args.slewing)
                });
            if mark != '.' {
                let name = if mark.is_alphabetic() {
                    Some(mark.to_string())
                } else {
                    extra_names.next().map(str::to_owned)
                };
                match name {
                    Some(name) => {
                        ctx.nodes
                            .insert(name, Point::new(start + slewing / 2.0, node_y));
                    }
                    None => tracing::warn!(
                        signal = %lane.name,
                        mark = %mark,
                        "node mark without a name"
                    ),
                }
            }
            start += brick_width * period;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wavelane.rs"]
mod tests;
