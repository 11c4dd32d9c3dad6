use crate::bricks::Brick;
use crate::bricks::factory::{BrickFactory, Tag};
use crate::foundation::error::{UndulateError, UndulateResult};

/// Symbol pairs (lower-cased) across which the connecting transition is not drawn.
///
/// Any pair missing from the table draws its transition.
pub const SUPPRESSED_TRANSITIONS: [&str; 9] = ["ll", "hh", "hp", "hn", "nh", "ln", "pl", "pn", "np"];

/// Lane-level geometry shared by every brick of a wavelane.
#[derive(Clone, Debug, PartialEq)]
pub struct LaneParams {
    /// Name of the wavelane, for error reporting.
    pub signal: String,
    /// Width of one slot.
    pub brick_width: f64,
    /// Height of one row.
    pub brick_height: f64,
    /// Horizontal scale of the lane.
    pub hscale: f64,
    /// Vertical scale of the lane.
    pub vscale: f64,
    /// Shift of the lane in bricks; positive values move it left.
    pub phase: f64,
    /// Width the lane is stretched or clipped to. Defaults to the nominal extent.
    pub lane_width: Option<f64>,
}

impl Default for LaneParams {
    fn default() -> Self {
        Self {
            signal: String::new(),
            brick_width: 40.0,
            brick_height: 20.0,
            hscale: 1.0,
            vscale: 1.0,
            phase: 0.0,
            lane_width: None,
        }
    }
}

/// One post-processing pass over the bricks of a wavelane.
pub type Filter = fn(&BrickFactory, Vec<Brick>, &LaneParams) -> UndulateResult<Vec<Brick>>;

/// Ordered list of filters applied to every wavelane.
#[derive(Clone, Debug)]
pub struct FilterBank {
    filters: Vec<(&'static str, Filter)>,
}

impl Default for FilterBank {
    fn default() -> Self {
        Self::standard()
    }
}

impl FilterBank {
    /// No filter at all.
    pub fn empty() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// repeat, width, phase/position, then transition.
    pub fn standard() -> Self {
        let mut bank = Self::empty();
        bank.register("repeat", filter_repeat);
        bank.register("width", filter_width);
        bank.register("phase_pos", filter_phase_pos);
        bank.register("transition", filter_transition);
        bank
    }

    /// Append a filter.
    pub fn register(&mut self, name: &'static str, filter: Filter) {
        self.filters.push((name, filter));
    }

    /// Run every filter in registration order.
    pub fn apply(
        &self,
        factory: &BrickFactory,
        bricks: Vec<Brick>,
        lane: &LaneParams,
    ) -> UndulateResult<Vec<Brick>> {
        let mut out = bricks;
        for (name, filter) in &self.filters {
            tracing::trace!(filter = *name, signal = %lane.signal, bricks = out.len(), "apply filter");
            out = filter(factory, out, lane)?;
        }
        Ok(out)
    }
}

/// Fold `.` and `|` into the bricks before them.
///
/// A `.` after a clock duplicates the clock, otherwise it stretches the
/// previous brick by one slot. A `|` does the same and is kept as an overlay.
pub fn filter_repeat(
    factory: &BrickFactory,
    bricks: Vec<Brick>,
    lane: &LaneParams,
) -> UndulateResult<Vec<Brick>> {
    let mut out: Vec<Brick> = Vec::with_capacity(bricks.len());
    let mut previous: Option<usize> = None;

    for brick in bricks {
        if !factory.has_tag(brick.symbol, Tag::Repeat) {
            out.push(brick);
            previous = Some(out.len() - 1);
            continue;
        }
        let Some(prev) = previous else {
            return Err(UndulateError::invalid_wave(
                lane.signal.clone(),
                format!(
                    "cannot repeat none or gap with '{}', add a valid brick first",
                    brick.symbol
                ),
            ));
        };
        let prev_symbol = out[prev].symbol;
        if factory.has_tag(prev_symbol, Tag::Clock) {
            let mut args = brick.args.clone();
            args.is_first = false;
            out.push(factory.create(prev_symbol, &args)?);
        } else {
            out[prev].repeat += 1;
            out[prev].args.repeat = out[prev].repeat;
        }
        if brick.symbol == '|' {
            out.push(brick);
        }
    }
    Ok(out)
}

/// Scale each brick to `brick_width * hscale * period` by `brick_height * vscale`.
pub fn filter_width(
    factory: &BrickFactory,
    bricks: Vec<Brick>,
    lane: &LaneParams,
) -> UndulateResult<Vec<Brick>> {
    bricks
        .into_iter()
        .map(|brick| {
            let mut args = brick.args;
            args.width = lane.brick_width * lane.hscale * args.period;
            args.height = lane.brick_height * lane.vscale;
            factory.create(brick.symbol, &args)
        })
        .collect()
}

/// Apply phase, repeat and slewing stretch to brick widths and clip the lane.
///
/// Bricks entirely left of the origin are dropped; the first visible one is
/// cut at the origin and becomes the first brick. The last drawn brick is
/// stretched or shrunk to end at the lane width.
pub fn filter_phase_pos(
    factory: &BrickFactory,
    bricks: Vec<Brick>,
    lane: &LaneParams,
) -> UndulateResult<Vec<Brick>> {
    let nominal: f64 = bricks
        .iter()
        .map(|b| stretch(factory, b) * b.repeat as f64 * b.width)
        .sum();
    let lane_width = lane.lane_width.unwrap_or(nominal);
    let last_drawn = bricks.iter().rposition(|b| b.symbol != '|');

    let mut out = Vec::with_capacity(bricks.len());
    let mut position = 0.0;
    for (i, brick) in bricks.into_iter().enumerate() {
        if i == 0 {
            position = -brick.width * lane.phase;
        }
        let mut args = brick.args.clone();
        args.width = if Some(i) == last_drawn {
            (lane_width - position).max(0.0)
        } else {
            stretch(factory, &brick) * brick.repeat as f64 * brick.width
        };
        position += args.width;
        if position <= 0.0 {
            continue;
        }
        if out.is_empty() {
            args.is_first = true;
            args.width = position;
        }
        out.push(factory.create(brick.symbol, &args)?);
    }
    Ok(out)
}

// horizontal stretch of a brick: gaps take no room, steep slewing widens digital bricks
fn stretch(factory: &BrickFactory, brick: &Brick) -> f64 {
    if brick.symbol == '|' {
        0.0
    } else if factory.has_tag(brick.symbol, Tag::Analogue) {
        1.0
    } else {
        (2.0 * brick.slewing / brick.width.max(1.0)).max(1.0)
    }
}

fn suppressed(previous: char, current: char) -> bool {
    let pair: String = [previous, current]
        .iter()
        .flat_map(|c| c.to_lowercase())
        .collect();
    SUPPRESSED_TRANSITIONS.contains(&pair.as_str())
}

/// Thread continuity through the lane.
///
/// Each brick starts from the last y of the previous drawn brick. Suppressed
/// pairs and merged data runs drop the transition on both sides; a data brick
/// followed by a non-data brick ends where its successor starts.
pub fn filter_transition(
    factory: &BrickFactory,
    bricks: Vec<Brick>,
    _lane: &LaneParams,
) -> UndulateResult<Vec<Brick>> {
    let mut out: Vec<Brick> = Vec::with_capacity(bricks.len());
    let mut previous: Option<usize> = None;

    for brick in bricks {
        let mut args = brick.args.clone();
        let symbol = brick.symbol;
        let prev_symbol = previous.map_or(' ', |i| out[i].symbol);

        if let Some(i) = previous
            && suppressed(prev_symbol, symbol)
        {
            args.ignore_start = true;
            out[i].args.ignore_end = true;
            out[i] = factory.regenerate(&out[i])?;
        }

        args.last_y = previous.map_or(args.height, |i| out[i].get_last_y());

        let prev_is_data = factory.has_tag(prev_symbol, Tag::Data);
        let is_data = factory.has_tag(symbol, Tag::Data);
        if prev_is_data && !is_data {
            args.ignore_start = true;
        }

        if let Some(i) = previous
            && symbol == prev_symbol
            && is_data
            && symbol != 'x'
            && args.digital.data == out[i].args.digital.data
        {
            args.ignore_start = true;
            args.digital.hide_data = true;
            out[i].args.ignore_end = true;
            out[i] = factory.regenerate(&out[i])?;
        }

        out.push(factory.create(symbol, &args)?);

        if !factory.has_tag(symbol, Tag::Repeat) {
            if let Some(i) = previous
                && prev_is_data
                && !is_data
            {
                let first_y = out[out.len() - 1].get_first_y();
                out[i].args.end_y = first_y;
                out[i] = factory.regenerate(&out[i])?;
            }
            previous = Some(out.len() - 1);
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/bricks/filters.rs"]
mod tests;
