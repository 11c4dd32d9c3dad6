use crate::bricks::factory::{BrickFactory, Constructor, Param, ParamValue, SymbolSpec, Tag};
use crate::bricks::{Brick, BrickArgs, or_nan};
use crate::foundation::core::{ArrowDescription, Drawable, Point, SplineSegment, TextSpan};
use crate::foundation::error::UndulateResult;

// flat run before the slope of a `0`/`1` transition
const LEVEL_RUN: f64 = 3.0;
// settle distance cap of `z`/`u`/`d` curves
const SETTLE_CAP: f64 = 20.0;

fn edge_angle(height: f64, slewing: f64) -> f64 {
    (-height).atan2(slewing).to_degrees()
}

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// `n` / `N`: falling edge clock.
pub(crate) fn nclk(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h, sl) = (b.width, b.height, b.slewing);
    let dc = args.digital.duty_cycle;
    b.end_y = if b.ignore_end { 0.0 } else { or_nan(b.end_y, h / 2.0) };
    b.last_y = if b.is_first { 0.0 } else { or_nan(b.last_y, h / 2.0) };
    let dt = (h - b.last_y).abs() * sl / h;
    b.paths.push(Drawable::new(
        "path",
        vec![
            p(0.0, b.last_y),
            p(dt, h),
            p(w * dc - sl / 2.0, h),
            p(w * dc + sl / 2.0, 0.0),
            p(w - sl / 2.0, 0.0),
            p(w, b.end_y),
        ],
    ));
    if symbol.is_ascii_uppercase() {
        b.arrows.push(Drawable::new(
            "arrow",
            ArrowDescription {
                x: dt * (h / 2.0 - b.last_y) / h,
                y: h / 2.0,
                angle: -edge_angle(h, sl),
            },
        ));
    }
    Ok(b)
}

/// `p` / `P`: rising edge clock.
pub(crate) fn pclk(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h, sl) = (b.width, b.height, b.slewing);
    let dc = args.digital.duty_cycle;
    b.end_y = if b.ignore_end { h } else { or_nan(b.end_y, h / 2.0) };
    b.last_y = if b.is_first { h } else { or_nan(b.last_y, h / 2.0) };
    let dt = b.last_y * sl / h;
    b.paths.push(Drawable::new(
        "path",
        vec![
            p(0.0, b.last_y),
            p(dt, 0.0),
            p(w * dc - sl / 2.0, 0.0),
            p(w * dc + sl / 2.0, h),
            p(w - sl / 2.0, h),
            p(w, b.end_y),
        ],
    ));
    if symbol.is_ascii_uppercase() && !b.ignore_start {
        b.arrows.push(Drawable::new(
            "arrow",
            ArrowDescription {
                x: dt * (b.last_y - h / 2.0) / h,
                y: h / 2.0,
                angle: edge_angle(h, sl),
            },
        ));
    }
    Ok(b)
}

/// `l` / `L`: fall to and hold the low rail.
pub(crate) fn low(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h, sl) = (b.width, b.height, b.slewing);
    b.end_y = h;
    if b.is_first || b.ignore_start || b.last_y.is_nan() {
        b.last_y = h;
    }
    let dt = (h - b.last_y).abs() * sl / h;
    b.paths.push(Drawable::new(
        "path",
        vec![p(0.0, b.last_y), p(dt, h), p(w, h)],
    ));
    if symbol == 'L' && !b.is_first && !b.ignore_start {
        b.arrows.push(Drawable::new(
            "arrow",
            ArrowDescription {
                x: dt * (h / 2.0 - b.last_y) / h,
                y: h / 2.0,
                angle: -edge_angle(h, sl),
            },
        ));
    }
    Ok(b)
}

/// `h` / `H`: rise to and hold the high rail.
pub(crate) fn high(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h, sl) = (b.width, b.height, b.slewing);
    b.end_y = 0.0;
    if b.is_first || b.ignore_start || b.last_y.is_nan() {
        b.last_y = 0.0;
    }
    let dt = b.last_y * sl / h;
    b.paths.push(Drawable::new(
        "path",
        vec![p(0.0, b.last_y), p(dt, 0.0), p(w, 0.0)],
    ));
    if symbol == 'H' && !b.is_first && !b.ignore_start {
        b.arrows.push(Drawable::new(
            "arrow",
            ArrowDescription {
                x: dt / 2.0,
                y: h / 2.0,
                angle: edge_angle(h, sl),
            },
        ));
    }
    Ok(b)
}

/// `z`: high impedance, settles to mid rail.
pub(crate) fn high_z(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h, sl) = (b.width, b.height, b.slewing);
    b.end_y = h / 2.0;
    if b.is_first || b.last_y.is_nan() {
        b.last_y = h / 2.0;
    }
    let dt = (h - b.last_y).abs() * sl / h;
    b.splines.push(Drawable::new(
        "path",
        vec![
            SplineSegment::move_to(0.0, b.last_y),
            SplineSegment::curve_to(dt, h / 2.0),
            SplineSegment::cont(dt, h / 2.0),
            SplineSegment::cont(w.min(SETTLE_CAP), h / 2.0),
            SplineSegment::line_to(w, h / 2.0),
        ],
    ));
    Ok(b)
}

/// `0` / `1`: short transition to a rail.
pub(crate) fn level(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h, sl) = (b.width, b.height, b.slewing);
    let rail = if symbol == '1' { 0.0 } else { h };
    b.end_y = rail;
    if b.is_first || b.ignore_start {
        b.last_y = rail;
    } else {
        b.last_y = or_nan(b.last_y, h / 2.0);
    }
    b.paths.push(Drawable::new(
        "path",
        vec![
            p(0.0, b.last_y),
            p(LEVEL_RUN, b.last_y),
            p(LEVEL_RUN + sl, rail),
            p(w, rail),
        ],
    ));
    Ok(b)
}

/// `X`: garbage, hatched on both sides of the previous level.
pub(crate) fn garbage(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h, sl) = (b.width, b.height, b.slewing);
    let (is, ie) = (b.ignore_start, b.ignore_end);
    b.last_y = or_nan(b.last_y, h / 2.0);
    let last = b.last_y;
    let tail = if ie { 0.0 } else { h / 2.0 };

    if args.digital.follow_data {
        b.paths.push(Drawable::new(
            "path",
            vec![
                p(sl, if is { 0.0 } else { last }),
                p(0.0, 0.0),
                p(w - sl, 0.0),
                p(w, tail),
            ],
        ));
        b.paths.push(Drawable::new(
            "path",
            vec![
                p(sl, if is { h } else { last }),
                p(0.0, h),
                p(w - sl, h),
                p(w, tail),
            ],
        ));
        let right = if ie { w } else { w - sl };
        b.polygons.push(Drawable::new(
            "hatch",
            vec![
                p(sl, last),
                p(0.0, 0.0),
                p(right, 0.0),
                p(w, tail),
                p(right, h),
                p(0.0, h),
                p(sl, last),
            ],
        ));
    } else {
        let left = if is { 0.0 } else { sl };
        b.paths.push(Drawable::new(
            "path",
            vec![
                p(0.0, if is { 0.0 } else { last }),
                p(left, 0.0),
                p(w, 0.0),
                p(w - sl, tail),
            ],
        ));
        b.paths.push(Drawable::new(
            "path",
            vec![
                p(0.0, if is { h } else { last }),
                p(left, h),
                p(w, h),
                p(w - sl, tail),
            ],
        ));
        b.polygons.push(Drawable::new(
            "hatch",
            vec![
                p(0.0, last),
                p(left, 0.0),
                p(w, 0.0),
                p(w - sl, tail),
                p(w, h),
                p(left, h),
                p(0.0, last),
            ],
        ));
    }
    Ok(b)
}

fn data_style(symbol: char) -> String {
    match symbol {
        '=' => "s2-polygon".to_owned(),
        'x' => "hatch".to_owned(),
        digit => format!("s{digit}-polygon"),
    }
}

/// `=`, `2`..`9`, `x`: bus value.
pub(crate) fn data(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h, sl) = (b.width, b.height, b.slewing);
    let (is, ie) = (b.ignore_start, b.ignore_end);
    b.end_y = or_nan(b.end_y, h / 2.0);
    b.last_y = or_nan(b.last_y, h / 2.0);
    let (last, end) = (b.last_y, b.end_y);

    let outline = if b.is_first {
        vec![
            p(0.0, 0.0),
            p(w - sl, 0.0),
            p(w, if ie { 0.0 } else { end }),
            p(w - sl, h),
            p(0.0, h),
        ]
    } else {
        vec![
            p(0.0, if is { 0.0 } else { last }),
            p(sl, 0.0),
            p(w - sl, 0.0),
            p(w, if ie { 0.0 } else { end }),
            p(w, if ie { h } else { end }),
            p(w - sl, h),
            p(sl, h),
            p(0.0, if is { h } else { last }),
        ]
    };
    if ie {
        let half = outline.len() / 2;
        b.paths.push(Drawable::new("path", outline[..half].to_vec()));
        b.paths.push(Drawable::new("path", outline[half..].to_vec()));
    } else {
        b.paths.push(Drawable::new("path", outline.clone()));
    }
    b.polygons.push(Drawable::new(data_style(symbol), outline));

    // `x` never shows its label
    if !args.digital.hide_data && symbol != 'x' {
        b.texts.push(Drawable::new(
            "data",
            TextSpan::new(w / 2.0, h / 2.0, args.digital.data.clone()),
        ));
    }
    Ok(b)
}

/// `|`: time compression mark, drawn across the lane.
pub(crate) fn gap(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let h = b.height;
    let left = || {
        vec![
            SplineSegment::move_to(-4.0, h + 2.0),
            SplineSegment::curve_to(-4.0, h + 2.0),
            SplineSegment::cont(-2.0, h + 2.0),
            SplineSegment::cont(-2.0, h / 2.0),
            SplineSegment::curve_to(-2.0, h / 2.0),
            SplineSegment::cont(-2.0, -2.0),
            SplineSegment::cont(0.0, -2.0),
        ]
    };
    let mut mask = left();
    mask.extend([
        SplineSegment::line_to(4.0, -2.0),
        SplineSegment::curve_to(4.0, -2.0),
        SplineSegment::cont(2.0, -2.0),
        SplineSegment::cont(2.0, h / 2.0),
        SplineSegment::curve_to(2.0, h / 2.0),
        SplineSegment::cont(2.0, h + 2.0),
        SplineSegment::cont(0.0, h + 2.0),
        SplineSegment::close(),
    ]);
    b.splines.push(Drawable::new("hide", mask));
    b.splines.push(Drawable::new("path", left()));
    b.splines.push(Drawable::new(
        "path",
        vec![
            SplineSegment::move_to(0.0, h + 2.0),
            SplineSegment::curve_to(0.0, h + 2.0),
            SplineSegment::cont(2.0, h + 2.0),
            SplineSegment::cont(2.0, h / 2.0),
            SplineSegment::curve_to(2.0, h / 2.0),
            SplineSegment::cont(2.0, -2.0),
            SplineSegment::cont(4.0, -2.0),
        ],
    ));
    Ok(b)
}

/// `u` / `d`: RC charge to the high rail or discharge to the low rail.
pub(crate) fn rc(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h, sl) = (b.width, b.height, b.slewing);
    let rail = if symbol == 'u' { 0.0 } else { h };
    b.end_y = rail;
    if b.is_first {
        b.last_y = h / 2.0;
    }
    b.last_y = or_nan(b.last_y, h / 2.0);
    let dt = (rail - b.last_y).abs() * sl / h;
    b.splines.push(Drawable::new(
        "path",
        vec![
            SplineSegment::move_to(0.0, b.last_y),
            SplineSegment::curve_to(0.0, b.last_y),
            SplineSegment::cont(dt, rail),
            SplineSegment::cont(w.min(SETTLE_CAP), rail),
            SplineSegment::line_to(w, rail),
        ],
    ));
    Ok(b)
}

/// `i` / `I`: impulse at `duty_cycle * width`.
pub(crate) fn impulse(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h, sl) = (b.width, b.height, b.slewing);
    let dc = args.digital.duty_cycle;
    let rest = if symbol == 'i' { 0.0 } else { h };
    b.end_y = rest;
    if b.is_first || b.last_y.is_nan() {
        b.last_y = rest;
    }
    let dt = ((rest - b.last_y).abs() * sl / h).min(dc * w);
    b.paths.push(Drawable::new(
        "path",
        vec![
            p(0.0, b.last_y),
            p(dt, rest),
            p(dc * w, rest),
            p(dc * w, h - rest),
            p(dc * w, rest),
            p(w, rest),
        ],
    ));
    Ok(b)
}

/// ` `: blank slot.
pub(crate) fn space(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    if b.is_first || b.last_y.is_nan() {
        b.last_y = b.height;
    }
    Ok(b)
}

/// `.`: zero-width placeholder, consumed by the repeat filter.
pub(crate) fn empty(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    b.width = 0.0;
    if b.is_first || b.last_y.is_nan() {
        b.last_y = b.height;
    }
    Ok(b)
}

/// `f`: horizontal line continuing the incoming level.
pub(crate) fn filler(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let y = if b.is_first {
        b.height / 2.0
    } else {
        or_nan(b.last_y, b.height / 2.0)
    };
    b.last_y = y;
    b.end_y = y;
    b.paths.push(Drawable::new("path", vec![p(0.0, y), p(b.width, y)]));
    Ok(b)
}

pub(crate) fn register_symbols(factory: &mut BrickFactory) {
    let num = ParamValue::Number;
    let clock = |ctor: Constructor| {
        SymbolSpec::new(ctor)
            .tags(&[Tag::Clock])
            .param(Param::DutyCycle, num(0.5))
            .param(Param::Slewing, num(0.0))
            .param(Param::Period, num(1.0))
    };
    factory.register('n', clock(nclk));
    factory.register('N', clock(nclk));
    factory.register('p', clock(pclk));
    factory.register('P', clock(pclk));

    let sustained = |ctor: Constructor| {
        SymbolSpec::new(ctor)
            .tags(&[Tag::Clock])
            .param(Param::Slewing, num(0.0))
            .param(Param::Period, num(1.0))
    };
    factory.register('l', sustained(low));
    factory.register('L', sustained(low));
    factory.register('h', sustained(high));
    factory.register('H', sustained(high));

    let plain = |ctor: Constructor| {
        SymbolSpec::new(ctor)
            .param(Param::Slewing, num(0.0))
            .param(Param::Period, num(1.0))
    };
    factory.register('z', plain(high_z));
    factory.register('0', plain(level));
    factory.register('1', plain(level));
    factory.register('u', plain(rc));
    factory.register('d', plain(rc));

    for symbol in ['=', '2', '3', '4', '5', '6', '7', '8', '9'] {
        factory.register(
            symbol,
            SymbolSpec::new(data)
                .tags(&[Tag::Data])
                .param(Param::Data, ParamValue::Text(String::new()))
                .param(Param::Slewing, num(3.0))
                .param(Param::Period, num(1.0)),
        );
    }
    let hatched = |ctor: Constructor| {
        SymbolSpec::new(ctor)
            .tags(&[Tag::Data])
            .param(Param::Slewing, num(3.0))
            .param(Param::Period, num(1.0))
    };
    factory.register('x', hatched(data));
    factory.register('X', hatched(garbage));

    let pulse = |ctor: Constructor| {
        SymbolSpec::new(ctor)
            .param(Param::DutyCycle, num(0.5))
            .param(Param::Slewing, num(0.0))
            .param(Param::Period, num(1.0))
    };
    factory.register('i', pulse(impulse));
    factory.register('I', pulse(impulse));

    factory.register(
        '|',
        SymbolSpec::new(gap)
            .tags(&[Tag::Repeat])
            .param(Param::Slewing, num(0.0))
            .param(Param::Period, num(1.0)),
    );
    factory.register(
        '.',
        SymbolSpec::new(empty)
            .tags(&[Tag::Repeat])
            .param(Param::DutyCycle, num(0.5))
            .param(Param::Slewing, num(0.0))
            .param(Param::Period, num(1.0)),
    );
    factory.register(' ', plain(space));
    factory.register('f', plain(filler));
}

#[cfg(test)]
#[path = "../../tests/unit/bricks/digital.rs"]
mod tests;
