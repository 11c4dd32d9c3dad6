use std::f64::consts::PI;

use crate::bricks::factory::{BrickFactory, Constructor, Param, ParamValue, SymbolSpec, Tag};
use crate::bricks::{Brick, BrickArgs, Equation, or_nan};
use crate::expression::{Value, evaluate};
use crate::foundation::core::{Drawable, Point, SplineSegment};
use crate::foundation::error::{UndulateError, UndulateResult};

fn eval_level(args: &BrickArgs) -> UndulateResult<f64> {
    match &args.analogue.equation {
        Equation::Level(v) => Ok(*v),
        Equation::Points(points) => points
            .last()
            .map(|&(_, v)| v)
            .ok_or_else(|| UndulateError::expression("empty point list used as a level")),
        Equation::Expr(src) => {
            let mut env = args.analogue.context.environment(args.width, args.height)?;
            let value = evaluate(src, &mut env)?;
            value.as_number().ok_or_else(|| {
                UndulateError::expression(format!("'{src}' does not evaluate to a number"))
            })
        }
    }
}

fn eval_points(args: &BrickArgs) -> UndulateResult<Vec<(f64, f64)>> {
    match &args.analogue.equation {
        Equation::Level(v) => Ok(vec![(0.0, *v), (args.width, *v)]),
        Equation::Points(points) => Ok(points.clone()),
        Equation::Expr(src) => {
            let mut env = args.analogue.context.environment(args.width, args.height)?;
            match evaluate(src, &mut env)? {
                Value::List(items) if items.is_empty() => Ok(Vec::new()),
                value => value.as_points().ok_or_else(|| {
                    UndulateError::expression(format!(
                        "'{src}' does not evaluate to a list of (time, voltage) pairs"
                    ))
                }),
            }
        }
    }
}

/// `m` / `M`: metastability settling to the low (`m`) or high (`M`) rail.
pub(crate) fn meta(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h, sl) = (b.width, b.height, b.slewing);
    let to_one = symbol == 'M';
    if b.is_first {
        b.last_y = h / 2.0;
    }
    b.last_y = or_nan(b.last_y, h / 2.0);
    let rail = if to_one { 0.0 } else { h };
    b.end_y = rail;

    let dt = (b.last_y - h / 2.0).abs() * sl / h;
    let start = dt.trunc() as i64;
    let mut stop = (0.75 * w + 1.0).trunc() as i64;
    // keep an even number of samples so the wave ends on the same side
    if (stop - start).rem_euclid(2) == 1 {
        stop = (0.75 * w + 2.0).trunc() as i64;
    }
    let phase = if to_one { PI } else { 0.0 };

    let mut segments = vec![SplineSegment::move_by(0.0, b.last_y)];
    for (i, t) in (start..stop).enumerate() {
        let t = t as f64;
        let y = (1.0 + (2.0 * (t - w) / w).exp() * (phase + 8.0 * PI * t / w).sin()) * 0.5 * h;
        segments.push(if i == 0 {
            SplineSegment::line_to(t, y)
        } else {
            SplineSegment::cont(t, y)
        });
    }
    let (x, y) = segments
        .last()
        .map_or((0.0, b.last_y), |s| (s.x, s.y));
    let dist = (rail - y).abs();
    let dx = (dist * sl / h).max(dist);
    segments.extend([
        SplineSegment::curve_to(x + dx, rail),
        SplineSegment::cont(x + dx, rail),
        SplineSegment::cont(w, rail),
    ]);
    b.splines.push(Drawable::new("path", segments));
    Ok(b)
}

/// `c`: RC charge toward the evaluated level.
pub(crate) fn cap(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h, sl) = (b.width, b.height, b.slewing);
    let y = args.analogue.context.transform_y(eval_level(args)?, h);
    if b.is_first || b.last_y.is_nan() {
        b.last_y = h;
    }
    b.end_y = y;
    let dt = (y - b.last_y).abs() * sl / h;
    b.splines.push(Drawable::new(
        "path",
        vec![
            SplineSegment::move_by(0.0, b.last_y),
            SplineSegment::curve_to(dt, y),
            SplineSegment::cont(dt, y),
            SplineSegment::cont(w, y),
            SplineSegment::line_to(w, y),
        ],
    ));
    Ok(b)
}

/// `s`: linear ramp toward the evaluated level.
pub(crate) fn step(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h, sl) = (b.width, b.height, b.slewing);
    let y = args.analogue.context.transform_y(eval_level(args)?, h);
    if b.is_first || b.last_y.is_nan() {
        b.last_y = y;
    }
    b.end_y = y;
    let dt = (y - b.last_y).abs() * sl / h;
    b.paths.push(Drawable::new(
        "path",
        vec![Point::new(0.0, b.last_y), Point::new(dt, y), Point::new(w, y)],
    ));
    Ok(b)
}

/// `a`: arbitrary `(time, voltage)` samples.
pub(crate) fn analogue(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let h = b.height;
    let ctx = &args.analogue.context;
    let samples: Vec<Point> = eval_points(args)?
        .into_iter()
        .map(|(t, v)| Point::new(t, ctx.transform_y(v, h)))
        .collect();
    if b.is_first || b.last_y.is_nan() {
        b.last_y = samples.last().map_or(h, |p| p.y);
    }
    b.end_y = samples.last().map_or(b.last_y, |p| p.y);
    let mut points = Vec::with_capacity(samples.len() + 1);
    points.push(Point::new(0.0, b.last_y));
    points.extend(samples);
    b.paths.push(Drawable::new("path", points));
    Ok(b)
}

pub(crate) fn register_symbols(factory: &mut BrickFactory) {
    let family = |ctor: Constructor, equation: Option<Equation>| {
        let spec = SymbolSpec::new(ctor)
            .tags(&[Tag::Analogue])
            .param(Param::Slewing, ParamValue::Number(0.0))
            .param(Param::Period, ParamValue::Number(1.0));
        match equation {
            Some(eq) => spec.param(Param::Equation, ParamValue::Equation(eq)),
            None => spec,
        }
    };
    factory.register('m', family(meta, None));
    factory.register('M', family(meta, None));
    factory.register('c', family(cap, Some(Equation::Level(0.0))));
    factory.register('s', family(step, Some(Equation::Level(0.0))));
    factory.register('a', family(analogue, Some(Equation::Points(vec![(0.0, 0.0)]))));
}

#[cfg(test)]
#[path = "../../tests/unit/bricks/analogue.rs"]
mod tests;
