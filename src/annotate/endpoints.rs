use crate::expression::{Environment, Value, evaluate};
use crate::foundation::core::Point;
use crate::foundation::error::{UndulateError, UndulateResult};
use crate::layout::RenderContext;
use crate::scene::Endpoint;

/// Drawing area and slot metrics used to resolve endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Left margin reserved for names.
    pub xmin: f64,
    /// Width of the drawing area.
    pub width: f64,
    /// Height of the drawing area.
    pub height: f64,
    /// Width of one slot.
    pub brick_width: f64,
    /// Height of one row.
    pub brick_height: f64,
}

/// A resolved endpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resolved {
    /// A bare index, interpreted by the shape.
    Scalar(f64),
    /// A position in the drawing area, before the name margin.
    Point(Point),
}

impl Resolved {
    /// The point, if the endpoint resolved to one.
    pub fn point(self) -> Option<Point> {
        match self {
            Self::Point(p) => Some(p),
            Self::Scalar(_) => None,
        }
    }

    /// The bare index, if the endpoint resolved to one.
    pub fn scalar(self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Point(_) => None,
        }
    }
}

/// Resolve the `from` / `to` value of an annotation.
///
/// Numbers stay indices. A `(brick, row)` pair is scaled by the slot size,
/// the row going through [`RenderContext::adjust_y`]. Strings name a node,
/// hold an `"x, y"` pair, or an arithmetic expression.
pub fn from_to_parser(
    endpoint: Option<&Endpoint>,
    frame: &Frame,
    ctx: &RenderContext,
) -> UndulateResult<Option<Resolved>> {
    let pair = |x: f64, y: f64| {
        Resolved::Point(Point::new(
            x * frame.brick_width,
            ctx.adjust_y(y, frame.brick_height),
        ))
    };
    let text = match endpoint {
        None => return Ok(None),
        Some(Endpoint::Scalar(v)) => return Ok(Some(Resolved::Scalar(*v))),
        Some(Endpoint::Pair(x, y)) => return Ok(Some(pair(*x, *y))),
        Some(Endpoint::Text(s)) if s.trim().is_empty() => return Ok(None),
        Some(Endpoint::Text(s)) => s.trim(),
    };
    if let Some(node) = ctx.nodes.get(text) {
        return Ok(Some(Resolved::Point(node)));
    }

    // a bare `x, y` pair is a tuple
    let source = if text.contains(',') {
        format!("({text})")
    } else {
        text.to_owned()
    };
    let mut env = Environment::default();
    match evaluate(&source, &mut env) {
        Ok(Value::List(items)) if items.len() == 2 => {
            if let (Some(x), Some(y)) = (items[0].as_number(), items[1].as_number()) {
                return Ok(Some(pair(x, y)));
            }
        }
        Ok(value) => {
            if let Some(v) = value.as_number() {
                return Ok(Some(Resolved::Scalar(v)));
            }
        }
        Err(err) => tracing::trace!(endpoint = text, error = %err, "not an expression"),
    }

    if let Some((x, y)) = text.split_once(',') {
        return positional(x, y, frame, ctx)
            .map(|p| Some(Resolved::Point(p)))
            .ok_or_else(|| UndulateError::annotation(format!("cannot resolve endpoint '{text}'")));
    }
    Err(UndulateError::annotation(format!(
        "unknown node or invalid endpoint '{text}'"
    )))
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Unit {
    Rows,
    Percent,
    Offset(f64),
}

// `<number>` followed by `%` or a signed offset
fn component(s: &str) -> Option<(f64, Unit)> {
    let s = s.trim();
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let value: f64 = s[..end].parse().ok()?;
    let rest = s[end..].trim();
    let unit = if rest.is_empty() {
        Unit::Rows
    } else if rest == "%" {
        Unit::Percent
    } else if let Some(sign) = rest.strip_prefix('+') {
        Unit::Offset(sign.trim().parse().ok()?)
    } else if let Some(sign) = rest.strip_prefix('-') {
        Unit::Offset(-sign.trim().parse::<f64>().ok()?)
    } else {
        return None;
    };
    Some((value, unit))
}

fn positional(x: &str, y: &str, frame: &Frame, ctx: &RenderContext) -> Option<Point> {
    let (x, x_unit) = component(x)?;
    let (y, y_unit) = component(y)?;
    let x = match x_unit {
        Unit::Percent => x * frame.width / 100.0,
        _ => x * frame.brick_width,
    };
    let y = match y_unit {
        Unit::Percent => y * frame.height / 100.0,
        Unit::Rows => ctx.adjust_y(y, frame.brick_height),
        Unit::Offset(off) => ctx.adjust_y(y, frame.brick_height) + off * frame.brick_height,
    };
    Some(Point::new(x, y))
}

#[cfg(test)]
#[path = "../../tests/unit/annotate/endpoints.rs"]
mod tests;
