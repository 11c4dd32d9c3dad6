//! Edges and annotations drawn over the laid out wavelanes.
//!
//! Edge strings are first turned into annotations. Each annotation resolves
//! its endpoints against the node bank and the row table of the draw, then
//! yields a [`Decoration`]: the primitives of its shape, markers and label.

pub(crate) mod edges;
pub(crate) mod endpoints;
pub(crate) mod shapes;

use crate::foundation::core::{Drawable, Point, TextSpan};
use crate::foundation::error::{UndulateError, UndulateResult};
use crate::layout::RenderContext;
use crate::render::Skin;
use crate::render::skin::EM;
use crate::scene::{Annotation, Group};

pub use edges::{EdgeSpec, parse_edge};
pub use endpoints::{Frame, Resolved, from_to_parser};
pub use shapes::{Body, Connector, ConnectorPath, Decoration, Mark, Marker, compressor, marker};

/// Decorations of every edge and annotation declared at the root of `group`.
///
/// Edges are appended after the annotations. Endpoints refer to nodes
/// registered in `ctx` by the layout of the same draw.
#[tracing::instrument(level = "debug", skip_all, fields(group = %group.name))]
pub fn annotate(
    group: &Group,
    frame: &Frame,
    ctx: &RenderContext,
    skin: &Skin,
) -> UndulateResult<Vec<Decoration>> {
    let mut annotations = group.annotations.clone();
    for edge in &group.edges {
        annotations.push(parse_edge(edge)?.into_annotation());
    }
    if annotations.is_empty() {
        return Ok(Vec::new());
    }
    tracing::debug!(count = annotations.len(), nodes = ctx.nodes.len(), "annotate");
    annotations
        .iter()
        .map(|a| decorate(a, frame, ctx, skin))
        .collect()
}

/// Geometry of a single annotation.
pub fn decorate(
    annotation: &Annotation,
    frame: &Frame,
    ctx: &RenderContext,
    skin: &Skin,
) -> UndulateResult<Decoration> {
    let styles = annotation.styles();
    let bw = frame.brick_width;
    let bh = frame.brick_height;
    let start = from_to_parser(annotation.from.as_ref(), frame, ctx)?;
    let end = from_to_parser(annotation.to.as_ref(), frame, ctx)?;
    let mut dx = annotation.dx * bw;
    let dy = ctx.adjust_y(annotation.dy, bh);

    let mut s = start.and_then(Resolved::point).unwrap_or(Point::ZERO);
    let e = end.and_then(Resolved::point).unwrap_or(Point::ZERO);
    let mut shape = annotation.shape.clone();
    // a lone `to` points at its node from half a brick on the left
    if s == Point::ZERO && e != Point::ZERO {
        s = Point::new(e.x - bw / 2.0, e.y);
        let font = skin.font_size("edge-text", &styles, EM);
        dx = -(annotation.text.chars().count() as f64) / 2.0 * font;
        shape = Some("->".to_owned());
    }
    let s = Point::new(s.x + frame.xmin, s.y);
    let e = Point::new(e.x + frame.xmin, e.y);

    let mut marks = Vec::new();
    let Some(shape) = shape else {
        if !annotation.text.is_empty() {
            let at = Point::new(
                frame.xmin + annotation.x * bw,
                ctx.adjust_y(annotation.y, bh),
            );
            label(&mut marks, annotation, at, skin);
        }
        return Ok(Decoration { marks, styles });
    };

    let points_given = start.and_then(Resolved::point).is_some()
        || end.and_then(Resolved::point).is_some();
    let scalar_y = |r: Option<Resolved>, default: f64| {
        r.and_then(Resolved::scalar)
            .map_or(default, |v| ctx.adjust_y(v, bh))
    };
    let mut middle = s.midpoint(e);
    match shape.as_str() {
        "-" if !points_given => {
            let y = ctx.adjust_y(annotation.y, bh);
            let x1 = frame.xmin + start.and_then(Resolved::scalar).map_or(0.0, |v| v * bw);
            let x2 = frame.xmin
                + end
                    .and_then(Resolved::scalar)
                    .map_or(frame.width, |v| v * bw);
            marks.push(shapes::rule(Point::new(x1, y), Point::new(x2, y)));
        }
        "|" => {
            let x = frame.xmin + annotation.x * bw;
            let y1 = scalar_y(start, 0.0);
            let y2 = scalar_y(end, frame.height);
            marks.push(shapes::rule(Point::new(x, y1), Point::new(x, y2)));
        }
        "||" => {
            let x = frame.xmin + annotation.x * bw;
            marks.extend(compressor(x, scalar_y(start, 0.0), scalar_y(end, frame.height)));
        }
        other => {
            let connector = Connector::parse(other).ok_or_else(|| {
                UndulateError::annotation(format!("unknown annotation shape '{other}'"))
            })?;
            let path = connector.path(s, e);
            marks.push(Mark::Spline(Drawable::new("edge", path.segments)));
            if let Some(m) = connector.start {
                marks.push(marker(m, s, path.start_direction));
            }
            if let Some(m) = connector.end {
                marks.push(marker(m, e, path.end_direction));
            }
            middle = path.middle;
        }
    }

    if !annotation.text.is_empty() {
        label(
            &mut marks,
            annotation,
            Point::new(middle.x + dx, middle.y + dy),
            skin,
        );
    }
    Ok(Decoration { marks, styles })
}

fn label(marks: &mut Vec<Mark>, annotation: &Annotation, at: Point, skin: &Skin) {
    if annotation.text_background {
        let bbox = skin.text_bbox("edge-text", &annotation.text, &annotation.styles());
        marks.push(shapes::text_background(at, bbox));
    }
    marks.push(Mark::Text(Drawable::new(
        "edge-text",
        TextSpan::new(at.x, at.y, annotation.text.clone()),
    )));
}

#[cfg(test)]
#[path = "../../tests/unit/annotate/mod.rs"]
mod tests;
