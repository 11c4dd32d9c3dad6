use crate::annotate::{Decoration, Mark};
use crate::foundation::core::{Affine, ArrowDescription, Point, Rect, SplineSegment, TextSpan};
use crate::foundation::error::UndulateResult;
use crate::layout::{CompiledLane, GroupItem, GroupLayout, PlacedBrick, Ticks};
use crate::render::Skin;
use crate::scene::{StyleOverrides, is_spacer};

/// Style of one primitive: a skin selector and inline overrides.
#[derive(Clone, Copy, Debug)]
pub struct Style<'a> {
    /// Skin selector.
    pub class: &'a str,
    /// Inline overrides, drawn after the selector rules.
    pub overrides: &'a StyleOverrides,
}

impl<'a> Style<'a> {
    /// Style of `class` with `overrides`.
    pub fn new(class: &'a str, overrides: &'a StyleOverrides) -> Self {
        Self { class, overrides }
    }
}

/// Lazily produced content of a group.
pub type Content<'a> = &'a mut dyn FnMut() -> UndulateResult<String>;

/// Drawing backend.
///
/// Backends implement the primitives; the default methods walk bricks,
/// lanes, groups and decorations in terms of those primitives. Every method
/// returns a fragment of the output document.
pub trait Renderer {
    /// Style sheet of the backend.
    fn skin(&self) -> &Skin;

    /// Transform moving content by `(x, y)`.
    fn translate(&self, x: f64, y: f64) -> Affine {
        Affine::translate((x, y))
    }

    /// Wrap the content produced by `content` in a group.
    fn group(
        &self,
        id: &str,
        class: Option<&str>,
        transform: Affine,
        content: Content<'_>,
    ) -> UndulateResult<String>;

    /// Wrap the primitives of one brick.
    fn symbol(&self, symbol: char, transform: Affine, content: &str) -> String;

    /// Open polyline.
    fn path(&self, points: &[Point], style: Style<'_>) -> String;

    /// Closed filled outline.
    fn polygon(&self, points: &[Point], style: Style<'_>) -> String;

    /// Curve in path notation.
    fn spline(&self, segments: &[SplineSegment], style: Style<'_>) -> String;

    /// Arrowhead placed and rotated by `arrow`.
    fn arrow(&self, arrow: &ArrowDescription, style: Style<'_>) -> String;

    /// Text anchored at the span position.
    fn text(&self, span: &TextSpan, style: Style<'_>) -> String;

    /// Estimated box of `text` drawn with `class`, centered on the origin.
    fn text_bbox(&self, class: &str, text: &str, overrides: &StyleOverrides) -> Rect {
        self.skin().text_bbox(class, text, overrides)
    }

    /// Every primitive of a brick, background first.
    fn brick(&self, placed: &PlacedBrick, overrides: &StyleOverrides) -> String {
        let b = &placed.brick;
        let mut content = String::new();
        for polygon in &b.polygons {
            content.push_str(&self.polygon(&polygon.object, Style::new(&polygon.style, overrides)));
        }
        for path in &b.paths {
            content.push_str(&self.path(&path.object, Style::new(&path.style, overrides)));
        }
        for arrow in &b.arrows {
            content.push_str(&self.arrow(&arrow.object, Style::new(&arrow.style, overrides)));
        }
        for spline in &b.splines {
            content.push_str(&self.spline(&spline.object, Style::new(&spline.style, overrides)));
        }
        for span in &b.texts {
            content.push_str(&self.text(&span.object, Style::new(&span.style, overrides)));
        }
        self.symbol(b.symbol, self.translate(placed.x, 0.0), &content)
    }

    /// Name printed left of a lane; spacers have none.
    fn wavelane_title(&self, lane: &CompiledLane) -> String {
        if lane.name.is_empty() || is_spacer(&lane.name) {
            return String::new();
        }
        let span = TextSpan::new(-10.0, lane.height / 2.0, lane.name.clone());
        self.text(&span, Style::new("title", &lane.styles))
    }

    /// A lane drawn at `offsetx`, its bricks clipped to the wave zone.
    fn wavelane(&self, id: &str, lane: &CompiledLane, offsetx: f64) -> UndulateResult<String> {
        self.group(id, None, self.translate(offsetx, lane.y), &mut || {
            let mut out = self.wavelane_title(lane);
            out.push_str(&self.group(
                &format!("{id}_bricks"),
                Some("wave"),
                Affine::IDENTITY,
                &mut || {
                    Ok(lane
                        .bricks
                        .iter()
                        .map(|b| self.brick(b, &lane.styles))
                        .collect())
                },
            )?);
            Ok(out)
        })
    }

    /// Dotted vertical rule at every slot.
    fn ticks(&self, ticks: &Ticks) -> UndulateResult<String> {
        let none = StyleOverrides::new();
        self.group(
            &format!("ticks_{}", ticks.id),
            None,
            self.translate(ticks.x, 0.0),
            &mut || {
                Ok(ticks
                    .positions()
                    .map(|x| {
                        self.path(
                            &[Point::new(x, 0.0), Point::new(x, ticks.height)],
                            Style::new("tick", &none),
                        )
                    })
                    .collect())
            },
        )
    }

    /// Ticks, title, separator and children of a laid out group.
    fn wavegroup(&self, layout: &GroupLayout) -> UndulateResult<String> {
        let none = StyleOverrides::new();
        let id = if layout.name.is_empty() {
            format!("wavegroup_{}", layout.id)
        } else {
            layout.name.clone()
        };
        self.group(&id, None, Affine::IDENTITY, &mut || {
            let mut out = String::new();
            if let Some(ticks) = &layout.ticks {
                out.push_str(&self.ticks(ticks)?);
            }
            if let Some(title) = &layout.title {
                let class = format!("h{}", layout.depth);
                out.push_str(&self.text(title, Style::new(&class, &none)));
            }
            if let Some(line) = &layout.separator {
                out.push_str(&self.path(line, Style::new("border", &none)));
            }
            for (i, item) in layout.items.iter().enumerate() {
                match item {
                    GroupItem::Lane(lane) => {
                        let id = format!("wavelane_{}_{i}", layout.id);
                        out.push_str(&self.wavelane(&id, lane, layout.offsetx)?);
                    }
                    GroupItem::Group(sub) => out.push_str(&self.wavegroup(sub)?),
                }
            }
            Ok(out)
        })
    }

    /// Edges and annotations, in declaration order.
    fn decorations(&self, decorations: &[Decoration]) -> String {
        let mut out = String::new();
        for deco in decorations {
            for mark in &deco.marks {
                let overrides = deco.styles_for(mark);
                let style = Style::new(mark.style(), &overrides);
                out.push_str(&match mark {
                    Mark::Spline(d) => self.spline(&d.object, style),
                    Mark::Polygon(d) => self.polygon(&d.object, style),
                    Mark::Arrow(d) => self.arrow(&d.object, style),
                    Mark::Text(d) => self.text(&d.object, style),
                });
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
