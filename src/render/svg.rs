use std::fmt::Write as _;

use crate::foundation::core::{Affine, ArrowDescription, Point, SplineSegment, SplineOrder, TextSpan};
use crate::foundation::error::UndulateResult;
use crate::render::renderer::{Content, Renderer, Style};
use crate::render::skin::{Skin, inline_css};

const ARROW_PATH: &str = "M-3.5 -3.5 L0 3.5 L3.5 -3.5 L0 -2 L-3.5 -3.5";

const DEFS: &str = r#"<defs>
<pattern id="diagonalHatch" width="5" height="5" patternTransform="rotate(45 0 0)" patternUnits="userSpaceOnUse">
<line x1="0" y1="0" x2="0" y2="5" style="stroke:black; stroke-width:1" />
</pattern>
<marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="7" markerHeight="7" markerUnits="userSpaceOnUse" orient="auto-start-reverse" style="fill:#00F;">
<path d="M 0 0 L 10 5 L 0 10 z" />
</marker>
<filter x="0" y="0" width="1" height="1" id="solid">
<feFlood flood-color="white"/>
<feComposite in="SourceGraphic"/>
</filter>
"#;

/// Extent of an SVG document.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Canvas {
    /// Left margin holding the signal names.
    pub offsetx: f64,
    /// Width of the drawing area, margin excluded.
    pub width: f64,
    /// Height of the document.
    pub height: f64,
}

impl Canvas {
    /// Width of the whole document.
    pub fn full_width(&self) -> f64 {
        self.width + self.offsetx + 2.0
    }
}

/// Reference backend producing an SVG document.
#[derive(Clone, Debug, Default)]
pub struct SvgRenderer {
    skin: Skin,
}

/// Shortest decimal form of `v`, three decimals at most.
pub fn num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    // no negative zero in the output
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

/// Escape the XML special characters of `s`.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

fn transform_attr(t: Affine) -> String {
    let [a, b, c, d, e, f] = t.as_coeffs();
    if (a, b, c, d) == (1.0, 0.0, 0.0, 1.0) {
        if (e, f) == (0.0, 0.0) {
            String::new()
        } else {
            format!(r#" transform="translate({}, {})""#, num(e), num(f))
        }
    } else {
        format!(
            r#" transform="matrix({} {} {} {} {} {})""#,
            num(a),
            num(b),
            num(c),
            num(d),
            num(e),
            num(f)
        )
    }
}

fn style_attr(style: Style<'_>) -> String {
    if style.overrides.is_empty() {
        String::new()
    } else {
        format!(r#" style="{}""#, escape(&inline_css(style.overrides)))
    }
}

impl SvgRenderer {
    /// Renderer drawing with `skin`.
    pub fn new(skin: Skin) -> Self {
        Self { skin }
    }

    /// Full document around `body`: style sheet, pattern and mask definitions.
    pub fn document(&self, canvas: &Canvas, body: &str) -> String {
        let full_width = canvas.full_width();
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="-1 -1 {w} {vh}">"#,
            w = num(full_width),
            h = num(canvas.height),
            vh = num(canvas.height + 2.0),
        );
        out.push_str("<style>\n");
        out.push_str(&self.skin.to_css());
        out.push_str(".wave {mask: url(#wavezone);}\n");
        out.push_str("</style>\n");
        out.push_str(DEFS);
        let _ = writeln!(
            out,
            r#"<mask id="wavezone"><rect x="-{o}" y="-8" width="{o}" height="{h}" fill="black" /><rect x="0" y="-8" width="{w}" height="{h}" fill="white" /></mask>"#,
            o = canvas.offsetx.trunc(),
            w = canvas.width.trunc(),
            h = canvas.height.trunc(),
        );
        out.push_str("</defs>\n");
        out.push_str(body);
        out.push_str("</svg>\n");
        out
    }
}

impl Renderer for SvgRenderer {
    fn skin(&self) -> &Skin {
        &self.skin
    }

    fn group(
        &self,
        id: &str,
        class: Option<&str>,
        transform: Affine,
        content: Content<'_>,
    ) -> UndulateResult<String> {
        let class = class.map_or_else(String::new, |c| format!(r#" class="{}""#, escape(c)));
        Ok(format!(
            "<g id=\"{}\"{class}{}>\n{}</g>\n",
            escape(id),
            transform_attr(transform),
            content()?
        ))
    }

    fn symbol(&self, symbol: char, transform: Affine, content: &str) -> String {
        format!(
            "<g data-symbol=\"{}\"{}>\n{content}</g>\n",
            escape(&symbol.to_string()),
            transform_attr(transform)
        )
    }

    fn path(&self, points: &[Point], style: Style<'_>) -> String {
        let mut d = String::new();
        for (i, p) in points.iter().enumerate() {
            let order = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{order}{},{} ", num(p.x), num(p.y));
        }
        format!(
            "<path d=\"{}\" class=\"{}\"{} />\n",
            d.trim_end(),
            escape(style.class),
            style_attr(style)
        )
    }

    fn polygon(&self, points: &[Point], style: Style<'_>) -> String {
        let mut pts = String::new();
        for p in points {
            let _ = write!(pts, "{},{} ", num(p.x), num(p.y));
        }
        format!(
            "<polygon points=\"{}\" class=\"{}\"{} />\n",
            pts.trim_end(),
            escape(style.class),
            style_attr(style)
        )
    }

    fn spline(&self, segments: &[SplineSegment], style: Style<'_>) -> String {
        let mut d = String::new();
        for s in segments {
            if s.order == SplineOrder::Close {
                d.push_str("z ");
            } else {
                let _ = write!(d, "{}{},{} ", s.order.letter(), num(s.x), num(s.y));
            }
        }
        format!(
            "<path d=\"{}\" class=\"{}\"{} />\n",
            d.trim_end(),
            escape(style.class),
            style_attr(style)
        )
    }

    fn arrow(&self, arrow: &ArrowDescription, style: Style<'_>) -> String {
        format!(
            "<path d=\"{ARROW_PATH}\" transform=\"translate({}, {}) rotate({}, 0, 0)\" class=\"{}\"{} />\n",
            num(arrow.x),
            num(arrow.y),
            num(arrow.angle - 90.0),
            escape(style.class),
            style_attr(style)
        )
    }

    fn text(&self, span: &TextSpan, style: Style<'_>) -> String {
        format!(
            "<text x=\"{}\" y=\"{}\" class=\"{}\"{}>{}</text>\n",
            num(span.x),
            num(span.y),
            escape(style.class),
            style_attr(style),
            escape(&span.text)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
