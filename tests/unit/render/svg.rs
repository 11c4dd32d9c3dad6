use super::*;
use crate::scene::StyleOverrides;

fn plain(class: &str) -> (String, StyleOverrides) {
    (class.to_owned(), StyleOverrides::new())
}

#[test]
fn numbers_are_short() {
    assert_eq!(num(37.0), "37");
    assert_eq!(num(29.4), "29.4");
    assert_eq!(num(1.0 / 3.0), "0.333");
    assert_eq!(num(-0.0001), "0");
}

#[test]
fn text_is_escaped() {
    let r = SvgRenderer::default();
    let (class, none) = plain("data");
    let out = r.text(&TextSpan::new(1.0, 2.0, "a<b & 'c'"), Style::new(&class, &none));
    assert_eq!(
        out,
        "<text x=\"1\" y=\"2\" class=\"data\">a&lt;b &amp; &#x27;c&#x27;</text>\n"
    );
}

#[test]
fn path_starts_with_a_move() {
    let r = SvgRenderer::default();
    let (class, none) = plain("path");
    let out = r.path(
        &[Point::new(0.0, 20.0), Point::new(3.0, 0.0), Point::new(40.0, 0.0)],
        Style::new(&class, &none),
    );
    assert_eq!(out, "<path d=\"M0,20 L3,0 L40,0\" class=\"path\" />\n");
}

#[test]
fn spline_keeps_orders_and_closes() {
    let r = SvgRenderer::default();
    let (class, none) = plain("edge-arrow");
    let out = r.spline(
        &[
            SplineSegment::move_to(0.0, 0.0),
            SplineSegment::curve_to(1.0, 1.0),
            SplineSegment::cont(2.0, 2.0),
            SplineSegment::cont(3.0, 3.0),
            SplineSegment::close(),
        ],
        Style::new(&class, &none),
    );
    assert!(out.starts_with("<path d=\"M0,0 C1,1 2,2 3,3 z\""));
}

#[test]
fn arrow_glyph_is_rotated_a_quarter_back() {
    let r = SvgRenderer::default();
    let (class, none) = plain("arrow");
    let out = r.arrow(
        &ArrowDescription {
            x: 10.0,
            y: 5.0,
            angle: 90.0,
        },
        Style::new(&class, &none),
    );
    assert!(out.contains("transform=\"translate(10, 5) rotate(0, 0, 0)\""));
    assert!(out.contains(ARROW_PATH));
}

#[test]
fn overrides_become_inline_style() {
    let r = SvgRenderer::default();
    let mut overrides = StyleOverrides::new();
    overrides.insert("fill".into(), "#F00".into());
    let out = r.polygon(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)], Style::new("hatch", &overrides));
    assert_eq!(
        out,
        "<polygon points=\"0,0 1,1\" class=\"hatch\" style=\"fill: #F00;\" />\n"
    );
}

#[test]
fn groups_carry_their_transform() {
    let r = SvgRenderer::default();
    let out = r
        .group("lane", Some("wave"), Affine::translate((5.0, 10.0)), &mut || {
            Ok("x".to_owned())
        })
        .unwrap();
    assert_eq!(out, "<g id=\"lane\" class=\"wave\" transform=\"translate(5, 10)\">\nx</g>\n");
    let out = r
        .group("root", None, Affine::IDENTITY, &mut || Ok(String::new()))
        .unwrap();
    assert_eq!(out, "<g id=\"root\">\n</g>\n");
}

#[test]
fn document_declares_style_and_mask() {
    let r = SvgRenderer::default();
    let canvas = Canvas {
        offsetx: 58.0,
        width: 160.0,
        height: 50.0,
    };
    let doc = r.document(&canvas, "<g id=\"body\"></g>\n");
    assert!(doc.starts_with(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"220\" height=\"50\" viewBox=\"-1 -1 220 52\">"
    ));
    assert!(doc.contains(".wave {mask: url(#wavezone);}"));
    assert!(doc.contains("<pattern id=\"diagonalHatch\""));
    assert!(doc.contains("<rect x=\"-58\" y=\"-8\" width=\"58\" height=\"50\" fill=\"black\" />"));
    assert!(doc.contains(".edge-arrow {"));
    assert!(doc.trim_end().ends_with("<g id=\"body\"></g>\n</svg>"));
}
