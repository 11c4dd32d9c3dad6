use super::*;
use crate::annotate::{Decoration, Mark, compressor};
use crate::bricks::{Brick, BrickArgs};
use crate::foundation::core::Drawable;
use crate::layout::{GroupOptions, RenderContext, WavegroupCompiler, WavelaneCompiler};
use crate::render::SvgRenderer;
use crate::scene::Group;
use serde_json::json;

fn layout(value: serde_json::Value) -> GroupLayout {
    let g = Group::from_value("root", &value).unwrap();
    let lanes = WavelaneCompiler::standard();
    let skin = Skin::default();
    WavegroupCompiler {
        lanes: &lanes,
        skin: &skin,
    }
    .compile_wavegroup(&g, 1, 0.0, &GroupOptions::default(), &mut RenderContext::new())
    .unwrap()
}

fn lane(name: &str) -> CompiledLane {
    CompiledLane {
        name: name.to_owned(),
        y: 0.0,
        height: 20.0,
        bricks: Vec::new(),
        styles: StyleOverrides::new(),
    }
}

#[test]
fn brick_draws_background_before_lines() {
    let mut brick = Brick::new('x', &BrickArgs::default());
    brick.texts.push(Drawable::new("data", TextSpan::new(1.0, 2.0, "v")));
    brick.paths.push(Drawable::new("path", vec![Point::ZERO, Point::new(1.0, 0.0)]));
    brick.polygons.push(Drawable::new("hatch", vec![Point::ZERO, Point::new(1.0, 1.0)]));
    let placed = PlacedBrick { x: 40.0, brick };
    let out = SvgRenderer::default().brick(&placed, &StyleOverrides::new());
    assert!(out.starts_with("<g data-symbol=\"x\" transform=\"translate(40, 0)\">"));
    let polygon = out.find("<polygon").unwrap();
    let path = out.find("<path").unwrap();
    let text = out.find("<text").unwrap();
    assert!(polygon < path && path < text);
}

#[test]
fn spacers_have_no_title() {
    let r = SvgRenderer::default();
    assert!(r.wavelane_title(&lane("spacer")).is_empty());
    assert!(r.wavelane_title(&lane("")).is_empty());
    assert_eq!(
        r.wavelane_title(&lane("clk")),
        "<text x=\"-10\" y=\"10\" class=\"title\">clk</text>\n"
    );
}

#[test]
fn lane_bricks_are_masked() {
    let out = SvgRenderer::default()
        .wavelane("lane_0", &lane("clk"), 30.0)
        .unwrap();
    assert!(out.starts_with("<g id=\"lane_0\" transform=\"translate(30, 0)\">"));
    assert!(out.contains("<g id=\"lane_0_bricks\" class=\"wave\">"));
}

#[test]
fn one_tick_per_slot() {
    let out = SvgRenderer::default()
        .wavegroup(&layout(json!({"a": {"wave": "0101"}})))
        .unwrap();
    assert_eq!(out.matches("class=\"tick\"").count(), 4);
    assert!(out.find("ticks_").unwrap() < out.find("wavelane_").unwrap());
}

#[test]
fn nested_groups_render_their_title_and_border() {
    let out = SvgRenderer::default()
        .wavegroup(&layout(json!({"a": {"wave": "0"}, "grp": {"b": {"wave": "1"}}})))
        .unwrap();
    assert!(out.contains("<g id=\"grp\">"));
    assert!(out.contains("class=\"h2\">grp</text>"));
    assert_eq!(out.matches("class=\"border\"").count(), 1);
    assert_eq!(out.matches("class=\"wave\"").count(), 2);
}

#[test]
fn fixed_styles_ignore_annotation_overrides() {
    let mut styles = StyleOverrides::new();
    styles.insert("stroke".into(), "red".into());
    let mut marks = compressor(10.0, 0.0, 40.0);
    marks.push(Mark::Text(Drawable::new("edge-text", TextSpan::new(0.0, 0.0, "t"))));
    let out = SvgRenderer::default().decorations(&[Decoration { marks, styles }]);
    assert_eq!(out.matches("style=\"stroke: red;\"").count(), 1);
    assert!(out.contains("class=\"hide\" />"));
    assert!(out.contains("class=\"edge-text\" style=\"stroke: red;\">t</text>"));
}
