use super::*;
use serde_json::json;

fn frame() -> Frame {
    Frame {
        xmin: 50.0,
        width: 400.0,
        height: 120.0,
        brick_width: 40.0,
        brick_height: 20.0,
    }
}

fn annotation(value: serde_json::Value) -> Annotation {
    serde_json::from_value(value).unwrap()
}

fn ctx_with_nodes() -> RenderContext {
    let mut ctx = RenderContext::new();
    ctx.register_y_step(25.0, false);
    ctx.register_y_step(25.0, false);
    ctx.nodes.insert("a", Point::new(80.0, 10.0));
    ctx.nodes.insert("b", Point::new(160.0, 35.0));
    ctx
}

#[test]
fn lone_target_becomes_a_pointer() {
    let ctx = ctx_with_nodes();
    let a = annotation(json!({"to": "a", "text": "ab"}));
    let deco = decorate(&a, &frame(), &ctx, &Skin::default()).unwrap();
    let styles: Vec<_> = deco.marks.iter().map(Mark::style).collect();
    assert_eq!(styles, ["edge", "edge-arrow", "edge-background", "edge-text"]);
    let Mark::Spline(line) = &deco.marks[0] else {
        panic!("expected the connector");
    };
    assert_eq!((line.object[0].x, line.object[0].y), (110.0, 10.0));
    assert_eq!((line.object[1].x, line.object[1].y), (130.0, 10.0));
    let Mark::Text(text) = &deco.marks[3] else {
        panic!("expected the label");
    };
    // two glyphs of 0.75em shift the label left by 12px
    assert_eq!((text.object.x, text.object.y), (108.0, 10.0));
}

#[test]
fn edges_follow_the_annotations() {
    let ctx = ctx_with_nodes();
    let mut group = Group::default();
    group.annotations.push(annotation(json!({"shape": "||", "x": 2})));
    group.edges.push("a~>b late".into());
    let decos = annotate(&group, &frame(), &ctx, &Skin::default()).unwrap();
    assert_eq!(decos.len(), 2);
    assert_eq!(decos[0].marks.len(), 3);
    let styles: Vec<_> = decos[1].marks.iter().map(Mark::style).collect();
    assert_eq!(styles, ["edge", "edge-arrow", "edge-background", "edge-text"]);
}

#[test]
fn group_without_annotations_draws_nothing() {
    let decos = annotate(&Group::default(), &frame(), &RenderContext::new(), &Skin::default());
    assert!(decos.unwrap().is_empty());
}

#[test]
fn plain_dash_without_points_is_a_horizontal_rule() {
    let ctx = ctx_with_nodes();
    let a = annotation(json!({"shape": "-", "y": 1.5}));
    let deco = decorate(&a, &frame(), &ctx, &Skin::default()).unwrap();
    let Mark::Spline(rule) = &deco.marks[0] else {
        panic!("expected a rule");
    };
    assert_eq!(rule.style, "path");
    assert_eq!((rule.object[0].x, rule.object[0].y), (50.0, 35.0));
    assert_eq!((rule.object[1].x, rule.object[1].y), (450.0, 35.0));

    let a = annotation(json!({"shape": "-", "from": 1, "to": 3, "y": 0}));
    let deco = decorate(&a, &frame(), &ctx, &Skin::default()).unwrap();
    let Mark::Spline(rule) = &deco.marks[0] else {
        panic!("expected a rule");
    };
    assert_eq!(rule.object[0].x, 90.0);
    assert_eq!(rule.object[1].x, 170.0);
}

#[test]
fn plain_dash_between_nodes_is_a_straight_edge() {
    let ctx = ctx_with_nodes();
    let a = annotation(json!({"shape": "-", "from": "a", "to": "b"}));
    let deco = decorate(&a, &frame(), &ctx, &Skin::default()).unwrap();
    assert_eq!(deco.marks.len(), 1);
    assert_eq!(deco.marks[0].style(), "edge");
}

#[test]
fn vertical_rule_spans_the_image_by_default() {
    let ctx = ctx_with_nodes();
    let a = annotation(json!({"shape": "|", "x": 2}));
    let deco = decorate(&a, &frame(), &ctx, &Skin::default()).unwrap();
    let Mark::Spline(rule) = &deco.marks[0] else {
        panic!("expected a rule");
    };
    assert_eq!((rule.object[0].x, rule.object[0].y), (130.0, 0.0));
    assert_eq!((rule.object[1].x, rule.object[1].y), (130.0, 120.0));
}

#[test]
fn free_text_is_placed_on_the_grid() {
    let ctx = ctx_with_nodes();
    let a = annotation(json!({"text": "note", "x": 1, "y": 1, "text_background": false}));
    let deco = decorate(&a, &frame(), &ctx, &Skin::default()).unwrap();
    assert_eq!(deco.marks.len(), 1);
    let Mark::Text(text) = &deco.marks[0] else {
        panic!("expected a label");
    };
    assert_eq!((text.object.x, text.object.y), (90.0, 25.0));
}

#[test]
fn annotation_styles_are_carried() {
    let ctx = ctx_with_nodes();
    let a = annotation(json!({"shape": "<->", "from": "a", "to": "b", "stroke": "red"}));
    let deco = decorate(&a, &frame(), &ctx, &Skin::default()).unwrap();
    assert_eq!(deco.styles.get("stroke").map(String::as_str), Some("red"));
    assert_eq!(deco.marks.len(), 3);
}

#[test]
fn unknown_shape_is_fatal() {
    let ctx = ctx_with_nodes();
    let a = annotation(json!({"shape": "=>", "from": "a", "to": "b"}));
    let err = decorate(&a, &frame(), &ctx, &Skin::default()).unwrap_err();
    assert!(matches!(err, UndulateError::Annotation(_)));
}
