use super::*;
use crate::foundation::error::UndulateError;
use crate::layout::YStep;
use serde_json::json;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn canvas_leaves_room_for_the_longest_name() {
    let doc = json!({"a": {"wave": "01"}});
    let drawing = Undulate::default()
        .draw("root", &doc, &DrawOptions::default())
        .unwrap();
    assert!(close(drawing.canvas.offsetx, 0.667 * 16.0 + 8.0));
    assert_eq!(drawing.canvas.width, 80.0);
    assert_eq!(drawing.canvas.height, 25.0);
    assert_eq!(drawing.layout.offsetx, drawing.canvas.offsetx);
}

#[test]
fn each_draw_starts_from_a_clean_context() {
    let doc = json!({"a": {"wave": "01", "node": ".x"}, "b": {"wave": "10"}});
    let mut engine = Undulate::default();
    let first = engine.draw_svg(&doc, &DrawOptions::default()).unwrap();
    let second = engine.draw_svg(&doc, &DrawOptions::default()).unwrap();
    assert_eq!(first, second);
    assert_eq!(engine.context().y_steps(), &[YStep::Row(25.0), YStep::Row(25.0)]);
    assert_eq!(engine.context().nodes.len(), 1);
}

#[test]
fn document_config_wins_over_options() {
    let options = DrawOptions {
        hscale: 3.0,
        ..DrawOptions::default()
    };
    let doc = json!({"a": {"wave": "01"}, "config": {"hscale": 2}});
    let drawing = Undulate::default().draw("root", &doc, &options).unwrap();
    assert_eq!(drawing.layout.brick_width, 80.0);
    assert_eq!(drawing.canvas.width, 160.0);

    let doc = json!({"a": {"wave": "01"}});
    let drawing = Undulate::default().draw("root", &doc, &options).unwrap();
    assert_eq!(drawing.layout.brick_width, 120.0);
}

#[test]
fn options_deserialize_with_defaults() {
    let options: DrawOptions = serde_json::from_value(json!({"brick_width": 20})).unwrap();
    assert_eq!(options.brick_width, 20.0);
    assert_eq!(options.brick_height, 20.0);
    assert_eq!(options.separation, 0.25);
    assert!(!options.is_reg);
}

#[test]
fn register_rows_add_attribute_lines() {
    let doc = json!({"reg": [{"name": "EN", "attr": ["rw"]}, {"name": "MODE", "bits": 3}]});
    let options = DrawOptions {
        is_reg: true,
        ..DrawOptions::default()
    };
    let drawing = Undulate::default().draw("root", &doc, &options).unwrap();
    assert_eq!(drawing.layout.lanes().len(), 1);
    assert_eq!(drawing.canvas.width, 160.0);
    assert!(close(drawing.canvas.height, 25.0 + 2.0 * 1.5 * 9.0));
}

#[test]
fn svg_holds_lanes_and_edges() {
    let doc = json!({
        "a": {"wave": "01.", "node": ".x"},
        "b": {"wave": "1.0", "node": "..y"},
        "edges": ["x~>y t"]
    });
    let svg = draw_svg(&doc, &DrawOptions::default()).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("class=\"title\">a</text>"));
    assert!(svg.contains("class=\"title\">b</text>"));
    assert!(svg.contains("class=\"edge\""));
    assert!(svg.contains("class=\"edge-arrow\""));
    assert!(svg.contains(">t</text>"));
}

#[test]
fn unknown_symbol_aborts_the_draw() {
    let err = draw_svg(&json!({"a": {"wave": "0?1"}}), &DrawOptions::default()).unwrap_err();
    assert_eq!(err.exit_code(), 3);
    assert!(err.to_string().starts_with("unknown symbol"));
}

#[test]
fn oversized_inputs_fail_without_allocating() {
    let err = draw_svg(&json!({"sig": {"wave": "p", "repeat": 1e19}}), &DrawOptions::default())
        .unwrap_err();
    assert!(matches!(err, UndulateError::InvalidWave { .. }));

    let doc = json!({"v": {"wave": "a", "period": 1e6, "analogue": ["[(t, 0) for t in time]"]}});
    let err = draw_svg(&doc, &DrawOptions::default()).unwrap_err();
    assert!(matches!(err, UndulateError::Expression(_)));

    let reg = json!({"reg": [{"name": "X", "bits": 1_000_000}]});
    let options = DrawOptions {
        is_reg: true,
        ..DrawOptions::default()
    };
    assert_eq!(draw_svg(&reg, &options).unwrap_err().exit_code(), 5);
}

#[test]
fn json_dump_lists_the_bricks() {
    let out = compile_json(&json!({"a": {"wave": "01"}}), &DrawOptions::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let bricks = &value["layout"]["items"][0]["bricks"];
    assert_eq!(bricks.as_array().map(Vec::len), Some(2));
    assert_eq!(bricks[1]["x"], json!(40.0));
    assert_eq!(bricks[1]["symbol"], json!("1"));
}
