use super::*;
use serde_json::json;

fn root(doc: Value) -> Group {
    Group::from_value("root", &doc).unwrap()
}

#[test]
fn entries_are_classified_in_document_order() {
    let g = root(json!({
        "clk": {"wave": "p..."},
        "spacer": {},
        "anchors": {"node": ".a.b"},
        "bus": {"dat": {"wave": "=.=", "data": "x y"}},
        "config": {"hscale": 2},
        "head": {"text": "ignored"}
    }));
    assert_eq!(g.entries.len(), 4);
    assert!(matches!(&g.entries[0], Entry::Lane(l) if l.name == "clk"));
    assert!(matches!(&g.entries[1], Entry::Spacer(_)));
    assert!(matches!(&g.entries[2], Entry::Spacer(l) if l.node.as_deref() == Some(".a.b")));
    assert!(matches!(&g.entries[3], Entry::Group(sub) if sub.entries.len() == 1));
    assert_eq!(g.config.hscale, Some(2.0));
}

#[test]
fn singular_keys_broadcast_and_plural_keys_sequence() {
    let g = root(json!({
        "a": {"wave": "pp", "period": 2, "duty_cycles": [0.2, 0.8], "slewing": 4}
    }));
    let Entry::Lane(lane) = &g.entries[0] else {
        panic!("expected a lane");
    };
    assert_eq!(
        lane.params[&Param::Period],
        ParamSupply::Broadcast(ParamValue::Number(2.0))
    );
    assert_eq!(
        lane.params[&Param::DutyCycle],
        ParamSupply::Sequence(vec![ParamValue::Number(0.2), ParamValue::Number(0.8)])
    );
    assert_eq!(lane.number(Param::Slewing), Some(4.0));
}

#[test]
fn data_string_splits_on_spaces() {
    let g = root(json!({"d": {"wave": "=.=", "data": "x y"}}));
    let Entry::Lane(lane) = &g.entries[0] else {
        panic!("expected a lane");
    };
    assert_eq!(
        lane.params[&Param::Data],
        ParamSupply::Sequence(vec![
            ParamValue::Text("x".into()),
            ParamValue::Text("y".into())
        ])
    );
}

#[test]
fn plural_strings_are_evaluated() {
    let g = root(json!({"d": {"wave": "pppp", "periods": "[1 + i % 2 for i in range(4)]"}}));
    let Entry::Lane(lane) = &g.entries[0] else {
        panic!("expected a lane");
    };
    let ParamSupply::Sequence(values) = &lane.params[&Param::Period] else {
        panic!("expected a sequence");
    };
    assert_eq!(values.len(), 4);
    assert_eq!(values[1], ParamValue::Number(2.0));
}

#[test]
fn analogue_key_feeds_equations() {
    let g = root(json!({"v": {"wave": "ac", "analogue": [[[0, 0], [40, 1.8]], "VDDA / 2"]}}));
    let Entry::Lane(lane) = &g.entries[0] else {
        panic!("expected a lane");
    };
    let ParamSupply::Sequence(values) = &lane.params[&Param::Equation] else {
        panic!("expected a sequence");
    };
    assert_eq!(
        values[0],
        ParamValue::Equation(Equation::Points(vec![(0.0, 0.0), (40.0, 1.8)]))
    );
    assert_eq!(values[1], ParamValue::Text("VDDA / 2".into()));
}

#[test]
fn lane_options_and_styles() {
    let g = root(json!({
        "s": {"wave": "01", "phase": 0.5, "repeat": 3, "overlay": true,
              "vscale": 2, "stroke": "red", "stroke-width": 2}
    }));
    let Entry::Lane(lane) = &g.entries[0] else {
        panic!("expected a lane");
    };
    assert_eq!(lane.phase, 0.5);
    assert_eq!(lane.repeat, 3);
    assert!(lane.overlay);
    assert_eq!(lane.vscale, 2.0);
    assert_eq!(lane.styles["stroke"], "red");
    assert_eq!(lane.styles["stroke-width"], "2");
}

#[test]
fn edges_and_annotations_are_typed() {
    let g = root(json!({
        "a": {"wave": "p."},
        "edge": ["a~>b ready"],
        "annotations": [
            {"shape": "||", "x": 3.5},
            {"shape": "->", "from": "1.5, 3", "to": [2, 1], "text": "t", "stroke": "blue"}
        ]
    }));
    assert_eq!(g.edges, vec!["a~>b ready".to_owned()]);
    assert_eq!(g.annotations.len(), 2);
    assert_eq!(g.annotations[0].x, 3.5);
    assert!(g.annotations[0].text_background);
    assert_eq!(g.annotations[1].from, Some(Endpoint::Text("1.5, 3".into())));
    assert_eq!(g.annotations[1].to, Some(Endpoint::Pair(2.0, 1.0)));
    assert_eq!(g.annotations[1].styles()["stroke"], "blue");
}

#[test]
fn non_string_wave_is_rejected() {
    let err = Group::from_value("root", &json!({"a": {"wave": 3}})).unwrap_err();
    assert!(matches!(err, UndulateError::InvalidWave { ref signal, .. } if signal == "a"));
}

#[test]
fn spacer_names() {
    assert!(is_spacer(""));
    assert!(is_spacer("  "));
    assert!(is_spacer("Spacer_3"));
    assert!(!is_spacer("clk"));
}

#[test]
fn lane_names_skip_spacers_and_groups() {
    let g = root(json!({
        "clk": {"wave": "p"},
        "": {"wave": "0"},
        "sub": {"x": {"wave": "1"}}
    }));
    assert_eq!(g.lane_names().collect::<Vec<_>>(), vec!["clk"]);
}
