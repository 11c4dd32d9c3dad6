use super::*;

#[test]
fn sizes_parse_common_units() {
    assert_eq!(parse_size("12px"), Some(12.0));
    assert_eq!(parse_size("0.75em"), Some(12.0));
    assert_eq!(parse_size(" 9 "), Some(9.0));
    assert!((parse_size("10pt").unwrap() - 13.33).abs() < 1e-9);
    assert_eq!(parse_size("large"), None);
}

#[test]
fn unknown_names_fall_back_to_their_first_word() {
    let skin = Skin::default();
    let style = skin.get_style("border ctx-y", &StyleOverrides::new());
    assert_eq!(style.get("stroke-width").map(String::as_str), Some("1.2"));
    assert!(skin.get_style("nothing here", &StyleOverrides::new()).is_empty());
}

#[test]
fn overrides_win_over_the_rule() {
    let skin = Skin::default();
    let mut overrides = StyleOverrides::new();
    overrides.insert("stroke".into(), "red".into());
    let style = skin.get_style("path", &overrides);
    assert_eq!(style.get("stroke").map(String::as_str), Some("red"));
    assert_eq!(style.get("fill").map(String::as_str), Some("none"));
}

#[test]
fn font_size_uses_the_default_when_unset() {
    let skin = Skin::default();
    let none = StyleOverrides::new();
    assert_eq!(skin.font_size("edge-text", &none, 1.0), 12.0);
    assert_eq!(skin.font_size("h2", &none, 1.0), 24.0);
    assert_eq!(skin.font_size("path", &none, 7.0), 7.0);
}

#[test]
fn text_box_grows_with_the_text() {
    let skin = Skin::default();
    let none = StyleOverrides::new();
    let b = skin.text_bbox("title", "abc", &none);
    assert!((b.width() - 3.0 * 0.667 * 16.0).abs() < 1e-9);
    assert_eq!(b.height(), 16.0);
    assert!((b.x0 + 3.0 * 0.333 * 16.0).abs() < 1e-9);
    // no rule: half an em
    assert_eq!(skin.text_bbox("unknown", "a", &none).height(), 8.0);
}

#[test]
fn set_adds_rules_to_the_style_sheet() {
    let mut skin = Skin::empty();
    assert!(skin.to_css().is_empty());
    skin.set("edge", "stroke", "red");
    skin.set("edge", "fill", "none");
    assert_eq!(skin.to_css(), ".edge {fill: none; stroke: red;}\n");
    assert_eq!(skin.rule("edge").map(|r| r.len()), Some(2));
}
