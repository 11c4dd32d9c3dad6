use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::foundation::core::Rect;
use crate::scene::StyleOverrides;

/// CSS properties of one selector.
pub type Rule = BTreeMap<String, String>;

const DEFAULT_RULES: &[(&str, &[(&str, &str)])] = &[
    (
        "text",
        &[
            ("font-family", "Fira Mono, Monospace"),
            ("font-size", "0.9em"),
            ("text-anchor", "middle"),
            ("dominant-baseline", "middle"),
            ("fill", "black"),
        ],
    ),
    (
        "title",
        &[
            ("font-family", "Fira Mono, Monospace"),
            ("font-size", "1em"),
            ("font-weight", "500"),
            ("text-anchor", "end"),
            ("dominant-baseline", "middle"),
            ("fill", "black"),
        ],
    ),
    ("h1", &[("font-size", "1.8em"), ("font-weight", "bold"), ("text-anchor", "start")]),
    ("h2", &[("font-size", "1.5em"), ("font-weight", "bold"), ("text-anchor", "start")]),
    ("h3", &[("font-size", "1.2em"), ("font-weight", "bold"), ("text-anchor", "start")]),
    ("h4", &[("font-size", "1.1em"), ("font-weight", "bold"), ("text-anchor", "start")]),
    ("h5", &[("font-size", "1em"), ("font-weight", "bold"), ("text-anchor", "start")]),
    ("h6", &[("font-size", "1em"), ("font-weight", "bold"), ("text-anchor", "start")]),
    (
        "path",
        &[
            ("fill", "none"),
            ("stroke", "black"),
            ("stroke-width", "1"),
            ("stroke-linecap", "round"),
            ("stroke-linejoin", "miter"),
        ],
    ),
    ("arrow", &[("fill", "black"), ("stroke", "none")]),
    ("hide", &[("fill", "white"), ("stroke", "white"), ("stroke-width", "2")]),
    ("hatch", &[("fill", "url(#diagonalHatch)"), ("stroke", "none")]),
    ("s2-polygon", &[("fill", "#FFFFFF"), ("stroke", "none")]),
    ("s3-polygon", &[("fill", "#FFFFB4"), ("stroke", "none")]),
    ("s4-polygon", &[("fill", "#FFE0B9"), ("stroke", "none")]),
    ("s5-polygon", &[("fill", "#B9E0FF"), ("stroke", "none")]),
    ("s6-polygon", &[("fill", "#CCFDFE"), ("stroke", "none")]),
    ("s7-polygon", &[("fill", "#CDFDC5"), ("stroke", "none")]),
    ("s8-polygon", &[("fill", "#F0C1FB"), ("stroke", "none")]),
    ("s9-polygon", &[("fill", "#F5C2C0"), ("stroke", "none")]),
    (
        "data",
        &[("font-size", "0.75em"), ("text-anchor", "middle"), ("dominant-baseline", "middle")],
    ),
    (
        "tick",
        &[
            ("stroke", "rgba(0, 0, 0, 0.3)"),
            ("stroke-width", "0.5"),
            ("stroke-dasharray", "3, 3"),
        ],
    ),
    ("border", &[("stroke", "black"), ("stroke-width", "1.2"), ("fill", "none")]),
    ("big_gap", &[("fill", "none"), ("stroke", "black"), ("stroke-width", "1.5")]),
    ("edge", &[("fill", "none"), ("stroke", "#0000FF"), ("stroke-width", "1")]),
    ("edge-arrow", &[("fill", "#0000FF"), ("stroke", "none")]),
    (
        "edge-text",
        &[
            ("font-size", "0.75em"),
            ("fill", "#0000FF"),
            ("text-anchor", "middle"),
            ("dominant-baseline", "middle"),
        ],
    ),
    ("edge-background", &[("fill", "white"), ("stroke", "none")]),
    ("attr", &[("font-size", "9px"), ("text-anchor", "middle"), ("dominant-baseline", "middle")]),
    (
        "reg-pos",
        &[("font-size", "0.6em"), ("text-anchor", "middle"), ("dominant-baseline", "middle")],
    ),
    (
        "reg-data",
        &[("font-size", "0.9em"), ("text-anchor", "middle"), ("dominant-baseline", "middle")],
    ),
];

/// Pixels per `em`.
pub const EM: f64 = 16.0;
/// Pixels per `pt`.
pub const PT: f64 = 1.333;

/// Parse a CSS length (`12px`, `0.9em`, `10pt`, `12`) into pixels.
pub fn parse_size(value: &str) -> Option<f64> {
    let value = value.trim();
    let (number, scale) = if let Some(v) = value.strip_suffix("px") {
        (v, 1.0)
    } else if let Some(v) = value.strip_suffix("em") {
        (v, EM)
    } else if let Some(v) = value.strip_suffix("pt") {
        (v, PT)
    } else {
        (value, 1.0)
    };
    number.trim().parse::<f64>().ok().map(|v| v * scale)
}

/// Style lookup keyed by the tags carried by drawables.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Skin {
    rules: BTreeMap<String, Rule>,
}

impl Default for Skin {
    fn default() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|(selector, props)| {
                let rule = props
                    .iter()
                    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                    .collect();
                ((*selector).to_owned(), rule)
            })
            .collect();
        Self { rules }
    }
}

impl Skin {
    /// Skin without any rule.
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Properties of `selector`.
    pub fn rule(&self, selector: &str) -> Option<&Rule> {
        self.rules.get(selector)
    }

    /// Set one property of a selector.
    pub fn set(&mut self, selector: &str, property: &str, value: &str) {
        self.rules
            .entry(selector.to_owned())
            .or_default()
            .insert(property.to_owned(), value.to_owned());
    }

    /// Rules of `name`, or of its first word when `name` is unknown, with
    /// `overrides` on top.
    pub fn get_style(&self, name: &str, overrides: &StyleOverrides) -> Rule {
        let rule = self
            .rules
            .get(name)
            .or_else(|| name.split(' ').next().and_then(|first| self.rules.get(first)));
        let mut style = rule.cloned().unwrap_or_default();
        style.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        style
    }

    /// Font size of `name` in pixels, or `default` when unset or unparsable.
    pub fn font_size(&self, name: &str, overrides: &StyleOverrides, default: f64) -> f64 {
        self.get_style(name, overrides)
            .get("font-size")
            .and_then(|s| parse_size(s))
            .unwrap_or(default)
    }

    /// Estimated box of `text` centered on the origin.
    ///
    /// Glyphs are assumed two thirds of the font size wide.
    pub fn text_bbox(&self, name: &str, text: &str, overrides: &StyleOverrides) -> Rect {
        let size = self.font_size(name, overrides, 0.5 * EM);
        let len = text.chars().count() as f64;
        Rect::from_origin_size((-len * 0.333 * size, -size / 2.0), (len * 0.667 * size, size))
    }

    /// Style sheet holding every rule.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (selector, rule) in &self.rules {
            let _ = writeln!(css, ".{selector} {{{}}}", inline_css(rule));
        }
        css
    }
}

/// Properties of `rule` as an inline `style` attribute value.
pub fn inline_css(rule: &Rule) -> String {
    rule.iter()
        .map(|(k, v)| format!("{k}: {v};"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "../../tests/unit/render/skin.rs"]
mod tests;
