use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::bricks::{Equation, Param, ParamValue};
use crate::expression::{Environment, Value as ExprValue, evaluate};
use crate::foundation::error::{UndulateError, UndulateResult};

/// Keys of a group that never describe a wavelane.
pub const RESERVED_KEYS: [&str; 6] = ["config", "edges", "edge", "annotations", "head", "foot"];

/// Style properties a wavelane or annotation may override.
pub const STYLE_KEYS: [&str; 10] = [
    "fill",
    "stroke",
    "color",
    "font",
    "font-size",
    "font-family",
    "font-weight",
    "text-align",
    "stroke-width",
    "stroke-dasharray",
];

/// CSS property overrides keyed by property name.
pub type StyleOverrides = BTreeMap<String, String>;

/// Whether `name` designates a spacer row.
pub fn is_spacer(name: &str) -> bool {
    name.trim().is_empty() || name.to_lowercase().contains("spacer")
}

/// How the values of one parameter are handed to the bricks of a lane.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamSupply {
    /// Same value for every brick.
    Broadcast(ParamValue),
    /// One value per brick that consumes the parameter, left to right.
    Sequence(Vec<ParamValue>),
}

/// Per-group options read from the `config` key.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    /// Horizontal scale of the group.
    pub hscale: Option<f64>,
    /// Vertical scale of the group.
    pub vscale: Option<f64>,
    /// Space between rows.
    pub separation: Option<f64>,
    /// Leave out the slot ticks.
    pub no_ticks: Option<bool>,
    /// Offset of gap glyphs inside their slot.
    #[serde(rename = "gap-offset", alias = "gap_offset")]
    pub gap_offset: Option<f64>,
    /// Shift of the ticks, in slots.
    pub ticks_phase: Option<f64>,
}

/// Endpoint of an annotation before resolution.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
    /// A brick index (x) or a row index (y), depending on the shape.
    Scalar(f64),
    /// `(brick, row)` pair.
    Pair(f64, f64),
    /// Node name, `"x, y"` pair or arithmetic expression.
    Text(String),
}

/// Free-form drawing over the diagram.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Annotation {
    /// Shape of the annotation; a connector, `|`, `||`, `-` or a box.
    #[serde(default)]
    pub shape: Option<String>,
    /// Slot index of vertical shapes.
    #[serde(default)]
    pub x: f64,
    /// Row index of horizontal shapes.
    #[serde(default)]
    pub y: f64,
    /// Horizontal offset of the label.
    #[serde(default)]
    pub dx: f64,
    /// Vertical offset of the label.
    #[serde(default)]
    pub dy: f64,
    /// First endpoint.
    #[serde(default)]
    pub from: Option<Endpoint>,
    /// Second endpoint.
    #[serde(default)]
    pub to: Option<Endpoint>,
    /// Label.
    #[serde(default)]
    pub text: String,
    /// Draw the label on an opaque background.
    #[serde(default = "default_true")]
    pub text_background: bool,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

impl Default for Annotation {
    fn default() -> Self {
        Self {
            shape: None,
            x: 0.0,
            y: 0.0,
            dx: 0.0,
            dy: 0.0,
            from: None,
            to: None,
            text: String::new(),
            text_background: true,
            extra: Map::new(),
        }
    }
}

impl Annotation {
    /// Style overrides carried by the annotation.
    pub fn styles(&self) -> StyleOverrides {
        styles_of(&self.extra)
    }
}

/// One named signal.
#[derive(Clone, Debug, PartialEq)]
pub struct Lane {
    /// Signal name.
    pub name: String,
    /// Symbol string; empty for spacers.
    pub wave: String,
    /// Per-slot parameters supplied by the description.
    pub params: BTreeMap<Param, ParamSupply>,
    /// Shift in bricks.
    pub phase: f64,
    /// Number of times the wave string is repeated.
    pub repeat: usize,
    /// Horizontal scale of the lane.
    pub hscale: f64,
    /// Vertical scale of the lane.
    pub vscale: f64,
    /// Node chain: one character per slot, `.` for none, then extra names.
    pub node: Option<String>,
    /// Drawn over the previous row without taking vertical room.
    pub overlay: bool,
    /// Offset of gap glyphs inside their slot.
    pub gap_offset: Option<f64>,
    /// Style overrides of the lane.
    pub styles: StyleOverrides,
}

impl Default for Lane {
    fn default() -> Self {
        Self {
            name: String::new(),
            wave: String::new(),
            params: BTreeMap::new(),
            phase: 0.0,
            repeat: 1,
            hscale: 1.0,
            vscale: 1.0,
            node: None,
            overlay: false,
            gap_offset: None,
            styles: StyleOverrides::new(),
        }
    }
}

/// Child of a group.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    /// Drawn wavelane.
    Lane(Lane),
    /// Row without drawing, possibly declaring nodes.
    Spacer(Lane),
    /// Nested group.
    Group(Group),
}

/// Named, possibly nested, collection of wavelanes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    /// Group name; empty at the root.
    pub name: String,
    /// Options of the `config` key.
    pub config: GroupConfig,
    /// Children, in declaration order.
    pub entries: Vec<Entry>,
    /// Edge strings.
    pub edges: Vec<String>,
    /// Free-form annotations.
    pub annotations: Vec<Annotation>,
}

impl Group {
    /// Build a group from a JSON object.
    pub fn from_value(name: &str, value: &Value) -> UndulateResult<Self> {
        let Value::Object(map) = value else {
            return Err(UndulateError::validation(format!(
                "group '{name}' must be an object"
            )));
        };
        let mut group = Group {
            name: name.to_owned(),
            ..Group::default()
        };
        if let Some(config) = map.get("config") {
            group.config = serde_json::from_value(config.clone())?;
        }
        if let Some(edges) = map.get("edges").or_else(|| map.get("edge")) {
            group.edges = serde_json::from_value(edges.clone())?;
        }
        if let Some(annotations) = map.get("annotations") {
            group.annotations = serde_json::from_value(annotations.clone())?;
        }

        for (key, child) in map {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            let Value::Object(fields) = child else {
                tracing::debug!(group = %name, entry = %key, "skip non-object entry");
                continue;
            };
            let entry = if fields.contains_key("wave") {
                Entry::Lane(Lane::from_map(key, fields)?)
            } else if is_spacer(key) || fields.contains_key("node") {
                Entry::Spacer(Lane::from_map(key, fields)?)
            } else {
                Entry::Group(Group::from_value(key, child)?)
            };
            group.entries.push(entry);
        }
        Ok(group)
    }

    /// Names of the wavelanes drawn directly in this group.
    pub fn lane_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Lane(lane) if !is_spacer(&lane.name) => Some(lane.name.as_str()),
            _ => None,
        })
    }
}

impl Lane {
    /// Build a lane from the fields of a wavelane object.
    pub fn from_map(name: &str, map: &Map<String, Value>) -> UndulateResult<Self> {
        let number = |key: &str| map.get(key).and_then(Value::as_f64);
        let mut lane = Lane {
            name: name.to_owned(),
            wave: match map.get("wave") {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => {
                    return Err(UndulateError::invalid_wave(
                        name,
                        format!("wave must be a string, got {other}"),
                    ));
                }
            },
            phase: number("phase").unwrap_or(0.0),
            repeat: number("repeat").map_or(1, |r| r.max(0.0) as usize),
            hscale: number("hscale").unwrap_or(1.0),
            vscale: number("vscale").unwrap_or(1.0),
            node: map.get("node").and_then(Value::as_str).map(str::to_owned),
            overlay: map.get("overlay").and_then(Value::as_bool).unwrap_or(false),
            gap_offset: number("gap-offset").or_else(|| number("gap_offset")),
            styles: styles_of(map),
            ..Lane::default()
        };

        for param in Param::ALL {
            if let Some(supply) = read_supply(name, param, map)? {
                lane.params.insert(param, supply);
            }
        }
        if !lane.params.contains_key(&Param::Equation)
            && let Some(analogue) = map.get("analogue")
        {
            let supply = match analogue {
                Value::Array(items) => ParamSupply::Sequence(
                    items
                        .iter()
                        .map(|v| equation_value(name, v))
                        .collect::<UndulateResult<_>>()?,
                ),
                other => ParamSupply::Broadcast(equation_value(name, other)?),
            };
            lane.params.insert(Param::Equation, supply);
        }
        Ok(lane)
    }

    /// Broadcast numeric value of `param`, if any.
    pub fn number(&self, param: Param) -> Option<f64> {
        match self.params.get(&param) {
            Some(ParamSupply::Broadcast(ParamValue::Number(v))) => Some(*v),
            _ => None,
        }
    }
}

fn styles_of(map: &Map<String, Value>) -> StyleOverrides {
    STYLE_KEYS
        .iter()
        .filter_map(|&key| {
            let text = match map.get(key)? {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Array(items) => items
                    .iter()
                    .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_owned))
                    .collect::<Vec<_>>()
                    .join(", "),
                _ => return None,
            };
            Some((key.to_owned(), text))
        })
        .collect()
}

fn read_supply(
    signal: &str,
    param: Param,
    map: &Map<String, Value>,
) -> UndulateResult<Option<ParamSupply>> {
    if let Some(plural) = map.get(param.plural_key()) {
        let supply = match (param, plural) {
            (_, Value::Null) => None,
            (Param::Data, Value::String(s)) => Some(ParamSupply::Sequence(
                s.split(' ').map(|t| ParamValue::Text(t.to_owned())).collect(),
            )),
            (_, Value::String(src)) => Some(evaluated_supply(signal, param, src)?),
            (_, Value::Array(items)) => Some(ParamSupply::Sequence(
                items
                    .iter()
                    .map(|v| param_value(signal, param, v))
                    .collect::<UndulateResult<_>>()?,
            )),
            (_, other) => Some(ParamSupply::Broadcast(param_value(signal, param, other)?)),
        };
        if supply.is_some() {
            return Ok(supply);
        }
    }
    if param.plural_key() == param.key() {
        return Ok(None);
    }
    match map.get(param.key()) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(ParamSupply::Broadcast(param_value(
            signal, param, value,
        )?))),
    }
}

// plural strings other than data hold an expression producing the list
fn evaluated_supply(signal: &str, param: Param, src: &str) -> UndulateResult<ParamSupply> {
    let mut env = Environment::default();
    let value = evaluate(src, &mut env)?;
    match value {
        ExprValue::List(items) => Ok(ParamSupply::Sequence(
            items
                .iter()
                .map(|item| expr_param_value(signal, param, item))
                .collect::<UndulateResult<_>>()?,
        )),
        scalar => Ok(ParamSupply::Broadcast(expr_param_value(
            signal, param, &scalar,
        )?)),
    }
}

fn expr_param_value(signal: &str, param: Param, value: &ExprValue) -> UndulateResult<ParamValue> {
    if let Some(v) = value.as_number() {
        return Ok(ParamValue::Number(v));
    }
    match value.as_points() {
        Some(points) if param == Param::Equation => {
            Ok(ParamValue::Equation(Equation::Points(points)))
        }
        _ => Err(UndulateError::invalid_wave(
            signal,
            format!("{}: unsupported value {value:?}", param.plural_key()),
        )),
    }
}

fn param_value(signal: &str, param: Param, value: &Value) -> UndulateResult<ParamValue> {
    if param == Param::Equation {
        return equation_value(signal, value);
    }
    match value {
        Value::Number(n) => Ok(ParamValue::Number(n.as_f64().unwrap_or(0.0))),
        Value::String(s) => Ok(ParamValue::Text(s.clone())),
        Value::Bool(b) => Ok(ParamValue::Number(if *b { 1.0 } else { 0.0 })),
        Value::Null => Ok(ParamValue::Texts(Vec::new())),
        Value::Array(items) => Ok(ParamValue::Texts(
            items
                .iter()
                .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_owned))
                .collect(),
        )),
        Value::Object(_) => Err(UndulateError::invalid_wave(
            signal,
            format!("{}: objects are not supported", param.key()),
        )),
    }
}

fn equation_value(signal: &str, value: &Value) -> UndulateResult<ParamValue> {
    match value {
        Value::Number(n) => Ok(ParamValue::Number(n.as_f64().unwrap_or(0.0))),
        Value::String(s) => Ok(ParamValue::Text(s.clone())),
        Value::Array(_) => serde_json::from_value::<Vec<(f64, f64)>>(value.clone())
            .map(|points| ParamValue::Equation(Equation::Points(points)))
            .map_err(|_| {
                UndulateError::invalid_wave(signal, "equation lists hold (time, voltage) pairs")
            }),
        other => Err(UndulateError::invalid_wave(
            signal,
            format!("unsupported equation {other}"),
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
