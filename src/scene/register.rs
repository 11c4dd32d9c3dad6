use serde_json::{Map, Value, json};

use crate::expression::MAX_LIST_LEN;
use crate::foundation::error::{UndulateError, UndulateResult};

/// Description assigned to the fields filling holes between declared positions.
pub const UNUSED: &str = "unused";

/// Widest register, in bits.
pub const MAX_REGISTER_BITS: u64 = MAX_LIST_LEN as u64;

/// One field of a register, from one to N bits.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Free text; `unused` marks a hole.
    pub description: String,
    /// Least significant bit of the field; `None` packs it after the previous one.
    pub start: Option<u64>,
    /// Number of bits.
    pub width: u64,
    /// Lines printed below the field.
    pub attributes: Vec<String>,
    /// Fill style (`s{type}-polygon`, `hatch`), empty for none.
    pub style: String,
    /// Label of every bit, most significant first.
    pub data: Vec<String>,
}

impl Field {
    /// Build a field from its JSON description.
    ///
    /// `bits` is an alias of `width`, `attr` of `attributes`. A numeric name is
    /// written bit by bit in binary; a textual one is centered on the field.
    pub fn from_value(value: &Value) -> UndulateResult<Self> {
        let Value::Object(map) = value else {
            return Err(UndulateError::register(format!(
                "unsupported field type: {value}"
            )));
        };
        let width = map
            .get("width")
            .or_else(|| map.get("bits"))
            .and_then(Value::as_u64)
            .unwrap_or(1)
            .max(1);
        if width > MAX_REGISTER_BITS {
            return Err(UndulateError::register(format!(
                "field width {width} exceeds {MAX_REGISTER_BITS} bits"
            )));
        }
        let description = map
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let start = map.get("regpos").and_then(Value::as_u64);
        if let Some(start) = start
            && start >= MAX_REGISTER_BITS
        {
            return Err(UndulateError::register(format!(
                "field position {start} exceeds {MAX_REGISTER_BITS} bits"
            )));
        }

        let kind = match map.get("type") {
            None => Some("2".to_owned()),
            Some(Value::Null | Value::Bool(false)) => None,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        let style = if description == UNUSED {
            "hatch".to_owned()
        } else {
            kind.map(|k| format!("s{k}-polygon")).unwrap_or_default()
        };

        let attributes = match map.get("attributes").or_else(|| map.get("attr")) {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .map(|a| match a {
                    Value::Number(n) => n.as_u64().map_or_else(|| n.to_string(), |v| binary(v, width)),
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            Some(Value::Number(n)) => vec![n.as_u64().map_or_else(|| n.to_string(), |v| binary(v, width))],
            _ => Vec::new(),
        };

        let (name, data) = match map.get("name") {
            Some(Value::Number(n)) => {
                let bits = n.as_u64().map_or_else(|| n.to_string(), |v| binary(v, width));
                (n.to_string(), bits.chars().map(String::from).collect())
            }
            Some(Value::String(s)) => (s.clone(), centered(s, width)),
            _ => (String::new(), centered("", width)),
        };

        Ok(Self {
            name,
            description,
            start,
            width,
            attributes,
            style,
            data,
        })
    }

    /// Hatched placeholder covering `width` bits from `start`.
    pub fn unused(start: u64, width: u64) -> Self {
        Self {
            name: String::new(),
            description: UNUSED.to_owned(),
            start: Some(start),
            width,
            attributes: Vec::new(),
            style: "hatch".to_owned(),
            data: centered("", width),
        }
    }

    /// Symbols of the field: `[`, `:`..., `]` or a single `b`.
    pub fn wave(&self) -> String {
        if self.width > 1 {
            format!("[{}]", ":".repeat((self.width - 2) as usize))
        } else {
            "b".to_owned()
        }
    }
}

// low `width` bits, most significant first
fn binary(value: u64, width: u64) -> String {
    let width = width as usize;
    let digits = format!("{value:0width$b}");
    digits[digits.len() - width..].to_owned()
}

// label on bit (w-1)/2 rounded up, counted from the most significant bit
fn centered(label: &str, width: u64) -> Vec<String> {
    let width = width as usize;
    let at = width / 2;
    (0..width)
        .map(|i| if i == at { label.to_owned() } else { String::new() })
        .collect()
}

/// A register: a name and its fields, least significant first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Register {
    /// Register name; empty for `reg`.
    pub name: String,
    /// Fields, least significant first.
    pub fields: Vec<Field>,
    /// The `config` key of the document.
    pub config: Value,
}

impl Register {
    /// Read a register document: the last key other than `config`, `head` and
    /// `foot` names the register and holds its field list.
    pub fn from_document(doc: &Value) -> UndulateResult<Self> {
        let Value::Object(map) = doc else {
            return Err(UndulateError::register("register document must be an object"));
        };
        let Some(name) = map
            .keys()
            .filter(|k| !matches!(k.as_str(), "config" | "head" | "foot"))
            .next_back()
        else {
            return Err(UndulateError::register("register document declares no register"));
        };
        let fields = match &map[name] {
            Value::Array(items) => items
                .iter()
                .map(Field::from_value)
                .collect::<UndulateResult<Vec<_>>>()?,
            other => {
                return Err(UndulateError::register(format!(
                    "fields of '{name}' must be a list, got {other}"
                )));
            }
        };
        Ok(Self {
            name: if name == "reg" { String::new() } else { name.clone() },
            fields,
            config: map.get("config").cloned().unwrap_or_else(|| json!({})),
        })
    }

    /// Resolve field positions and fill the holes with unused fields.
    ///
    /// A field without position, or at position 0, is packed after the
    /// previous one. A field starting below the current position overlaps.
    pub fn pack(&mut self) -> UndulateResult<()> {
        let mut holes = Vec::new();
        let mut pos = 0u64;
        for (i, field) in self.fields.iter_mut().enumerate() {
            match field.start {
                Some(start) if start > 0 && pos > start => {
                    let name = if field.name.is_empty() {
                        &field.description
                    } else {
                        &field.name
                    };
                    return Err(UndulateError::register(format!(
                        "Detected position overlap for '{name}'"
                    )));
                }
                Some(start) if start > 0 => {
                    if pos < start {
                        holes.push((i, pos, start - pos));
                        pos = start;
                    }
                }
                _ => field.start = Some(if i > 0 { pos } else { 0 }),
            }
            pos += field.width;
            if pos > MAX_REGISTER_BITS {
                return Err(UndulateError::register(format!(
                    "register spans {pos} bits, at most {MAX_REGISTER_BITS} allowed"
                )));
            }
        }
        for (i, start, width) in holes.into_iter().rev() {
            self.fields.insert(i, Field::unused(start, width));
        }
        Ok(())
    }

    /// Synthetic wavelane drawing the register, most significant field first.
    pub fn to_wavelane(&self) -> Value {
        let fields: Vec<&Field> = self.fields.iter().rev().collect();
        let wave: String = fields.iter().map(|f| f.wave()).collect();
        let data: Vec<&String> = fields.iter().flat_map(|f| f.data.iter()).collect();
        let positions: Vec<u64> = fields
            .iter()
            .flat_map(|f| {
                let start = f.start.unwrap_or(0);
                if f.width > 1 {
                    vec![start + f.width - 1, start]
                } else {
                    vec![start]
                }
            })
            .collect();
        let attributes: Vec<&Vec<String>> = fields.iter().map(|f| &f.attributes).collect();
        let styles: Vec<&String> = fields.iter().map(|f| &f.style).collect();
        let widths: Vec<u64> = fields.iter().map(|f| f.width).collect();

        let mut doc = Map::new();
        doc.insert("config".to_owned(), self.config.clone());
        doc.insert(
            self.name.clone(),
            json!({
                "wave": wave,
                "data": data,
                "positions": positions,
                "attributes": attributes,
                "styles": styles,
                "scale_widths": widths,
            }),
        );
        Value::Object(doc)
    }
}

/// Convert a register document into an equivalent wavelane document.
#[tracing::instrument(level = "debug", skip(doc))]
pub fn convert(doc: &Value) -> UndulateResult<Value> {
    let mut register = Register::from_document(doc)?;
    register.pack()?;
    tracing::debug!(
        register = %register.name,
        fields = register.fields.len(),
        "register packed"
    );
    Ok(register.to_wavelane())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/register.rs"]
mod tests;
