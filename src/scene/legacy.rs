use serde_json::{Map, Value};

use crate::foundation::error::{UndulateError, UndulateResult};

/// Parse a diagram document, accepting the relaxed syntax of hand-written files.
///
/// Strict JSON is tried first; on failure the text goes through
/// [`relax_json`] and is parsed again.
pub fn parse_document(text: &str) -> UndulateResult<Value> {
    if text.trim().is_empty() {
        return Err(UndulateError::validation("empty document"));
    }
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(strict) => {
            tracing::debug!(error = %strict, "strict parse failed, retrying relaxed");
            Ok(serde_json::from_str(&relax_json(text))?)
        }
    }
}

/// Rewrite relaxed JSON into strict JSON.
///
/// Handles `//` comments, bare object keys, single-quoted strings, trailing
/// commas, and `0x`/`0h`/`0b`/`0d` prefixed integers. Double-quoted strings
/// are copied untouched.
pub fn relax_json(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => i = copy_string(&chars, i, &mut out),
            '\'' => i = requote_string(&chars, i, &mut out),
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            ',' => {
                let next = chars[i + 1..].iter().position(|c| !c.is_whitespace());
                let closes = next.is_some_and(|n| matches!(chars[i + 1 + n], ']' | '}'));
                if !closes {
                    out.push(',');
                }
                i += 1;
            }
            c if c.is_ascii_digit() && !prev_is_word(&chars, i) => {
                i = convert_number(&chars, i, &mut out);
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let next = chars[i..].iter().find(|c| !c.is_whitespace());
                if next == Some(&':') {
                    out.push('"');
                    out.push_str(&word);
                    out.push('"');
                } else {
                    out.push_str(&word);
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

fn prev_is_word(chars: &[char], i: usize) -> bool {
    i > 0 && (chars[i - 1].is_alphanumeric() || chars[i - 1] == '_' || chars[i - 1] == '.')
}

fn copy_string(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push('"');
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        i += 1;
        if c == '\\' && i < chars.len() {
            out.push(chars[i]);
            i += 1;
        } else if c == '"' {
            break;
        }
    }
    i
}

fn requote_string(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push('"');
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '\\' if i < chars.len() => {
                if chars[i] != '\'' {
                    out.push('\\');
                }
                out.push(chars[i]);
                i += 1;
            }
            '\'' => break,
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    i
}

fn convert_number(chars: &[char], start: usize, out: &mut String) -> usize {
    let radix = match (chars[start], chars.get(start + 1)) {
        ('0', Some('x' | 'X' | 'h' | 'H')) => Some(16),
        ('0', Some('b' | 'B')) => Some(2),
        ('0', Some('d' | 'D')) => Some(10),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits_start = start + 2;
        let mut end = digits_start;
        while end < chars.len() && chars[end].is_digit(radix) {
            end += 1;
        }
        let digits: String = chars[digits_start..end].iter().collect();
        if let Ok(v) = u64::from_str_radix(&digits, radix) {
            out.push_str(&v.to_string());
            return end;
        }
    }
    let mut i = start;
    while i < chars.len() && (chars[i].is_ascii_digit() || matches!(chars[i], '.' | 'e' | 'E')) {
        out.push(chars[i]);
        i += 1;
    }
    i
}

/// Convert a document holding a `signal` array into the keyed group layout.
///
/// Objects become wavelanes keyed by their `name` (nameless ones become
/// spacers), arrays become groups named by their first element. Other
/// top-level keys are copied as is.
pub fn normalize(doc: &Value) -> UndulateResult<Value> {
    let Value::Object(map) = doc else {
        return Err(UndulateError::validation("document root must be an object"));
    };
    let mut spacers = 0usize;
    let mut out = Map::new();
    for (key, value) in map {
        if key != "signal" {
            out.insert(key.clone(), value.clone());
            continue;
        }
        let Value::Array(items) = value else {
            return Err(UndulateError::validation("'signal' must be an array"));
        };
        for item in items {
            if let Some((name, entry)) = convert_item(item, &mut spacers)? {
                insert_unique(&mut out, name, entry);
            }
        }
    }
    Ok(Value::Object(out))
}

fn convert_item(item: &Value, spacers: &mut usize) -> UndulateResult<Option<(String, Value)>> {
    match item {
        Value::Object(fields) => Ok(Some(convert_lane(fields, spacers))),
        Value::Array(items) => convert_group(items, spacers).map(Some),
        other => {
            tracing::debug!(item = %other, "skip unsupported signal entry");
            Ok(None)
        }
    }
}

fn convert_lane(fields: &Map<String, Value>, spacers: &mut usize) -> (String, Value) {
    let mut fields = fields.clone();
    let name = match fields.remove("name") {
        Some(Value::String(s)) => s.trim().to_owned(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    let name = if name.is_empty() {
        *spacers += 1;
        format!("spacer_{spacers}")
    } else {
        name
    };
    (name, Value::Object(fields))
}

fn convert_group(items: &[Value], spacers: &mut usize) -> UndulateResult<(String, Value)> {
    let name = match items.first() {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => {
            return Err(UndulateError::validation(
                "a group of signals requires a name as first element",
            ));
        }
    };
    let mut group = Map::new();
    for item in &items[1..] {
        if let Some((lane, entry)) = convert_item(item, spacers)? {
            insert_unique(&mut group, lane, entry);
        }
    }
    Ok((name, Value::Object(group)))
}

fn insert_unique(map: &mut Map<String, Value>, name: String, entry: Value) {
    let mut unique = name;
    if map.contains_key(&unique) {
        tracing::warn!(signal = %unique, "duplicated signal name, renamed");
        while map.contains_key(&unique) {
            unique.push(' ');
        }
    }
    map.insert(unique, entry);
}

#[cfg(test)]
#[path = "../../tests/unit/scene/legacy.rs"]
mod tests;
