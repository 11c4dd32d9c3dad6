//! Input documents: typed model, legacy normalization and register pre-pass.

pub(crate) mod legacy;
pub(crate) mod model;
pub(crate) mod register;

use serde_json::Value;

use crate::foundation::error::UndulateResult;

pub use legacy::{normalize, parse_document, relax_json};
pub use model::{
    Annotation, Endpoint, Entry, Group, GroupConfig, Lane, ParamSupply, StyleOverrides, is_spacer,
};
pub use register::{Field, Register};

/// Build the root group of a diagram from a parsed document.
///
/// Register documents are first turned into a synthetic wavelane; documents
/// carrying a `signal` array are normalized into keyed groups.
pub fn load(name: &str, doc: &Value, is_reg: bool) -> UndulateResult<Group> {
    let converted;
    let mut doc = doc;
    if is_reg {
        converted = register::convert(doc)?;
        doc = &converted;
    } else if doc.get("signal").is_some() {
        converted = legacy::normalize(doc)?;
        doc = &converted;
    }
    Group::from_value(name, doc)
}
