//! Structural loader
//!
//! Parses raw text into a generic YAML document and checks the root shape.
//! Either the whole text parses or a single fatal error is returned.

use serde_yaml::Value;

use crate::errors::{ModelError, Result};

/// A parsed model document whose root is a map with a non-empty `entities`
/// list. Everything below that is unchecked until canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub(crate) fn as_value_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Re-serialize the document as YAML text
    ///
    /// # Errors
    ///
    /// `Serialization` if the YAML emitter fails.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(&self.root).map_err(|e| {
            ModelError::Serialization {
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// Parse `text` and verify the document root.
///
/// # Errors
///
/// - `ParseError`: the text is not well-formed YAML (the parser's message is kept)
/// - `InvalidRoot`: the root is a scalar, a list, or empty
/// - `MissingEntities`: `entities` is absent, not a list, or empty
pub fn load_document(text: &str) -> Result<Document> {
    if text.trim().is_empty() {
        return Err(ModelError::InvalidRoot {
            found: "an empty document".to_string(),
        }
        .into());
    }
    let root: Value = serde_yaml::from_str(text).map_err(|e| ModelError::Parse {
        message: e.to_string(),
    })?;
    check_root(root)
}

/// Verify the root shape of an already-parsed value
///
/// # Errors
///
/// Same shape errors as [`load_document`].
pub fn check_root(root: Value) -> Result<Document> {
    let map = match &root {
        Value::Mapping(map) => map,
        other => {
            return Err(ModelError::InvalidRoot {
                found: value_kind(other).to_string(),
            }
            .into())
        }
    };

    match map.get("entities") {
        None => Err(ModelError::MissingEntities {
            reason: "key is absent".to_string(),
        }
        .into()),
        Some(Value::Sequence(items)) if items.is_empty() => Err(ModelError::MissingEntities {
            reason: "list is empty".to_string(),
        }
        .into()),
        Some(Value::Sequence(_)) => Ok(Document { root }),
        Some(other) => Err(ModelError::MissingEntities {
            reason: format!("expected a list, found {}", value_kind(other)),
        }
        .into()),
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a map",
        Value::Tagged(_) => "a tagged value",
    }
}
