//! Document format
//!
//! Serde view of a model document. Loosely typed positions (descriptions,
//! tag lists, flags) go through the coercing deserializers below so the
//! builder never branches on raw document shape.

use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};

/// Top-level model document
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawModel {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub version: String,
    #[serde(deserialize_with = "text")]
    pub domain: String,
    #[serde(deserialize_with = "string_list")]
    pub owners: Vec<String>,
    #[serde(deserialize_with = "opt_text")]
    pub state: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    pub layer: Option<String>,
    #[serde(deserialize_with = "seq")]
    pub entities: Vec<RawEntity>,
    // Secondary sections stay raw; the builder decodes them item by item
    pub relationships: Value,
    pub indexes: Value,
    pub metrics: Value,
    pub governance: Value,
    pub glossary: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawEntity {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "opt_text")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "text")]
    pub description: String,
    #[serde(deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "opt_text")]
    pub schema: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    pub database: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    pub subject_area: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    pub owner: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    pub sla: Option<String>,
    #[serde(deserialize_with = "seq")]
    pub fields: Vec<RawField>,
    #[serde(deserialize_with = "string_list")]
    pub grain: Vec<String>,
    #[serde(deserialize_with = "opt_text")]
    pub surrogate_key: Option<String>,
    #[serde(deserialize_with = "string_list")]
    pub natural_key: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub dimension_refs: Vec<String>,
    #[serde(deserialize_with = "opt_small_int")]
    pub scd_type: Option<u8>,
    #[serde(deserialize_with = "flag")]
    pub conformed: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawField {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(rename = "type", alias = "data_type", deserialize_with = "text")]
    pub data_type: String,
    #[serde(deserialize_with = "opt_flag")]
    pub nullable: Option<bool>,
    #[serde(alias = "pk", deserialize_with = "flag")]
    pub primary_key: bool,
    #[serde(deserialize_with = "flag")]
    pub unique: bool,
    #[serde(alias = "fk", deserialize_with = "flag")]
    pub foreign_key: bool,
    #[serde(deserialize_with = "opt_text")]
    pub sensitivity: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub computed: bool,
    #[serde(deserialize_with = "opt_text")]
    pub check: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    pub default: Option<String>,
    #[serde(deserialize_with = "text")]
    pub description: String,
    #[serde(deserialize_with = "flag")]
    pub deprecated: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawRelationship {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub from: String,
    #[serde(deserialize_with = "text")]
    pub to: String,
    #[serde(deserialize_with = "opt_text")]
    pub cardinality: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawIndex {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub entity: String,
    #[serde(alias = "columns", deserialize_with = "string_list")]
    pub fields: Vec<String>,
    #[serde(deserialize_with = "flag")]
    pub unique: bool,
    #[serde(alias = "type", deserialize_with = "opt_text")]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawMetric {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub entity: String,
    #[serde(deserialize_with = "text")]
    pub expression: String,
    #[serde(alias = "agg", deserialize_with = "text")]
    pub aggregation: String,
    #[serde(deserialize_with = "string_list")]
    pub grain: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub dimensions: Vec<String>,
    #[serde(deserialize_with = "opt_text")]
    pub time_dimension: Option<String>,
    #[serde(deserialize_with = "text")]
    pub description: String,
    #[serde(deserialize_with = "string_list")]
    pub tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawGovernance {
    #[serde(deserialize_with = "mapping")]
    pub classification: Mapping,
    #[serde(deserialize_with = "mapping")]
    pub stewards: Mapping,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawGlossaryTerm {
    #[serde(deserialize_with = "text")]
    pub term: String,
    #[serde(deserialize_with = "text")]
    pub definition: String,
    #[serde(deserialize_with = "opt_text")]
    pub abbreviation: Option<String>,
    #[serde(alias = "related", deserialize_with = "string_list")]
    pub related_fields: Vec<String>,
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// Canonical string form of any scalar or list value
pub(crate) fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        Value::Sequence(items) => items
            .iter()
            .map(coerce_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Mapping(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", coerce_text(k), coerce_text(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Tagged(tagged) => coerce_text(&tagged.value),
    }
}

/// List form: a scalar becomes a one-element list, empty entries are dropped
pub(crate) fn coerce_list(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Sequence(items) => items
            .iter()
            .map(coerce_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::Tagged(tagged) => coerce_list(&tagged.value),
        other => {
            let text = coerce_text(other);
            if text.is_empty() {
                Vec::new()
            } else {
                vec![text]
            }
        }
    }
}

fn coerce_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().map(|f| f != 0.0).unwrap_or(false)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "no" | "n" | "off" | "0" => Some(false),
            // Anything else is a truthy marker, e.g. `foreign_key: customers.id`
            _ => Some(true),
        },
        Value::Sequence(items) => Some(!items.is_empty()),
        Value::Mapping(map) => Some(!map.is_empty()),
        Value::Tagged(tagged) => coerce_flag(&tagged.value),
    }
}

fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Value::deserialize(d).map(|v| coerce_text(&v))
}

fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let text = coerce_text(&Value::deserialize(d)?);
    Ok(if text.is_empty() { None } else { Some(text) })
}

fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Value::deserialize(d).map(|v| coerce_list(&v))
}

fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Value::deserialize(d).map(|v| coerce_flag(&v).unwrap_or(false))
}

fn opt_flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Value::deserialize(d).map(|v| coerce_flag(&v))
}

/// Accepts `2`, `"2"`, `"type2"`, `"scd2"`
fn opt_small_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u8>, D::Error> {
    let value = Value::deserialize(d)?;
    let parsed = match &value {
        Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        other => {
            let digits: String = coerce_text(other)
                .chars()
                .filter(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()
        }
    };
    Ok(parsed)
}

fn seq<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(d).map(Option::unwrap_or_default)
}

fn mapping<'de, D: Deserializer<'de>>(d: D) -> Result<Mapping, D::Error> {
    Option::<Mapping>::deserialize(d).map(Option::unwrap_or_default)
}
