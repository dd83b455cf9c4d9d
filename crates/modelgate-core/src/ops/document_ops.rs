use serde_yaml::{Mapping, Value};

use crate::builder::{coerce_list, coerce_text, split_ref};
use crate::errors::{ModelError, Result};
use crate::loader::Document;

/// What an edit touched besides its target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSummary {
    /// References rewritten in place
    pub updated_refs: usize,
    /// Dependent items dropped, e.g. `relationship orders_customer`
    pub removed: Vec<String>,
}

/// Rename an entity and every reference to it.
///
/// # Errors
///
/// - `NotFound` if `old` does not exist
/// - `AlreadyExists` if another entity is already named `new`
pub fn rename_entity(doc: &mut Document, old: &str, new: &str) -> Result<EditSummary> {
    let root = root_mut(doc)?;
    let position = entity_position(root, old)?;
    if old != new && entity_position(root, new).is_ok() {
        return Err(ModelError::EntityAlreadyExists {
            entity: new.to_string(),
        }
        .into());
    }

    let mut summary = EditSummary::default();
    if let Some(entity) = entities_mut(root).and_then(|e| e.get_mut(position)) {
        set_text(entity, "name", new);
    }

    let rename_ref = |reference: &str| match split_ref(reference) {
        Some((entity, field)) if entity == old => Some(Some(format!("{}.{}", new, field))),
        _ => None,
    };

    for relationship in section_mut(root, "relationships") {
        for side in ["from", "to"] {
            summary.updated_refs += rewrite_text(relationship, side, rename_ref);
        }
    }
    for section in ["indexes", "metrics"] {
        for owned in section_mut(root, section) {
            if text_of(owned, "entity") == old {
                set_text(owned, "entity", new);
                summary.updated_refs += 1;
            }
        }
    }
    for entity in section_mut(root, "entities") {
        summary.updated_refs += rewrite_list(entity, "dimension_refs", |name| {
            (name == old).then(|| Some(new.to_string()))
        });
    }
    summary.updated_refs += rewrite_classification(root, rename_ref);
    for term in section_mut(root, "glossary") {
        summary.updated_refs += rewrite_list(term, "related_fields", rename_ref);
    }

    Ok(summary)
}

/// Remove an entity and everything that depends on it.
///
/// Relationships touching the entity, indexes and metrics on it, and
/// classification keys and glossary references to its fields are removed.
///
/// # Errors
///
/// `NotFound` if the entity does not exist.
pub fn remove_entity(doc: &mut Document, name: &str) -> Result<EditSummary> {
    let root = root_mut(doc)?;
    let position = entity_position(root, name)?;
    if let Some(entities) = entities_mut(root) {
        entities.remove(position);
    }

    let mut summary = EditSummary::default();
    let touches = |reference: &str| split_ref(reference).is_some_and(|(e, _)| e == name);

    retain(root, "relationships", &mut summary, |r| {
        !(touches(&text_of(r, "from")) || touches(&text_of(r, "to")))
    });
    retain(root, "indexes", &mut summary, |i| text_of(i, "entity") != name);
    retain(root, "metrics", &mut summary, |m| text_of(m, "entity") != name);

    for entity in section_mut(root, "entities") {
        summary.updated_refs += rewrite_list(entity, "dimension_refs", |dimension| {
            (dimension == name).then_some(None)
        });
    }
    let dropped = drop_classification(root, touches);
    summary.removed.extend(dropped);
    for term in section_mut(root, "glossary") {
        summary.updated_refs +=
            rewrite_list(term, "related_fields", |r| touches(r).then_some(None));
    }

    Ok(summary)
}

/// Rename a field and every reference to it.
///
/// # Errors
///
/// - `NotFound` if the entity or the field does not exist
/// - `AlreadyExists` if the entity already has a field named `new`
pub fn rename_field(doc: &mut Document, entity: &str, old: &str, new: &str) -> Result<EditSummary> {
    let root = root_mut(doc)?;
    let position = entity_position(root, entity)?;
    let owner = entities_mut(root)
        .and_then(|e| e.get_mut(position))
        .ok_or_else(|| ModelError::EntityNotFound {
            entity: entity.to_string(),
        })?;
    let field_index = field_position(owner, entity, old)?;
    if old != new && field_position_of(owner, new).is_some() {
        return Err(ModelError::FieldAlreadyExists {
            entity: entity.to_string(),
            field: new.to_string(),
        }
        .into());
    }

    let mut summary = EditSummary::default();
    if let Some(field) = owner
        .get_mut("fields")
        .and_then(Value::as_sequence_mut)
        .and_then(|f| f.get_mut(field_index))
    {
        set_text(field, "name", new);
    }
    let rename_name = |name: &str| (name == old).then(|| Some(new.to_string()));
    for key in ["grain", "natural_key"] {
        summary.updated_refs += rewrite_list(owner, key, rename_name);
    }
    summary.updated_refs += rewrite_text(owner, "surrogate_key", rename_name);

    let qualified_old = format!("{}.{}", entity, old);
    let qualified_new = format!("{}.{}", entity, new);
    let rename_ref = |reference: &str| {
        (reference.trim() == qualified_old).then(|| Some(qualified_new.clone()))
    };

    for relationship in section_mut(root, "relationships") {
        for side in ["from", "to"] {
            summary.updated_refs += rewrite_text(relationship, side, rename_ref);
        }
    }
    for index in section_mut(root, "indexes") {
        if text_of(index, "entity") == entity {
            let key = list_key(index);
            summary.updated_refs += rewrite_list(index, key, rename_name);
        }
    }
    for metric in section_mut(root, "metrics") {
        if text_of(metric, "entity") == entity {
            for key in ["grain", "dimensions"] {
                summary.updated_refs += rewrite_list(metric, key, rename_name);
            }
            summary.updated_refs += rewrite_text(metric, "time_dimension", rename_name);
        }
    }
    summary.updated_refs += rewrite_classification(root, rename_ref);
    for term in section_mut(root, "glossary") {
        summary.updated_refs += rewrite_list(term, "related_fields", rename_ref);
    }

    Ok(summary)
}

/// Remove a field and every reference to it.
///
/// Relationships using the field are removed; the field drops out of index,
/// grain, key, and metric dimension lists; indexes left without fields are
/// removed; a metric time dimension naming it is cleared.
///
/// # Errors
///
/// `NotFound` if the entity or the field does not exist.
pub fn remove_field(doc: &mut Document, entity: &str, field: &str) -> Result<EditSummary> {
    let root = root_mut(doc)?;
    let position = entity_position(root, entity)?;
    let owner = entities_mut(root)
        .and_then(|e| e.get_mut(position))
        .ok_or_else(|| ModelError::EntityNotFound {
            entity: entity.to_string(),
        })?;
    let field_index = field_position(owner, entity, field)?;

    let mut summary = EditSummary::default();
    if let Some(fields) = owner.get_mut("fields").and_then(Value::as_sequence_mut) {
        fields.remove(field_index);
    }
    let drop_name = |name: &str| (name == field).then_some(None);
    for key in ["grain", "natural_key"] {
        summary.updated_refs += rewrite_list(owner, key, drop_name);
    }
    summary.updated_refs += rewrite_text(owner, "surrogate_key", drop_name);

    let qualified = format!("{}.{}", entity, field);
    let is_target = |reference: &str| reference.trim() == qualified;

    retain(root, "relationships", &mut summary, |r| {
        !(is_target(&text_of(r, "from")) || is_target(&text_of(r, "to")))
    });
    for index in section_mut(root, "indexes") {
        if text_of(index, "entity") == entity {
            let key = list_key(index);
            summary.updated_refs += rewrite_list(index, key, drop_name);
        }
    }
    retain(root, "indexes", &mut summary, |i| {
        text_of(i, "entity") != entity
            || !i.get(list_key(i)).map(coerce_list).unwrap_or_default().is_empty()
    });
    for metric in section_mut(root, "metrics") {
        if text_of(metric, "entity") == entity {
            for key in ["grain", "dimensions"] {
                summary.updated_refs += rewrite_list(metric, key, drop_name);
            }
            summary.updated_refs += rewrite_text(metric, "time_dimension", drop_name);
        }
    }
    let dropped = drop_classification(root, is_target);
    summary.removed.extend(dropped);
    for term in section_mut(root, "glossary") {
        summary.updated_refs +=
            rewrite_list(term, "related_fields", |r| is_target(r).then_some(None));
    }

    Ok(summary)
}

// ---------------------------------------------------------------------------
// Document access
// ---------------------------------------------------------------------------

fn root_mut(doc: &mut Document) -> Result<&mut Mapping> {
    doc.as_value_mut().as_mapping_mut().ok_or_else(|| {
        ModelError::InvalidRoot {
            found: "a non-map value".to_string(),
        }
        .into()
    })
}

fn entities_mut(root: &mut Mapping) -> Option<&mut Vec<Value>> {
    root.get_mut("entities").and_then(Value::as_sequence_mut)
}

/// Items of a top-level list section; absent or non-list sections are empty
fn section_mut<'a>(root: &'a mut Mapping, key: &str) -> Vec<&'a mut Value> {
    match root.get_mut(key).and_then(Value::as_sequence_mut) {
        Some(items) => items.iter_mut().collect(),
        None => Vec::new(),
    }
}

fn text_of(item: &Value, key: &str) -> String {
    item.get(key).map(coerce_text).unwrap_or_default()
}

fn set_text(item: &mut Value, key: &str, text: &str) {
    if let Some(map) = item.as_mapping_mut() {
        map.insert(Value::String(key.to_string()), Value::String(text.to_string()));
    }
}

fn entity_position(root: &mut Mapping, name: &str) -> Result<usize> {
    entities_mut(root)
        .and_then(|entities| entities.iter().position(|e| text_of(e, "name") == name))
        .ok_or_else(|| {
            ModelError::EntityNotFound {
                entity: name.to_string(),
            }
            .into()
        })
}

fn field_position_of(entity: &Value, name: &str) -> Option<usize> {
    entity
        .get("fields")
        .and_then(Value::as_sequence)
        .and_then(|fields| fields.iter().position(|f| text_of(f, "name") == name))
}

fn field_position(entity: &Value, entity_name: &str, field: &str) -> Result<usize> {
    field_position_of(entity, field).ok_or_else(|| {
        ModelError::FieldNotFound {
            entity: entity_name.to_string(),
            field: field.to_string(),
        }
        .into()
    })
}

/// Index field lists may be spelled `fields` or `columns`
fn list_key(index: &Value) -> &'static str {
    if index.get("fields").is_none() && index.get("columns").is_some() {
        "columns"
    } else {
        "fields"
    }
}

// ---------------------------------------------------------------------------
// Rewriting
//
// Rewrite callbacks return `None` to keep a value, `Some(None)` to drop it
// and `Some(Some(text))` to replace it.
// ---------------------------------------------------------------------------

fn rewrite_text<F>(item: &mut Value, key: &str, rewrite: F) -> usize
where
    F: Fn(&str) -> Option<Option<String>>,
{
    let Some(map) = item.as_mapping_mut() else {
        return 0;
    };
    let Some(current) = map.get(key).map(coerce_text) else {
        return 0;
    };
    match rewrite(&current) {
        None => 0,
        Some(replacement) => {
            let value = replacement.map(Value::String).unwrap_or(Value::Null);
            map.insert(Value::String(key.to_string()), value);
            1
        }
    }
}

fn rewrite_list<F>(item: &mut Value, key: &str, rewrite: F) -> usize
where
    F: Fn(&str) -> Option<Option<String>>,
{
    let Some(map) = item.as_mapping_mut() else {
        return 0;
    };
    let Some(current) = map.get(key).map(coerce_list) else {
        return 0;
    };
    let mut touched = 0;
    let mut next = Vec::with_capacity(current.len());
    for entry in current {
        match rewrite(&entry) {
            None => next.push(Value::String(entry)),
            Some(Some(replacement)) => {
                touched += 1;
                next.push(Value::String(replacement));
            }
            Some(None) => touched += 1,
        }
    }
    if touched > 0 {
        map.insert(Value::String(key.to_string()), Value::Sequence(next));
    }
    touched
}

/// Keep the items of a list section matching `keep`, recording the rest
fn retain<F>(root: &mut Mapping, section: &str, summary: &mut EditSummary, keep: F)
where
    F: Fn(&Value) -> bool,
{
    let Some(items) = root.get_mut(section).and_then(Value::as_sequence_mut) else {
        return;
    };
    let label = match section {
        "relationships" => "relationship",
        "indexes" => "index",
        "metrics" => "metric",
        other => other,
    };
    items.retain(|item| {
        let kept = keep(item);
        if !kept {
            summary
                .removed
                .push(format!("{} {}", label, text_of(item, "name")));
        }
        kept
    });
}

fn classification_mut(root: &mut Mapping) -> Option<&mut Mapping> {
    root.get_mut("governance")
        .and_then(|g| g.get_mut("classification"))
        .and_then(Value::as_mapping_mut)
}

/// Rename classification keys in place, preserving key order
fn rewrite_classification<F>(root: &mut Mapping, rewrite: F) -> usize
where
    F: Fn(&str) -> Option<Option<String>>,
{
    let Some(classification) = classification_mut(root) else {
        return 0;
    };
    let mut touched = 0;
    let previous = std::mem::take(classification);
    for (key, label) in previous {
        let text = coerce_text(&key);
        match rewrite(&text) {
            Some(Some(renamed)) => {
                touched += 1;
                classification.insert(Value::String(renamed), label);
            }
            Some(None) => touched += 1,
            None => {
                classification.insert(key, label);
            }
        }
    }
    touched
}

fn drop_classification<F>(root: &mut Mapping, matches: F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    let Some(classification) = classification_mut(root) else {
        return Vec::new();
    };
    let mut dropped = Vec::new();
    let previous = std::mem::take(classification);
    for (key, label) in previous {
        let text = coerce_text(&key);
        if matches(&text) {
            dropped.push(format!("classification {}", text));
        } else {
            classification.insert(key, label);
        }
    }
    dropped
}
