use serde::Serialize;
use std::collections::HashMap;

/// Entity kind as a sum type.
///
/// Kind-specific attributes only exist on the matching variant: dimension
/// references on fact tables, SCD type and the conformed flag on dimension
/// tables.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityKind {
    #[default]
    Table,
    View,
    MaterializedView,
    ExternalTable,
    Snapshot,
    FactTable {
        /// Names of dimension entities this fact joins to
        dimension_refs: Vec<String>,
    },
    DimensionTable {
        scd_type: Option<u8>,
        conformed: bool,
    },
    BridgeTable,
}

impl EntityKind {
    /// Stable snake_case name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Table => "table",
            EntityKind::View => "view",
            EntityKind::MaterializedView => "materialized_view",
            EntityKind::ExternalTable => "external_table",
            EntityKind::Snapshot => "snapshot",
            EntityKind::FactTable { .. } => "fact_table",
            EntityKind::DimensionTable { .. } => "dimension_table",
            EntityKind::BridgeTable => "bridge_table",
        }
    }

    pub fn dimension_refs(&self) -> &[String] {
        match self {
            EntityKind::FactTable { dimension_refs } => dimension_refs,
            _ => &[],
        }
    }
}

/// A column of an entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    /// Declared type, free-form (`integer`, `decimal(12,2)`, ...)
    #[serde(rename = "type")]
    pub data_type: String,
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub foreign_key: bool,
    pub sensitivity: Option<String>,
    pub computed: bool,
    pub check: Option<String>,
    pub default: Option<String>,
    pub description: String,
    pub deprecated: bool,
}

/// A table-like object of the model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub name: String,
    #[serde(flatten)]
    pub kind: EntityKind,
    pub description: String,
    pub tags: Vec<String>,
    pub schema: Option<String>,
    pub database: Option<String>,
    pub subject_area: Option<String>,
    pub owner: Option<String>,
    pub sla: Option<String>,
    pub fields: Vec<Field>,
    /// Natural grouping key; empty when undeclared
    pub grain: Vec<String>,
    pub surrogate_key: Option<String>,
    pub natural_key: Vec<String>,
    #[serde(skip)]
    pub(crate) field_by_name: HashMap<String, usize>,
}

impl Entity {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.field_index(name).map(|i| &self.fields[i])
    }

    /// Position of a field within `fields`
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.field_by_name.get(name).copied()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_by_name.contains_key(name)
    }

    pub fn is_fact(&self) -> bool {
        matches!(self.kind, EntityKind::FactTable { .. })
    }
}
