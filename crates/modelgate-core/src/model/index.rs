use serde::Serialize;

use super::{EntityId, FieldSlot};

/// A secondary index declared on an entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Index {
    pub name: String,
    pub entity: String,
    #[serde(skip)]
    pub entity_id: Option<EntityId>,
    /// Indexed columns in declaration order
    pub fields: Vec<FieldSlot>,
    pub unique: bool,
    /// Index method (`btree`, `hash`, ...), free-form
    pub kind: Option<String>,
}

impl Index {
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
