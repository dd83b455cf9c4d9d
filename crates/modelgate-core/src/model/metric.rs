use serde::Serialize;

use super::{EntityId, FieldSlot};

/// A business metric computed over one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub name: String,
    pub entity: String,
    #[serde(skip)]
    pub entity_id: Option<EntityId>,
    pub expression: String,
    /// Aggregation kind (`sum`, `count`, `avg`, ...), lower-cased
    pub aggregation: String,
    pub grain: Vec<String>,
    pub dimensions: Vec<FieldSlot>,
    pub time_dimension: Option<FieldSlot>,
    pub description: String,
    pub tags: Vec<String>,
}

impl Metric {
    pub fn dimension_names(&self) -> Vec<&str> {
        self.dimensions.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn time_dimension_name(&self) -> Option<&str> {
        self.time_dimension.as_ref().map(|t| t.name.as_str())
    }
}
