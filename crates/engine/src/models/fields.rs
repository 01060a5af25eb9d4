//! Field metadata models for index schema discovery.

use serde::{Deserialize, Serialize};

/// One observed field of an index, with an optional example value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_value: Option<String>,
}

/// Previously indexed dataset schema, as returned by a structure manager.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetStructure {
    /// Raw field entries; each is validated into a [`FieldDescriptor`] on
    /// use.
    #[serde(default)]
    pub attributes: Vec<serde_json::Value>,
}
