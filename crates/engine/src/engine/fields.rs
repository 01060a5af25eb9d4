//! Index schema discovery and its cache.
//!
//! Field metadata for an index is resolved in three tiers: the local
//! time-to-use cache, then an external structure manager holding previously
//! indexed schema, then a live `fieldsummary` discovery query. Both remote
//! tiers back-fill the cache.

use futures::future::BoxFuture;
use tracing::warn;

use crate::engine::{SearchRequest, SplunkEngine};
use crate::error::Result;
use crate::models::{DatasetStructure, FieldDescriptor};

/// System name this engine registers its datasets under with a structure
/// manager.
const STRUCTURE_SYSTEM: &str = "splunk";

/// SPL issued by [`SplunkEngine::indexes`]: every accessible index name,
/// internal ones included, with no time bounds.
const INDEX_LISTING_QUERY: &str =
    "| eventcount summarize=false index=* index=_* | dedup index | fields index";

/// External collaborator holding previously indexed dataset schema.
///
/// Consulted before falling back to live schema discovery; `None` means the
/// manager has nothing recorded for the index.
pub trait StructureManager: Send + Sync {
    fn dataset_structure<'a>(
        &'a self,
        system: &'a str,
        index: &'a str,
    ) -> BoxFuture<'a, Option<DatasetStructure>>;
}

/// Validate raw structure-manager attributes into field descriptors.
///
/// Parsing stops at the first invalid entry; whatever validated up to that
/// point is returned.
pub fn convert_attributes(attributes: &[serde_json::Value]) -> Vec<FieldDescriptor> {
    let mut fields = Vec::with_capacity(attributes.len());
    for raw in attributes {
        match serde_json::from_value::<FieldDescriptor>(raw.clone()) {
            Ok(field) => fields.push(field),
            Err(e) => {
                warn!(
                    parsed = fields.len(),
                    "invalid field metadata entry, stopping: {e}"
                );
                break;
            }
        }
    }
    fields
}

/// Parse `fieldsummary` rows into field descriptors.
///
/// Each row carries the field name and a `values` JSON blob; the first
/// observed value becomes the example.
fn fields_from_summary(records: &[crate::normalize::Record]) -> Vec<FieldDescriptor> {
    records
        .iter()
        .filter_map(|record| {
            let field_name = record.get("field")?.as_str()?.to_string();
            let example_value = record
                .get("values")
                .and_then(|v| v.as_str())
                .and_then(first_example_from_values);
            Some(FieldDescriptor {
                field_name,
                example_value,
            })
        })
        .collect()
}

fn first_example_from_values(raw: &str) -> Option<String> {
    let values: serde_json::Value = serde_json::from_str(raw).ok()?;
    match values.as_array()?.first()?.get("value") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
        None => None,
    }
}

impl SplunkEngine {
    /// Field metadata for `index`, observed over `lookback` when live
    /// discovery is needed.
    pub async fn fields_for_index(
        &self,
        index: &str,
        lookback: &str,
    ) -> Result<Vec<FieldDescriptor>> {
        let key = index.to_string();
        if let Some(fields) = self.field_cache.get(&key).await {
            return Ok(fields);
        }

        if let Some(manager) = &self.structure_manager
            && let Some(structure) = manager.dataset_structure(STRUCTURE_SYSTEM, index).await
            && !structure.attributes.is_empty()
        {
            let fields = convert_attributes(&structure.attributes);
            self.field_cache
                .insert(key, fields.clone(), self.field_ttu)
                .await;
            return Ok(fields);
        }

        let query = format!("index={index} | fieldsummary | table field values");
        let records = self
            .execute_query(SearchRequest::new(&query).earliest(lookback).unlimited())
            .await?;
        let fields = fields_from_summary(&records);
        self.field_cache
            .insert(key, fields.clone(), self.field_ttu)
            .await;
        Ok(fields)
    }

    /// Names of all accessible indexes, internal ones included.
    pub async fn indexes(&self) -> Result<Vec<String>> {
        let records = self
            .execute_query(SearchRequest::new(INDEX_LISTING_QUERY).unlimited())
            .await?;
        Ok(records
            .iter()
            .filter_map(|record| record.get("index")?.as_str().map(str::to_string))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_attributes_all_valid() {
        let attributes = vec![
            json!({"field_name": "src_ip", "example_value": "10.0.0.1"}),
            json!({"field_name": "host"}),
        ];
        let fields = convert_attributes(&attributes);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field_name, "src_ip");
        assert_eq!(fields[0].example_value.as_deref(), Some("10.0.0.1"));
        assert!(fields[1].example_value.is_none());
    }

    #[test]
    fn test_convert_attributes_stops_at_first_invalid() {
        let attributes = vec![
            json!({"field_name": "src_ip"}),
            json!({"example_value": "no name"}),
            json!({"field_name": "never_reached"}),
        ];
        let fields = convert_attributes(&attributes);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_name, "src_ip");
    }

    #[test]
    fn test_fields_from_summary() {
        let records = vec![
            json!({"field": "status", "values": "[{\"value\":\"404\",\"count\":10}]"}),
            json!({"field": "uri", "values": "not json"}),
            json!({"not_field": true}),
        ]
        .into_iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect::<Vec<_>>();

        let fields = fields_from_summary(&records);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field_name, "status");
        assert_eq!(fields[0].example_value.as_deref(), Some("404"));
        assert_eq!(fields[1].field_name, "uri");
        assert!(fields[1].example_value.is_none());
    }

    #[test]
    fn test_first_example_handles_non_string_values() {
        assert_eq!(
            first_example_from_values("[{\"value\": 42, \"count\": 1}]"),
            Some("42".to_string())
        );
        assert_eq!(first_example_from_values("[]"), None);
        assert_eq!(first_example_from_values("[{\"count\": 1}]"), None);
    }
}
