//! Result-shape normalization for search job results.
//!
//! The results endpoint answers with either a bare JSON array of entries or
//! an object wrapping them under `results`, and the entry stream interleaves
//! records with diagnostic messages (preview markers, per-peer status).
//! Callers get a flat list of associative records; everything else is
//! dropped.

use serde_json::{Map, Value};
use tracing::trace;

/// An associative search result record.
pub type Record = Map<String, Value>;

/// Extract records from a raw results body, dropping non-record entries.
pub fn records_from_results(body: &Value) -> Vec<Record> {
    let entries = match body {
        Value::Array(entries) => entries.as_slice(),
        Value::Object(_) => body
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut dropped = 0usize;
    for entry in entries {
        match entry {
            Value::Object(record) => records.push(record.clone()),
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        trace!(dropped, "dropped non-record entries from results stream");
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_shaped_body() {
        let body = json!([
            {"host": "web-1", "status": "500"},
            {"host": "web-2", "status": "200"}
        ]);
        let records = records_from_results(&body);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["host"], "web-1");
    }

    #[test]
    fn test_object_shaped_body() {
        let body = json!({
            "preview": false,
            "results": [{"count": "42"}]
        });
        let records = records_from_results(&body);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["count"], "42");
    }

    #[test]
    fn test_non_record_entries_dropped() {
        let body = json!([
            {"host": "web-1"},
            "DEBUG: peer indexer-2 responded",
            17,
            {"host": "web-2"}
        ]);
        let records = records_from_results(&body);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["host"], "web-2");
    }

    #[test]
    fn test_empty_and_malformed_bodies() {
        assert!(records_from_results(&json!([])).is_empty());
        assert!(records_from_results(&json!({"preview": true})).is_empty());
        assert!(records_from_results(&json!("not a result set")).is_empty());
        assert!(records_from_results(&Value::Null).is_empty());
    }
}
