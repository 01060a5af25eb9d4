//! Data models for the Splunk engine.

mod fields;
mod jobs;
mod saved_searches;

pub use fields::{DatasetStructure, FieldDescriptor};
pub use jobs::{JobStatus, SearchJob, SearchStatus};
pub use saved_searches::{SavedSearch, SavedSearchListResponse};

use serde::Deserialize;

/// Splunk error-message envelope returned alongside non-success statuses.
#[derive(Debug, Deserialize)]
pub struct SplunkMessages {
    pub messages: Vec<SplunkMessage>,
}

#[derive(Debug, Deserialize)]
pub struct SplunkMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub text: String,
}
