//! Search job models.
//!
//! This module contains types for monitoring asynchronous search jobs.
//!
//! # What this module handles:
//! - Remote job status as reported by the job endpoint
//! - Client-side progress tracking for an in-flight job
//!
//! # What this module does NOT handle:
//! - Search execution logic (see [`crate::engine`])
//! - HTTP transport (see [`crate::endpoints`])

use serde::Deserialize;
use std::time::Duration;

/// Remote status of a search job, as reported by the job-status endpoint.
///
/// Numeric fields accept both string and number JSON, since Splunk is not
/// consistent about typing across versions.
#[derive(Debug, Deserialize, Clone)]
pub struct JobStatus {
    pub sid: String,
    #[serde(rename = "isDone", default)]
    pub is_done: bool,
    #[serde(rename = "isFailed", default)]
    pub is_failed: bool,
    #[serde(
        rename = "doneProgress",
        default,
        deserialize_with = "crate::serde_helpers::f64_from_string_or_number"
    )]
    pub done_progress: f64,
    #[serde(
        rename = "runDuration",
        default,
        deserialize_with = "crate::serde_helpers::f64_from_string_or_number"
    )]
    pub run_duration: f64,
    #[serde(
        rename = "scanCount",
        default,
        deserialize_with = "crate::serde_helpers::u64_from_string_or_number"
    )]
    pub scan_count: u64,
    #[serde(
        rename = "eventCount",
        default,
        deserialize_with = "crate::serde_helpers::u64_from_string_or_number"
    )]
    pub event_count: u64,
    #[serde(
        rename = "resultCount",
        default,
        deserialize_with = "crate::serde_helpers::u64_from_string_or_number"
    )]
    pub result_count: u64,
}

/// Client-side progress snapshot of an in-flight job.
///
/// Updated once per poll iteration; `elapsed` is wall-clock time since
/// submission, `progress` is a percentage (0–100).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatus {
    pub progress: f64,
    pub scan_count: u64,
    pub event_count: u64,
    pub result_count: u64,
    pub elapsed: Duration,
}

impl SearchStatus {
    pub(crate) fn from_remote(status: &JobStatus, elapsed: Duration) -> Self {
        Self {
            progress: status.done_progress * 100.0,
            scan_count: status.scan_count,
            event_count: status.event_count,
            result_count: status.result_count,
            elapsed,
        }
    }
}

/// An in-flight search job: created at submission, mutated only by the poll
/// loop, discarded once results are retrieved or the job fails.
#[derive(Debug, Clone)]
pub struct SearchJob {
    pub sid: String,
    pub query: String,
    pub earliest: Option<String>,
    pub latest: Option<String>,
    pub status: SearchStatus,
}
