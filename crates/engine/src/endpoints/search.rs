//! Search job endpoints.
//!
//! This module provides the HTTP operations of the search job lifecycle.
//!
//! # What this module handles:
//! - Creating search jobs
//! - Getting job status
//! - Retrieving raw results
//! - Cancelling jobs
//!
//! # What this module does NOT handle:
//! - Poll-loop orchestration (see [`crate::engine`])
//! - Result-shape normalization (see [`crate::normalize`])

use reqwest::Client;
use tracing::debug;

use crate::endpoints::{encode_path_segment, extract_entry_content, send_request_with_retry};
use crate::engine::session::Session;
use crate::error::{EngineError, Result};
use crate::metrics::MetricsCollector;
use crate::models::JobStatus;
use crate::redact::redact_query;

/// Options for creating a search job.
#[derive(Debug, Clone, Default)]
pub(crate) struct CreateJobOptions {
    /// Earliest time bound (e.g. "-24h"). Omitted from the form when `None`,
    /// meaning the server default applies.
    pub earliest_time: Option<String>,
    /// Latest time bound (e.g. "now"). Omitted from the form when `None`.
    pub latest_time: Option<String>,
}

/// Create a new search job, returning its SID.
pub(crate) async fn create_job(
    client: &Client,
    session: &Session,
    query: &str,
    options: &CreateJobOptions,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<String> {
    debug!("creating search job: {}", redact_query(query));

    let url = session.url("/search/jobs");

    let mut form_data: Vec<(&str, String)> = vec![
        ("search", query.to_string()),
        ("search_mode", "normal".to_string()),
        ("output_mode", "json".to_string()),
        ("count", "0".to_string()),
    ];

    // Empty time bounds cause 400s from Splunk; skip them like absent ones.
    if let Some(earliest) = &options.earliest_time
        && !earliest.trim().is_empty()
    {
        form_data.push(("earliest_time", earliest.clone()));
    }
    if let Some(latest) = &options.latest_time
        && !latest.trim().is_empty()
    {
        form_data.push(("latest_time", latest.clone()));
    }

    let builder = session.authorize(client.post(&url)).form(&form_data);
    let response =
        send_request_with_retry(builder, max_retries, "/search/jobs", "POST", metrics).await?;

    let resp: serde_json::Value = response.json().await?;

    // Splunk returns either `{"sid": ...}` or the entry-wrapped shape
    // depending on version and output mode.
    let sid = resp
        .get("sid")
        .and_then(|v| v.as_str())
        .or_else(|| {
            resp.get("entry")?
                .get(0)?
                .get("content")?
                .get("sid")?
                .as_str()
        })
        .ok_or_else(|| EngineError::InvalidResponse("missing sid in response".to_string()))?;

    Ok(sid.to_string())
}

/// Get the status of a search job.
pub(crate) async fn get_job_status(
    client: &Client,
    session: &Session,
    sid: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<JobStatus> {
    let encoded_sid = encode_path_segment(sid);
    let url = session.url(&format!("/search/jobs/{encoded_sid}"));

    let builder = session
        .authorize(client.get(&url))
        .query(&[("output_mode", "json")]);
    let response =
        send_request_with_retry(builder, max_retries, "/search/jobs/{sid}", "GET", metrics).await?;

    let resp: serde_json::Value = response.json().await?;
    let content = extract_entry_content(&resp)?;
    serde_json::from_value(content.clone())
        .map_err(|e| EngineError::InvalidResponse(format!("failed to parse job status: {e}")))
}

/// Fetch the full results of a completed job as a raw JSON body.
///
/// `count=0` asks for every result; pagination is left to the server.
pub(crate) async fn get_results(
    client: &Client,
    session: &Session,
    sid: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<serde_json::Value> {
    debug!("fetching results for job {sid}");

    let encoded_sid = encode_path_segment(sid);
    let url = session.url(&format!("/search/jobs/{encoded_sid}/results"));

    let builder = session
        .authorize(client.get(&url))
        .query(&[("output_mode", "json"), ("count", "0")]);
    let response = send_request_with_retry(
        builder,
        max_retries,
        "/search/jobs/{sid}/results",
        "GET",
        metrics,
    )
    .await?;

    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Array(Vec::new()));
    }

    serde_json::from_str(&body)
        .map_err(|e| EngineError::InvalidResponse(format!("failed to parse search results: {e}")))
}

/// Cancel a search job.
pub(crate) async fn cancel_job(
    client: &Client,
    session: &Session,
    sid: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<()> {
    let encoded_sid = encode_path_segment(sid);
    let url = session.url(&format!("/search/jobs/{encoded_sid}/control"));

    let builder = session
        .authorize(client.post(&url))
        .form(&[("action", "cancel")]);
    let _response = send_request_with_retry(
        builder,
        max_retries,
        "/search/jobs/{sid}/control",
        "POST",
        metrics,
    )
    .await?;

    Ok(())
}
