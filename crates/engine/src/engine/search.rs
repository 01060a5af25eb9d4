//! Query execution: normalization, submission, polling, result retrieval.
//!
//! # What this module handles:
//! - Query normalization and the `head` limit clause
//! - Submitting search jobs and polling them to completion
//! - Progress tracking and cooperative cancellation
//!
//! # What this module does NOT handle:
//! - HTTP transport (see [`crate::endpoints::search`])
//! - Result-shape normalization (see [`crate::normalize`])
//!
//! # Invariants
//! - A job observed done on the very first poll is never slept on
//! - The consecutive-failure counter resets on any successful poll
//! - Dropping the in-flight future fires exactly one best-effort remote
//!   cancel

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use splunk_engine_config::constants::{
    DEFAULT_RESULT_LIMIT, INITIAL_POLL_INTERVAL_MS, MAX_CONSECUTIVE_POLL_FAILURES,
    MAX_POLL_INTERVAL_SECS,
};

use crate::endpoints;
use crate::endpoints::search::CreateJobOptions;
use crate::engine::SplunkEngine;
use crate::engine::session::Session;
use crate::error::{EngineError, Result};
use crate::models::{SearchJob, SearchStatus};
use crate::normalize::{Record, records_from_results};
use crate::redact::redact_query;

/// A request to execute a search.
///
/// `limit` caps the result count via a `head` clause appended to the
/// dispatched query; `None` or a non-positive value means no explicit cap.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    /// The SPL query to execute.
    pub query: &'a str,
    /// Optional earliest time bound (e.g. "-24h").
    pub earliest: Option<&'a str>,
    /// Optional latest time bound (e.g. "now").
    pub latest: Option<&'a str>,
    /// Result cap; defaults to 100.
    pub limit: Option<i64>,
}

impl<'a> SearchRequest<'a> {
    /// Create a request with the default result limit and no time bounds.
    pub fn new(query: &'a str) -> Self {
        Self {
            query,
            earliest: None,
            latest: None,
            limit: Some(DEFAULT_RESULT_LIMIT),
        }
    }

    /// Set both time bounds.
    pub fn time_bounds(mut self, earliest: &'a str, latest: &'a str) -> Self {
        self.earliest = Some(earliest);
        self.latest = Some(latest);
        self
    }

    /// Set the earliest time bound.
    pub fn earliest(mut self, earliest: &'a str) -> Self {
        self.earliest = Some(earliest);
        self
    }

    /// Set the latest time bound.
    pub fn latest(mut self, latest: &'a str) -> Self {
        self.latest = Some(latest);
        self
    }

    /// Set the result cap. Non-positive values disable the `head` clause.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Remove the result cap entirely.
    pub fn unlimited(mut self) -> Self {
        self.limit = None;
        self
    }
}

/// Normalize a raw query into dispatchable SPL.
///
/// Wrapping whitespace and quote characters are trimmed; queries that do not
/// already start with a pipe or the `search` command get a `search ` prefix.
/// Returns `None` when nothing remains after trimming.
pub fn normalized_query(raw: &str) -> Option<String> {
    let trimmed = trim_wrapping(raw);
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('|') || starts_with_search_command(trimmed) {
        Some(trimmed.to_string())
    } else {
        Some(format!("search {trimmed}"))
    }
}

/// Strip layered wrapping whitespace and quote characters.
fn trim_wrapping(raw: &str) -> &str {
    let mut current = raw.trim();
    loop {
        let stripped = current.trim_matches(['"', '\'']).trim();
        if stripped == current {
            return current;
        }
        current = stripped;
    }
}

fn starts_with_search_command(query: &str) -> bool {
    query == "search"
        || query
            .strip_prefix("search")
            .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}

/// Append the `head` clause for positive limits.
fn dispatched_query(query: String, limit: Option<i64>) -> String {
    match limit {
        Some(limit) if limit > 0 => format!("{query} | head {limit}"),
        _ => query,
    }
}

/// Best-effort remote cancel, fired when an in-flight job is abandoned.
///
/// While armed, dropping the guard (the caller's future was cancelled, or an
/// error path unwound past it) spawns one detached cancel request. Failures
/// of the cancel call itself are swallowed.
struct CancelGuard {
    http: reqwest::Client,
    session: Arc<Session>,
    sid: String,
    armed: bool,
}

impl CancelGuard {
    fn new(http: reqwest::Client, session: Arc<Session>, sid: String) -> Self {
        Self {
            http,
            session,
            sid,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }

    /// Cancel in place (poll-failure path), consuming the guard.
    async fn cancel_now(mut self) {
        self.armed = false;
        debug!(sid = %self.sid, "cancelling search job after repeated poll failures");
        if let Err(e) =
            endpoints::search::cancel_job(&self.http, &self.session, &self.sid, 1, None).await
        {
            debug!(sid = %self.sid, "best-effort cancel failed: {e}");
        }
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let http = self.http.clone();
        let session = self.session.clone();
        let sid = std::mem::take(&mut self.sid);
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                debug!(sid = %sid, "cancelling abandoned search job");
                let _ = endpoints::search::cancel_job(&http, &session, &sid, 1, None).await;
            });
        }
    }
}

impl SplunkEngine {
    /// Execute a query and return its normalized records.
    ///
    /// An empty (or empty-after-trimming) query short-circuits to an empty
    /// result list without touching the network.
    pub async fn execute_query(&self, request: SearchRequest<'_>) -> Result<Vec<Record>> {
        self.execute_query_with_progress(request, None).await
    }

    /// Execute a query, reporting per-poll progress through `progress_cb`.
    ///
    /// The callback sees each [`SearchStatus`] snapshot recorded by the poll
    /// loop. Progress display is a caller concern; the callback is optional.
    pub async fn execute_query_with_progress(
        &self,
        request: SearchRequest<'_>,
        mut progress_cb: Option<&mut (dyn FnMut(&SearchStatus) + Send)>,
    ) -> Result<Vec<Record>> {
        let Some(query) = normalized_query(request.query) else {
            warn!("refusing to dispatch empty search query");
            return Ok(Vec::new());
        };
        let query = dispatched_query(query, request.limit);
        debug!("dispatching search: {}", redact_query(&query));

        let options = CreateJobOptions {
            earliest_time: request.earliest.map(str::to_string),
            latest_time: request.latest.map(str::to_string),
        };

        let sid = crate::authed_call!(
            self,
            __session,
            endpoints::search::create_job(
                &self.http,
                &__session,
                &query,
                &options,
                self.max_retries,
                self.metrics.as_ref(),
            )
            .await
        )?;

        let mut job = SearchJob {
            sid,
            query,
            earliest: request.earliest.map(str::to_string),
            latest: request.latest.map(str::to_string),
            status: SearchStatus::default(),
        };
        let submitted = Instant::now();
        let mut guard = CancelGuard::new(
            self.http.clone(),
            self.session().await?,
            job.sid.clone(),
        );

        let mut interval = Duration::from_millis(INITIAL_POLL_INTERVAL_MS);
        let max_interval = Duration::from_secs(MAX_POLL_INTERVAL_SECS);
        let mut consecutive_failures = 0u32;

        loop {
            let poll = crate::authed_call!(
                self,
                __session,
                endpoints::search::get_job_status(
                    &self.http,
                    &__session,
                    &job.sid,
                    self.max_retries,
                    self.metrics.as_ref(),
                )
                .await
            );

            match poll {
                Ok(status) => {
                    consecutive_failures = 0;
                    job.status = SearchStatus::from_remote(&status, submitted.elapsed());
                    if let Some(cb) = progress_cb.as_deref_mut() {
                        cb(&job.status);
                    }
                    debug!(
                        sid = %job.sid,
                        progress = job.status.progress,
                        scanned = job.status.scan_count,
                        matched = job.status.event_count,
                        results = job.status.result_count,
                        elapsed_ms = job.status.elapsed.as_millis() as u64,
                        "search job progress"
                    );
                    if status.is_done {
                        break;
                    }
                }
                Err(e) => {
                    consecutive_failures += 1;
                    warn!(
                        sid = %job.sid,
                        consecutive_failures,
                        "error polling search job: {e}"
                    );
                    if consecutive_failures >= MAX_CONSECUTIVE_POLL_FAILURES {
                        let sid = job.sid.clone();
                        guard.cancel_now().await;
                        return Err(EngineError::PollFailed {
                            sid,
                            attempts: consecutive_failures,
                            source: Box::new(e),
                        });
                    }
                }
            }

            tokio::time::sleep(interval).await;
            interval = (interval * 2).min(max_interval);
        }

        // The loop observed done; re-check before trusting the results.
        let status = crate::authed_call!(
            self,
            __session,
            endpoints::search::get_job_status(
                &self.http,
                &__session,
                &job.sid,
                self.max_retries,
                self.metrics.as_ref(),
            )
            .await
        )?;
        if !status.is_done {
            return Err(EngineError::JobNotDone { sid: job.sid });
        }
        guard.disarm();

        let raw = crate::authed_call!(
            self,
            __session,
            endpoints::search::get_results(
                &self.http,
                &__session,
                &job.sid,
                self.max_retries,
                self.metrics.as_ref(),
            )
            .await
        )?;

        let records = records_from_results(&raw);
        debug!(sid = %job.sid, records = records.len(), "search job finished");
        Ok(records)
    }
}
