//! Retry helper for HTTP requests.
//!
//! This module wraps request dispatch with retry logic for retryable HTTP
//! statuses (429 and transient gateway errors), using exponential backoff
//! between attempts, and converts non-success responses into
//! [`EngineError::Api`] with Splunk's error messages parsed out of the body.
//! It is the single seam every remote call goes through.

use std::time::Instant;

use reqwest::{RequestBuilder, Response};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::metrics::MetricsCollector;
use crate::models::SplunkMessages;

/// Retry budget applied when the caller passes zero.
const DEFAULT_MAX_RETRIES: usize = 3;

/// Send a request, retrying retryable statuses with exponential backoff.
///
/// Backoff is `2^attempt` seconds. Requests whose builder cannot be cloned
/// (streaming bodies) are sent exactly once.
pub(crate) async fn send_request_with_retry(
    builder: RequestBuilder,
    max_retries: usize,
    endpoint: &'static str,
    method: &'static str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    let max_retries = if max_retries == 0 {
        DEFAULT_MAX_RETRIES
    } else {
        max_retries
    };

    for attempt in 0..=max_retries {
        let attempt_builder = match builder.try_clone() {
            Some(cloned) => cloned,
            None => {
                debug!("request builder cannot be cloned, single attempt only");
                return finish(builder.send().await, endpoint, method, metrics).await;
            }
        };

        let started = Instant::now();
        match attempt_builder.send().await {
            Ok(response)
                if EngineError::is_retryable_status(response.status().as_u16())
                    && attempt < max_retries =>
            {
                let backoff_secs = 2u64.pow(attempt as u32);
                debug!(
                    status = response.status().as_u16(),
                    attempt = attempt + 1,
                    backoff_secs,
                    "retryable response, backing off"
                );
                if let Some(m) = metrics {
                    m.record_retry(endpoint, method);
                }
                tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
            }
            other => {
                if let Some(m) = metrics {
                    let status = other.as_ref().ok().map(|r| r.status().as_u16());
                    m.record_request(endpoint, method, started.elapsed(), status);
                }
                return finish(other, endpoint, method, metrics).await;
            }
        }
    }

    unreachable!("retry loop always returns on the final attempt");
}

/// Convert the transport result into the engine's error shape.
async fn finish(
    result: reqwest::Result<Response>,
    endpoint: &'static str,
    method: &'static str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            if let Some(m) = metrics {
                m.record_error(endpoint, method);
            }
            return Err(EngineError::from(e));
        }
    };

    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "could not read error response body".to_string());

    // Splunk wraps errors in a messages envelope; fall back to the raw body.
    let message = match serde_json::from_str::<SplunkMessages>(&body) {
        Ok(m) if !m.messages.is_empty() => m
            .messages
            .iter()
            .map(|msg| format!("{}: {}", msg.message_type, msg.text))
            .collect::<Vec<_>>()
            .join("; "),
        _ => body,
    };

    if let Some(m) = metrics {
        m.record_error(endpoint, method);
    }
    Err(EngineError::Api {
        status,
        url,
        message,
    })
}
