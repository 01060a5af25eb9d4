//! Metrics collection for API call performance.
//!
//! This module provides metrics collection for Splunk API calls, including:
//! - Request latency histograms
//! - Request counters (total, retries, errors)
//! - Cache hit/miss counters
//!
//! # What this module does NOT handle:
//! - Metrics exposition/export (install a recorder in the embedding
//!   application, e.g. `metrics-exporter-prometheus`)
//! - Persistent storage of metrics
//!
//! # Invariants
//! - All metrics use consistent label names: `endpoint`, `method`, `status`
//! - Metric recording is infallible; failures never disrupt API calls
//! - Zero-cost when no metrics recorder is installed

use std::time::Duration;

/// Metric name for request duration histogram.
pub const METRIC_REQUEST_DURATION: &str = "splunk_engine_request_duration_seconds";

/// Metric name for total request counter.
pub const METRIC_REQUESTS_TOTAL: &str = "splunk_engine_requests_total";

/// Metric name for retry counter.
pub const METRIC_RETRIES_TOTAL: &str = "splunk_engine_retries_total";

/// Metric name for error counter.
pub const METRIC_ERRORS_TOTAL: &str = "splunk_engine_errors_total";

/// Metric name for cache hit counter.
pub const METRIC_CACHE_HITS: &str = "splunk_engine_cache_hits_total";

/// Metric name for cache miss counter.
pub const METRIC_CACHE_MISSES: &str = "splunk_engine_cache_misses_total";

/// Metrics collector for Splunk API calls.
///
/// A lightweight wrapper around the `metrics` crate macros providing
/// type-safe methods with consistent labels.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    /// Create a new metrics collector (enabled).
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a disabled collector that records nothing.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Check if metrics collection is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record the duration and outcome of an API request.
    ///
    /// `status` is `None` when the request failed before a response arrived.
    pub fn record_request(
        &self,
        endpoint: &'static str,
        method: &'static str,
        duration: Duration,
        status: Option<u16>,
    ) {
        if !self.enabled {
            return;
        }
        let status_label = status.map_or("error".to_string(), |s| s.to_string());
        metrics::histogram!(METRIC_REQUEST_DURATION,
            "endpoint" => endpoint,
            "method" => method,
            "status" => status_label.clone(),
        )
        .record(duration.as_secs_f64());
        metrics::counter!(METRIC_REQUESTS_TOTAL,
            "endpoint" => endpoint,
            "method" => method,
            "status" => status_label,
        )
        .increment(1);
    }

    /// Record a transport-level retry.
    pub fn record_retry(&self, endpoint: &'static str, method: &'static str) {
        if !self.enabled {
            return;
        }
        metrics::counter!(METRIC_RETRIES_TOTAL,
            "endpoint" => endpoint,
            "method" => method,
        )
        .increment(1);
    }

    /// Record a failed request.
    pub fn record_error(&self, endpoint: &'static str, method: &'static str) {
        if !self.enabled {
            return;
        }
        metrics::counter!(METRIC_ERRORS_TOTAL,
            "endpoint" => endpoint,
            "method" => method,
        )
        .increment(1);
    }

    /// Record a cache hit.
    pub fn record_cache_hit(&self) {
        if self.enabled {
            metrics::counter!(METRIC_CACHE_HITS).increment(1);
        }
    }

    /// Record a cache miss.
    pub fn record_cache_miss(&self) {
        if self.enabled {
            metrics::counter!(METRIC_CACHE_MISSES).increment(1);
        }
    }
}
