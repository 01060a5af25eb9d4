//! Centralized constants for the Splunk engine workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default Splunk management port.
pub const DEFAULT_SPLUNK_PORT: u16 = 8089;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum number of transport retries for retryable HTTP statuses.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

// =============================================================================
// Search & Polling Defaults
// =============================================================================

/// Initial sleep between job status polls in milliseconds.
pub const INITIAL_POLL_INTERVAL_MS: u64 = 20;

/// Upper bound on the poll sleep interval in seconds. The interval doubles
/// after every iteration until it reaches this cap.
pub const MAX_POLL_INTERVAL_SECS: u64 = 5;

/// Number of consecutive poll failures tolerated before the job is cancelled
/// and the error propagated.
pub const MAX_CONSECUTIVE_POLL_FAILURES: u32 = 3;

/// Default result limit appended to dispatched queries as a `head` clause.
pub const DEFAULT_RESULT_LIMIT: i64 = 100;

// =============================================================================
// Access Token Defaults
// =============================================================================

/// Timeout for a single access-token request in seconds.
pub const TOKEN_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Total attempts allowed for the access-token request when it times out.
pub const TOKEN_REQUEST_ATTEMPTS: usize = 4;

/// Fraction of `expires_in` after which a cached access token is refreshed.
pub const TOKEN_TTU_FRACTION: f64 = 0.8;

/// Token validity window assumed when the endpoint omits `expires_in`, in
/// seconds.
pub const DEFAULT_TOKEN_WINDOW_SECS: u64 = 3600;

// =============================================================================
// Cache Defaults
// =============================================================================

/// Default time-to-use for cached per-index field metadata, in seconds.
pub const DEFAULT_FIELD_CACHE_TTU_SECS: u64 = 3600;

/// Default TTL for the saved-search cache, in seconds.
pub const DEFAULT_SAVED_SEARCH_TTL_SECS: u64 = 600;

/// Default entry capacity for the engine-side caches.
pub const DEFAULT_CACHE_CAPACITY: u64 = 64;
