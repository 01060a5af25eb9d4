//! Error types for the Splunk engine.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised while resolving an OAuth access token.
#[derive(Error, Debug)]
pub enum AccessTokenError {
    /// OAuth settings are partially configured.
    #[error("OAuth configuration incomplete: {0} is not set")]
    IncompleteConfig(&'static str),

    /// Every attempt against the token endpoint timed out.
    #[error("token endpoint timed out on all {attempts} attempts")]
    TimeoutExhausted { attempts: usize },

    /// The token endpoint answered with a non-success status.
    #[error("token endpoint returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not contain an `access_token`.
    #[error("token response missing access_token")]
    MissingAccessToken,

    /// Transport-level failure other than a timeout.
    #[error("token request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

/// Errors that can occur during engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Access-token resolution failed.
    #[error(transparent)]
    AccessToken(#[from] AccessTokenError),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API error response from Splunk.
    #[error("API error ({status}) at {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    /// Invalid response format from Splunk.
    #[error("invalid response format: {0}")]
    InvalidResponse(String),

    /// Invalid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Client TLS material could not be loaded.
    #[error("TLS configuration error: {0}")]
    Tls(String),

    /// The poll loop observed the job as done, but the final completion
    /// check disagreed.
    #[error("search job {sid} failed the final completion check")]
    JobNotDone { sid: String },

    /// Polling failed too many consecutive times; the job was cancelled.
    #[error("polling search job {sid} failed {attempts} consecutive times")]
    PollFailed {
        sid: String,
        attempts: u32,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Check if an HTTP status code is retryable at the transport layer.
    ///
    /// Retryable status codes:
    /// - 429: Too Many Requests (rate limiting)
    /// - 502, 503, 504: transient gateway errors
    ///
    /// 4xx client errors and 500/501 fail immediately.
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 502 | 503 | 504)
    }

    /// Check if this error indicates the server rejected our credentials.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::Api {
                status: 401 | 403,
                ..
            }
        )
    }

    /// Check if this error is worth retrying in place.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => Self::is_retryable_status(*status),
            _ => false,
        }
    }
}
