//! Credential resolution and access-token caching.
//!
//! This module resolves the bearer token used for authenticated requests:
//! an explicit token is returned as-is, OAuth client credentials go through
//! the token endpoint with a single-entry time-to-use cache, and an engine
//! configured with neither runs unauthenticated (mTLS-only deployments).
//!
//! # What this module does NOT handle:
//! - Session construction and the auth header hook (see `engine::session`)
//! - The HTTP exchange with the token endpoint (see `endpoints::oauth`)
//!
//! # Invariants
//! - Explicit token > OAuth; OAuth settings are ignored when a token is set.
//! - At most one token response is cached; a fetch while a live entry exists
//!   returns the cached token without a network call.
//! - The raw token response is cached (not just the token string) so expiry
//!   metadata survives for later time-to-use computation.
//! - Cache expiry is evaluated against a caller-supplied `Instant`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use splunk_engine_config::constants::{DEFAULT_TOKEN_WINDOW_SECS, TOKEN_TTU_FRACTION};
use splunk_engine_config::{AuthConfig, AuthScheme};

use crate::endpoints::oauth;
use crate::error::AccessTokenError;

/// Raw JSON body returned by the OAuth token endpoint.
///
/// Kept opaque: the engine only reads `access_token` and `expires_in`, but
/// the full map is retained so expiry metadata survives in the cache.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct AccessTokenResponse(serde_json::Map<String, serde_json::Value>);

impl AccessTokenResponse {
    pub fn access_token(&self) -> Option<&str> {
        self.0.get("access_token").and_then(|v| v.as_str())
    }

    /// `expires_in` in seconds, accepting number or string typing.
    pub fn expires_in(&self) -> Option<u64> {
        let value = self.0.get("expires_in")?;
        value
            .as_u64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
    }

    /// How long the cached token may be used before a refresh is forced:
    /// 80% of `expires_in`, assuming a one-hour window when absent.
    pub fn time_to_use(&self) -> Duration {
        let window = self.expires_in().unwrap_or(DEFAULT_TOKEN_WINDOW_SECS);
        Duration::from_secs_f64(window as f64 * TOKEN_TTU_FRACTION)
    }
}

/// A cached token response with its refresh deadline.
#[derive(Debug)]
struct CachedAccessToken {
    token: SecretString,
    #[allow(dead_code)]
    response: AccessTokenResponse,
    expires_at: Instant,
}

/// Resolves bearer tokens for the engine.
#[derive(Debug)]
pub struct TokenProvider {
    auth: AuthConfig,
    http: reqwest::Client,
    cached: Mutex<Option<CachedAccessToken>>,
}

impl TokenProvider {
    /// Create a provider with the default token-request timeout.
    pub fn new(auth: AuthConfig) -> crate::error::Result<Self> {
        Self::with_timeout(
            auth,
            Duration::from_secs(splunk_engine_config::constants::TOKEN_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Create a provider with an explicit token-request timeout.
    pub fn with_timeout(auth: AuthConfig, timeout: Duration) -> crate::error::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            auth,
            http,
            cached: Mutex::new(None),
        })
    }

    /// Header scheme the resolved token should be attached with.
    pub fn scheme(&self) -> AuthScheme {
        self.auth.scheme
    }

    /// Resolve the bearer token, evaluating cache expiry against wall-clock
    /// time. `None` means the engine runs unauthenticated.
    pub async fn bearer_token(&self) -> Result<Option<SecretString>, AccessTokenError> {
        self.bearer_token_at(Instant::now()).await
    }

    /// Resolve the bearer token, evaluating cache expiry against `now`.
    pub async fn bearer_token_at(
        &self,
        now: Instant,
    ) -> Result<Option<SecretString>, AccessTokenError> {
        if let Some(token) = &self.auth.token {
            return Ok(Some(token.clone()));
        }
        if !self.auth.has_oauth_settings() {
            return Ok(None);
        }
        let settings = self
            .auth
            .oauth_settings()
            .map_err(AccessTokenError::IncompleteConfig)?;

        // The lock is held across the fetch so concurrent refreshes collapse
        // into a single network call.
        let mut cached = self.cached.lock().await;
        if let Some(entry) = cached.as_ref()
            && now < entry.expires_at
        {
            return Ok(Some(entry.token.clone()));
        }

        let response = oauth::fetch_access_token(&self.http, &settings).await?;
        let token = SecretString::new(
            response
                .access_token()
                .ok_or(AccessTokenError::MissingAccessToken)?
                .to_string()
                .into(),
        );
        let ttu = response.time_to_use();
        debug!(ttu_secs = ttu.as_secs(), "caching access token");
        *cached = Some(CachedAccessToken {
            token: token.clone(),
            response,
            expires_at: now + ttu,
        });
        Ok(Some(token))
    }

    /// Stable per-process fingerprint of the active credential, used to key
    /// caches so entries never leak across distinct credentials.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        if let Some(token) = &self.auth.token {
            "token".hash(&mut hasher);
            token.expose_secret().hash(&mut hasher);
        } else if let Ok(settings) = self.auth.oauth_settings() {
            "oauth".hash(&mut hasher);
            settings.hostname.hash(&mut hasher);
            settings.client_id.hash(&mut hasher);
            settings.client_secret.expose_secret().hash(&mut hasher);
        } else {
            "anonymous".hash(&mut hasher);
        }
        hasher.finish()
    }
}
