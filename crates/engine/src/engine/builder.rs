//! Engine builder for constructing [`SplunkEngine`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API over the configuration surface
//! - Normalizing and validating the base URL
//! - Configuring the underlying HTTP client (timeout, TLS verification,
//!   client certificates for mutual TLS)
//! - Wiring the caches and the token provider
//!
//! # What this module does NOT handle:
//! - Actual API calls (see the other `engine` submodules)
//! - Token caching (see [`crate::auth::TokenProvider`])
//!
//! # Invariants
//! - The derived services root never ends with a trailing slash
//! - `verify_tls(false)` only affects HTTPS; HTTP URLs log a warning
//! - Inline mTLS PEM takes priority over file paths and never touches disk

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

use splunk_engine_config::constants::DEFAULT_MAX_REDIRECTS;
use splunk_engine_config::{Config, MtlsConfig, Protocol};

use crate::auth::TokenProvider;
use crate::cache::TtuCache;
use crate::engine::{SplunkEngine, StructureManager};
use crate::error::{EngineError, Result};
use crate::metrics::MetricsCollector;

/// Builder for creating a new [`SplunkEngine`].
///
/// Configuration usually arrives wholesale via [`from_config`]; the
/// individual setters exist for embedding code and tests that need to
/// override single knobs.
///
/// [`from_config`]: SplunkEngineBuilder::from_config
pub struct SplunkEngineBuilder {
    config: Config,
    base_url_override: Option<String>,
    structure_manager: Option<Arc<dyn StructureManager>>,
    metrics: Option<MetricsCollector>,
    token_request_timeout: Option<Duration>,
    field_cache_ttu: Option<Duration>,
    saved_search_ttl: Option<Duration>,
}

impl Default for SplunkEngineBuilder {
    fn default() -> Self {
        Self {
            config: Config::default(),
            base_url_override: None,
            structure_manager: None,
            metrics: None,
            token_request_timeout: None,
            field_cache_ttu: None,
            saved_search_ttl: None,
        }
    }
}

impl SplunkEngineBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire configuration.
    pub fn from_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Override the base URL instead of deriving it from the connection
    /// settings. Trailing slashes are removed.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url_override = Some(url.into());
        self
    }

    /// Set an explicit bearer token.
    pub fn token(mut self, token: SecretString) -> Self {
        self.config.auth.token = Some(token);
        self
    }

    /// Set whether to verify the server TLS certificate.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.config.connection.verify_tls = verify;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.connection.timeout = timeout;
        self
    }

    /// Set the app namespace search endpoints are scoped to.
    pub fn app(mut self, app: impl Into<String>) -> Self {
        self.config.connection.app = Some(app.into());
        self
    }

    /// Set the time-to-use for cached field metadata.
    pub fn field_cache_ttu(mut self, ttu: Duration) -> Self {
        self.field_cache_ttu = Some(ttu);
        self
    }

    /// Set the TTL for the saved-search cache.
    pub fn saved_search_ttl(mut self, ttl: Duration) -> Self {
        self.saved_search_ttl = Some(ttl);
        self
    }

    /// Inject the structure-manager collaborator consulted before live
    /// schema-discovery queries.
    pub fn structure_manager(mut self, manager: Arc<dyn StructureManager>) -> Self {
        self.structure_manager = Some(manager);
        self
    }

    /// Set the metrics collector.
    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Override the per-attempt timeout of access-token requests.
    pub fn token_request_timeout(mut self, timeout: Duration) -> Self {
        self.token_request_timeout = Some(timeout);
        self
    }

    /// Build the [`SplunkEngine`] with the configured options.
    pub fn build(self) -> Result<SplunkEngine> {
        let base_url = self
            .base_url_override
            .unwrap_or_else(|| self.config.connection.base_url());
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(EngineError::InvalidUrl(base_url));
        }

        let services_root = match &self.config.connection.app {
            Some(app) => format!("{base_url}/servicesNS/nobody/{app}"),
            None => format!("{base_url}/services"),
        };

        let connection = &self.config.connection;
        let mut http_builder = reqwest::Client::builder()
            .timeout(connection.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

        if !connection.verify_tls {
            if connection.protocol == Protocol::Https || base_url.starts_with("https://") {
                http_builder = http_builder.danger_accept_invalid_certs(true);
            } else {
                tracing::warn!(
                    "verify_tls=false has no effect on HTTP URLs; TLS verification only applies to HTTPS connections"
                );
            }
        }

        if let Some(mtls) = &connection.mtls {
            let pem = identity_pem(mtls)?;
            let identity = reqwest::Identity::from_pem(&pem)
                .map_err(|e| EngineError::Tls(format!("client identity rejected: {e}")))?;
            http_builder = http_builder.identity(identity);
        }

        let http = http_builder.build()?;

        let token_provider = match self.token_request_timeout {
            Some(timeout) => TokenProvider::with_timeout(self.config.auth.clone(), timeout)?,
            None => TokenProvider::new(self.config.auth.clone())?,
        };

        let capacity = self.config.cache.capacity;
        let field_cache = match &self.metrics {
            Some(m) => TtuCache::new(capacity).with_metrics(m.clone()),
            None => TtuCache::new(capacity),
        };
        let saved_search_cache = match &self.metrics {
            Some(m) => TtuCache::new(capacity).with_metrics(m.clone()),
            None => TtuCache::new(capacity),
        };

        Ok(SplunkEngine {
            http,
            services_root,
            token_provider,
            session: RwLock::new(None),
            structure_manager: self.structure_manager,
            field_cache,
            saved_search_cache,
            field_ttu: self
                .field_cache_ttu
                .unwrap_or_else(|| Duration::from_secs(self.config.cache.field_ttu_secs)),
            saved_search_ttl: self
                .saved_search_ttl
                .unwrap_or_else(|| Duration::from_secs(self.config.cache.saved_search_ttl_secs)),
            max_retries: connection.max_retries,
            metrics: self.metrics,
            notable_indexes: self.config.notable_indexes.clone(),
        })
    }
}

/// Assemble the PEM bundle for the client identity.
///
/// Inline PEM data takes priority; otherwise both cert and key paths must be
/// present and readable.
fn identity_pem(mtls: &MtlsConfig) -> Result<Vec<u8>> {
    if let (Some(cert), Some(key)) = (&mtls.cert_pem, &mtls.key_pem) {
        let mut pem = Vec::new();
        pem.extend_from_slice(cert.expose_secret().as_bytes());
        pem.push(b'\n');
        pem.extend_from_slice(key.expose_secret().as_bytes());
        return Ok(pem);
    }

    match (&mtls.cert_path, &mtls.key_path) {
        (Some(cert_path), Some(key_path)) => {
            let mut pem = std::fs::read(cert_path)
                .map_err(|e| EngineError::Tls(format!("reading {}: {e}", cert_path.display())))?;
            pem.push(b'\n');
            let key = std::fs::read(key_path)
                .map_err(|e| EngineError::Tls(format!("reading {}: {e}", key_path.display())))?;
            pem.extend_from_slice(&key);
            Ok(pem)
        }
        _ => Err(EngineError::Tls(
            "mTLS requires both certificate and key (inline PEM or paths)".to_string(),
        )),
    }
}
