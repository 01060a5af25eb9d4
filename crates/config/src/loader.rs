//! Environment variable loading for configuration.
//!
//! Responsibilities:
//! - Read and parse `SPLUNK_ENGINE_*` environment variables into a [`Config`].
//! - Load a `.env` file (via dotenvy) before reading the process environment.
//! - Validate the resulting connection settings.
//!
//! Does NOT handle:
//! - Profile/config-file loading; deployments of this engine configure it
//!   through the environment of the embedding service.
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid numeric or boolean values return [`ConfigError::InvalidValue`].
//! - Dotenv errors never include raw `.env` line contents.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::types::{AuthScheme, Config, MtlsConfig, Protocol};

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Invalid connection settings: {0}")]
    InvalidConnection(String),
}

/// Read an environment variable, returning None if unset, empty, or
/// whitespace-only. The returned value is trimmed.
fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn env_parse<T: std::str::FromStr>(key: &str, expected: &str) -> Result<Option<T>, ConfigError> {
    match env_var_or_none(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                var: key.to_string(),
                message: format!("must be {expected}"),
            }),
    }
}

fn env_secret(key: &str) -> Option<SecretString> {
    env_var_or_none(key).map(|s| SecretString::new(s.into()))
}

/// Load configuration from the process environment.
///
/// A `.env` file in the working directory is loaded first when present;
/// variables already set in the environment take precedence over it.
pub fn load_from_env() -> Result<Config, ConfigError> {
    if dotenvy::dotenv().is_ok() {
        debug!("loaded .env file");
    }

    let mut config = Config::default();

    if let Some(protocol) = env_parse::<Protocol>("SPLUNK_ENGINE_PROTOCOL", "http or https")? {
        config.connection.protocol = protocol;
    }
    if let Some(host) = env_var_or_none("SPLUNK_ENGINE_HOST") {
        config.connection.host = host;
    }
    if let Some(port) = env_parse::<u16>("SPLUNK_ENGINE_PORT", "a port number")? {
        config.connection.port = port;
    }
    if let Some(verify) = env_parse::<bool>("SPLUNK_ENGINE_VERIFY_TLS", "true or false")? {
        config.connection.verify_tls = verify;
    }
    config.connection.app = env_var_or_none("SPLUNK_ENGINE_APP");
    config.connection.path_prefix = env_var_or_none("SPLUNK_ENGINE_PATH_PREFIX");
    if let Some(secs) = env_parse::<u64>("SPLUNK_ENGINE_TIMEOUT_SECS", "a number of seconds")? {
        config.connection.timeout = Duration::from_secs(secs);
    }
    if let Some(retries) =
        env_parse::<usize>("SPLUNK_ENGINE_MAX_RETRIES", "a non-negative integer")?
    {
        config.connection.max_retries = retries;
    }

    let mtls = MtlsConfig {
        cert_path: env_var_or_none("SPLUNK_ENGINE_MTLS_CERT_PATH").map(PathBuf::from),
        key_path: env_var_or_none("SPLUNK_ENGINE_MTLS_KEY_PATH").map(PathBuf::from),
        cert_pem: env_secret("SPLUNK_ENGINE_MTLS_CERT_PEM"),
        key_pem: env_secret("SPLUNK_ENGINE_MTLS_KEY_PEM"),
    };
    if mtls.cert_path.is_some()
        || mtls.key_path.is_some()
        || mtls.cert_pem.is_some()
        || mtls.key_pem.is_some()
    {
        config.connection.mtls = Some(mtls);
    }

    config.auth.token = env_secret("SPLUNK_ENGINE_TOKEN");
    config.auth.oauth_hostname = env_var_or_none("SPLUNK_ENGINE_OAUTH_HOSTNAME");
    config.auth.oauth_client_id = env_var_or_none("SPLUNK_ENGINE_OAUTH_CLIENT_ID");
    config.auth.oauth_client_secret = env_secret("SPLUNK_ENGINE_OAUTH_CLIENT_SECRET");
    if let Some(scheme) = env_var_or_none("SPLUNK_ENGINE_AUTH_SCHEME") {
        config.auth.scheme = match scheme.to_ascii_lowercase().as_str() {
            "bearer" => AuthScheme::Bearer,
            "splunk" => AuthScheme::Splunk,
            _ => {
                return Err(ConfigError::InvalidValue {
                    var: "SPLUNK_ENGINE_AUTH_SCHEME".to_string(),
                    message: "must be bearer or splunk".to_string(),
                });
            }
        };
    }

    if let Some(ttu) = env_parse::<u64>("SPLUNK_ENGINE_FIELD_CACHE_TTU_SECS", "a number")? {
        config.cache.field_ttu_secs = ttu;
    }
    if let Some(ttl) = env_parse::<u64>("SPLUNK_ENGINE_SAVED_SEARCH_TTL_SECS", "a number")? {
        config.cache.saved_search_ttl_secs = ttl;
    }
    if let Some(indexes) = env_var_or_none("SPLUNK_ENGINE_NOTABLE_INDEXES") {
        config.notable_indexes = indexes
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    validate(&config)?;
    Ok(config)
}

/// Validate connection settings by round-tripping the base URL through `url`.
fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.connection.host.is_empty() {
        return Err(ConfigError::InvalidConnection(
            "host must not be empty".to_string(),
        ));
    }
    url::Url::parse(&config.connection.base_url())
        .map_err(|e| ConfigError::InvalidConnection(format!("base URL does not parse: {e}")))?;
    Ok(())
}
