//! Configuration for the Splunk search engine.
//!
//! This crate defines the configuration surface consumed by the engine crate:
//! connection settings (protocol, host, port, TLS, namespace, path prefix),
//! credential settings (static token, OAuth client credentials, mTLS
//! material), cache tuning, and an environment-variable loader.

pub mod constants;
pub mod loader;
pub mod types;

pub use loader::{ConfigError, load_from_env};
pub use types::{
    AuthConfig, AuthScheme, CacheSettings, Config, ConnectionConfig, MtlsConfig, OAuthSettings,
    Protocol,
};
