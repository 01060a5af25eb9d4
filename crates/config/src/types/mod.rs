//! Configuration types for the Splunk engine.

mod auth;
mod connection;

pub use auth::{AuthConfig, AuthScheme, OAuthSettings};
pub use connection::{CacheSettings, Config, ConnectionConfig, MtlsConfig, Protocol};

/// Module for serializing `Option<SecretString>` fields.
///
/// Serialization includes the secret for config persistence; secrecy guards
/// runtime logging, not the config store.
pub(crate) mod opt_secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(secret: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret
            .as_ref()
            .map(|s| s.expose_secret())
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map(|s| SecretString::new(s.into())))
    }
}
