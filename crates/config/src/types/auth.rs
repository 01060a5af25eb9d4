//! Credential configuration types.
//!
//! Responsibilities:
//! - Define the credential surface: static bearer token, OAuth
//!   client-credential settings, auth header scheme.
//! - Keep secrets wrapped in `SecretString` so Debug output never leaks them.
//!
//! Does NOT handle:
//! - Token resolution or caching (engine crate).
//! - mTLS material (part of `ConnectionConfig`, it configures the transport
//!   rather than a bearer credential).
//!
//! Invariants:
//! - An explicit token always takes priority over OAuth settings.
//! - The three OAuth fields are independently optional; completeness is
//!   validated where the token is resolved, not at load time.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Header scheme used when attaching the resolved token to requests.
///
/// Splunk accepts `Authorization: Bearer <token>` for API tokens and
/// `Authorization: Splunk <token>` for session keys; gateways in front of a
/// deployment sometimes require one or the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    #[default]
    Bearer,
    Splunk,
}

impl AuthScheme {
    /// The literal scheme name placed before the token in the header value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Bearer => "Bearer",
            AuthScheme::Splunk => "Splunk",
        }
    }
}

impl std::fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Explicit bearer token. When present, OAuth settings are ignored.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::types::opt_secret_string"
    )]
    pub token: Option<SecretString>,
    /// Hostname of the OAuth token endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_hostname: Option<String>,
    /// OAuth client id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_client_id: Option<String>,
    /// OAuth client secret.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::types::opt_secret_string"
    )]
    pub oauth_client_secret: Option<SecretString>,
    /// Header scheme for the resolved token.
    #[serde(default)]
    pub scheme: AuthScheme,
}

/// Validated view over the OAuth fields of an [`AuthConfig`].
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub hostname: String,
    pub client_id: String,
    pub client_secret: SecretString,
}

impl AuthConfig {
    /// Whether any OAuth setting is present (possibly incomplete).
    pub fn has_oauth_settings(&self) -> bool {
        self.oauth_hostname.is_some()
            || self.oauth_client_id.is_some()
            || self.oauth_client_secret.is_some()
    }

    /// Assemble the OAuth settings, naming the first missing field.
    pub fn oauth_settings(&self) -> Result<OAuthSettings, &'static str> {
        let hostname = self.oauth_hostname.clone().ok_or("oauth_hostname")?;
        let client_id = self.oauth_client_id.clone().ok_or("oauth_client_id")?;
        let client_secret = self
            .oauth_client_secret
            .clone()
            .ok_or("oauth_client_secret")?;
        Ok(OAuthSettings {
            hostname,
            client_id,
            client_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_oauth_settings_complete() {
        let auth = AuthConfig {
            oauth_hostname: Some("login.example.com".to_string()),
            oauth_client_id: Some("client-1".to_string()),
            oauth_client_secret: Some(SecretString::new("s3cret".to_string().into())),
            ..AuthConfig::default()
        };

        assert!(auth.has_oauth_settings());
        let settings = auth.oauth_settings().unwrap();
        assert_eq!(settings.hostname, "login.example.com");
        assert_eq!(settings.client_id, "client-1");
        assert_eq!(settings.client_secret.expose_secret(), "s3cret");
    }

    #[test]
    fn test_oauth_settings_names_missing_field() {
        let auth = AuthConfig {
            oauth_hostname: Some("login.example.com".to_string()),
            oauth_client_id: Some("client-1".to_string()),
            ..AuthConfig::default()
        };

        assert!(auth.has_oauth_settings());
        assert_eq!(auth.oauth_settings().unwrap_err(), "oauth_client_secret");
    }

    #[test]
    fn test_no_oauth_settings() {
        let auth = AuthConfig::default();
        assert!(!auth.has_oauth_settings());
    }

    /// The client secret must not appear in Debug output.
    #[test]
    fn test_secret_not_exposed_in_debug() {
        let auth = AuthConfig {
            token: Some(SecretString::new("token-abc".to_string().into())),
            oauth_client_secret: Some(SecretString::new("secret-xyz".to_string().into())),
            ..AuthConfig::default()
        };

        let debug_output = format!("{:?}", auth);
        assert!(!debug_output.contains("token-abc"));
        assert!(!debug_output.contains("secret-xyz"));
    }

    #[test]
    fn test_auth_scheme_display() {
        assert_eq!(AuthScheme::Bearer.to_string(), "Bearer");
        assert_eq!(AuthScheme::Splunk.to_string(), "Splunk");
        assert_eq!(AuthScheme::default(), AuthScheme::Bearer);
    }
}
