//! OAuth client-credential token endpoint.

use secrecy::ExposeSecret;
use tracing::{debug, warn};

use splunk_engine_config::OAuthSettings;
use splunk_engine_config::constants::TOKEN_REQUEST_ATTEMPTS;

use crate::auth::AccessTokenResponse;
use crate::error::AccessTokenError;

/// Token endpoint URL for the configured hostname.
///
/// A bare hostname gets `https://` prepended; a value already carrying a
/// scheme is used as-is.
fn token_url(hostname: &str) -> String {
    if hostname.starts_with("http://") || hostname.starts_with("https://") {
        format!(
            "{}/oauth/client_credential/accesstoken",
            hostname.trim_end_matches('/')
        )
    } else {
        format!("https://{hostname}/oauth/client_credential/accesstoken")
    }
}

/// Fetch an access token using the client-credentials grant.
///
/// Only timeouts are retried, up to the fixed attempt budget; there is no
/// inter-attempt delay beyond the request timeout itself. Any other
/// transport error, a non-success status, or an unparseable body fails
/// immediately.
pub(crate) async fn fetch_access_token(
    http: &reqwest::Client,
    settings: &OAuthSettings,
) -> Result<AccessTokenResponse, AccessTokenError> {
    let url = token_url(&settings.hostname);
    debug!(client_id = %settings.client_id, "requesting access token");

    for attempt in 1..=TOKEN_REQUEST_ATTEMPTS {
        let result = http
            .post(&url)
            .query(&[("grant_type", "client_credentials")])
            .basic_auth(
                &settings.client_id,
                Some(settings.client_secret.expose_secret()),
            )
            .send()
            .await;

        match result {
            Err(e) if e.is_timeout() => {
                warn!(attempt, "token endpoint timed out");
            }
            Err(e) => return Err(AccessTokenError::Transport(e)),
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    let message = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "could not read error response body".to_string());
                    return Err(AccessTokenError::Status {
                        status: status.as_u16(),
                        message,
                    });
                }
                return response
                    .json::<AccessTokenResponse>()
                    .await
                    .map_err(AccessTokenError::Transport);
            }
        }
    }

    Err(AccessTokenError::TimeoutExhausted {
        attempts: TOKEN_REQUEST_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_url_from_bare_hostname() {
        assert_eq!(
            token_url("login.example.com"),
            "https://login.example.com/oauth/client_credential/accesstoken"
        );
    }

    #[test]
    fn test_token_url_preserves_scheme() {
        assert_eq!(
            token_url("http://127.0.0.1:9000/"),
            "http://127.0.0.1:9000/oauth/client_credential/accesstoken"
        );
    }
}
