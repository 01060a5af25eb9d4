//! Authenticated session state.
//!
//! A [`Session`] is the immutable product of one authentication pass: the
//! effective services root URL (base URL, path prefix, and app namespace
//! applied once) plus the resolved bearer token and header scheme. The
//! engine holds the current session behind an async `RwLock<Option<...>>`:
//! `None` is the disconnected state, the guarded accessor connects lazily,
//! and re-authentication replaces the `Arc` wholesale so concurrent readers
//! never observe a half-initialized session.
//!
//! Request rewriting (auth header scheme, URL prefixing) happens here and
//! only here; endpoint functions never touch headers or roots themselves.

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

use splunk_engine_config::AuthScheme;

/// One authentication pass' worth of request-building state.
#[derive(Clone)]
pub(crate) struct Session {
    services_root: String,
    bearer: Option<SecretString>,
    scheme: AuthScheme,
}

impl Session {
    pub(crate) fn new(
        services_root: String,
        bearer: Option<SecretString>,
        scheme: AuthScheme,
    ) -> Self {
        Self {
            services_root,
            bearer,
            scheme,
        }
    }

    /// Full URL for an endpoint path under the services root.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.services_root, path)
    }

    /// Attach the authorization header, if the session carries a credential.
    pub(crate) fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.bearer {
            Some(token) => builder.header(
                "Authorization",
                format!("{} {}", self.scheme.as_str(), token.expose_secret()),
            ),
            None => builder,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("services_root", &self.services_root)
            .field("authenticated", &self.bearer.is_some())
            .finish()
    }
}
