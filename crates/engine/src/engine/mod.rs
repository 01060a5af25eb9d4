//! Search job orchestration engine.
//!
//! This module provides the primary [`SplunkEngine`] for executing searches
//! against a Splunk deployment: it resolves credentials lazily, submits
//! search jobs, polls them to completion with capped exponential backoff,
//! normalizes results, and maintains the field-schema and saved-search
//! caches.
//!
//! # Submodules
//! - [`builder`]: engine construction and HTTP/TLS configuration
//! - `session`: authenticated session state (private module)
//! - `search`: query execution and the poll loop
//! - `fields`: index schema discovery and its cache
//! - `saved_searches`: credential-keyed saved-search cache
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//! - Token fetching and caching (delegated to [`crate::auth::TokenProvider`])
//!
//! # Invariants
//! - All authenticated operations run through `authed_call!`: a 401/403
//!   forces exactly one re-authentication and retry; a second failure
//!   propagates unmodified
//! - The session is replaced wholesale on re-authentication, never mutated

pub mod builder;
mod fields;
mod saved_searches;
mod search;
pub(crate) mod session;

pub use fields::{StructureManager, convert_attributes};
pub use search::{SearchRequest, normalized_query};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::auth::TokenProvider;
use crate::cache::TtuCache;
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::{FieldDescriptor, SavedSearch};

use session::Session;

/// Macro to wrap an async authenticated call with a single retry after
/// forced re-authentication on 401/403.
///
/// This centralizes the auth-recovery pattern used by every remote
/// operation. The placeholder identifier is bound to the current
/// [`Session`]; on an auth error the session is rebuilt once and the call
/// repeated with the fresh binding.
///
/// ```ignore
/// authed_call!(self, __session, endpoints::search::get_job_status(&self.http, &__session, sid, ...).await)
/// ```
#[macro_export]
macro_rules! authed_call {
    ($engine:expr, $session:ident, $call:expr) => {{
        let $session = $engine.session().await?;
        let result = $call;

        match result {
            Err(e) if e.is_auth_error() => {
                ::tracing::debug!("credentials rejected ({e}), re-authenticating once");
                let $session = $engine.reconnect().await?;
                $call
            }
            other => other,
        }
    }};
}

/// Search job orchestration engine.
///
/// One engine instance serves any number of concurrent callers: methods take
/// `&self`, independent jobs carry no shared mutable state, and only the
/// token/field/saved-search caches and the lazily-created session are
/// shared.
///
/// # Creating an engine
///
/// ```rust,ignore
/// use splunk_engine::SplunkEngine;
/// use splunk_engine_config::Config;
///
/// let engine = SplunkEngine::builder()
///     .from_config(config)
///     .build()?;
/// let records = engine.execute_query(SearchRequest::new("index=main error")).await?;
/// ```
pub struct SplunkEngine {
    pub(crate) http: reqwest::Client,
    pub(crate) services_root: String,
    pub(crate) token_provider: TokenProvider,
    pub(crate) session: RwLock<Option<Arc<Session>>>,
    pub(crate) structure_manager: Option<Arc<dyn StructureManager>>,
    pub(crate) field_cache: TtuCache<String, Vec<FieldDescriptor>>,
    pub(crate) saved_search_cache: TtuCache<u64, Vec<SavedSearch>>,
    pub(crate) field_ttu: Duration,
    pub(crate) saved_search_ttl: Duration,
    pub(crate) max_retries: usize,
    pub(crate) metrics: Option<MetricsCollector>,
    pub(crate) notable_indexes: Vec<String>,
}

impl SplunkEngine {
    /// Create a new engine builder.
    pub fn builder() -> builder::SplunkEngineBuilder {
        builder::SplunkEngineBuilder::new()
    }

    /// The services root every endpoint path is resolved against.
    pub fn services_root(&self) -> &str {
        &self.services_root
    }

    /// Index names configured as notable for this deployment.
    pub fn notable_indexes(&self) -> &[String] {
        &self.notable_indexes
    }

    /// Current session, connecting lazily on first use.
    pub(crate) async fn session(&self) -> Result<Arc<Session>> {
        if let Some(session) = self.session.read().await.as_ref() {
            return Ok(session.clone());
        }
        self.reconnect().await
    }

    /// Build a fresh session and install it, replacing any previous one.
    pub(crate) async fn reconnect(&self) -> Result<Arc<Session>> {
        let bearer = self.token_provider.bearer_token().await?;
        let session = Arc::new(Session::new(
            self.services_root.clone(),
            bearer,
            self.token_provider.scheme(),
        ));
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }
}

impl std::fmt::Debug for SplunkEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplunkEngine")
            .field("services_root", &self.services_root)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}
