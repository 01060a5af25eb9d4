//! Saved search endpoints.

use reqwest::Client;
use tracing::debug;

use crate::endpoints::send_request_with_retry;
use crate::engine::session::Session;
use crate::error::{EngineError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{SavedSearch, SavedSearchListResponse};

/// List all saved searches visible to the current credential.
pub(crate) async fn list_saved_searches(
    client: &Client,
    session: &Session,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Vec<SavedSearch>> {
    debug!("listing saved searches");

    let url = session.url("/saved/searches");

    let builder = session
        .authorize(client.get(&url))
        .query(&[("output_mode", "json"), ("count", "0")]);
    let response =
        send_request_with_retry(builder, max_retries, "/saved/searches", "GET", metrics).await?;

    let resp: SavedSearchListResponse = response.json().await.map_err(|e| {
        EngineError::InvalidResponse(format!("failed to parse saved searches response: {e}"))
    })?;

    Ok(resp.into_saved_searches())
}
