//! Credential-keyed saved-search cache.
//!
//! Saved searches are listed live at most once per TTL window. The cache key
//! is a fingerprint of the active credential, so entries never leak between
//! engines carrying different credentials that happen to share a process.

use crate::endpoints;
use crate::engine::SplunkEngine;
use crate::error::Result;
use crate::models::SavedSearch;

impl SplunkEngine {
    /// Saved searches visible to the current credential.
    pub async fn saved_searches(&self) -> Result<Vec<SavedSearch>> {
        let key = self.token_provider.fingerprint();
        if let Some(searches) = self.saved_search_cache.get(&key).await {
            return Ok(searches);
        }

        let searches = crate::authed_call!(
            self,
            __session,
            endpoints::saved::list_saved_searches(
                &self.http,
                &__session,
                self.max_retries,
                self.metrics.as_ref(),
            )
            .await
        )?;

        self.saved_search_cache
            .insert(key, searches.clone(), self.saved_search_ttl)
            .await;
        Ok(searches)
    }
}
