//! Time-to-use caching for engine-side metadata.
//!
//! Purpose: provide in-memory caching where each entry carries its own
//! expiry, computed at insertion time rather than from a cache-wide TTL.
//! Responsibilities: store entries with a deadline, evict on expired reads,
//! bound total size, and expose cache metrics.
//! Non-scope: persistent storage or cross-process cache sharing.
//!
//! # Invariants
//! - An entry is never served at or past its deadline.
//! - Expiry is evaluated against a caller-supplied `Instant` (`get_at`), so
//!   tests can fast-forward without sleeping; `get` uses `Instant::now()`.
//! - Population races are tolerated: values are idempotent fetches, so the
//!   last writer wins.

use std::hash::Hash;
use std::time::{Duration, Instant};

use moka::future::Cache as MokaCache;
use moka::policy::EvictionPolicy;
use tracing::trace;

use crate::metrics::MetricsCollector;

/// A cached value with its expiry deadline.
#[derive(Clone, Debug)]
struct TtuEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> TtuEntry<V> {
    fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Size-bounded cache with per-entry time-to-use expiry.
#[derive(Clone, Debug)]
pub struct TtuCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: MokaCache<K, TtuEntry<V>>,
    metrics: Option<MetricsCollector>,
}

impl<K, V> TtuCache<K, V>
where
    K: Hash + Eq + Send + Sync + Clone + std::fmt::Debug + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache bounded to `capacity` entries, evicting LRU.
    pub fn new(capacity: u64) -> Self {
        let inner = MokaCache::builder()
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self {
            inner,
            metrics: None,
        }
    }

    /// Attach a metrics collector for hit/miss counters.
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Get a live entry, evaluating expiry against wall-clock time.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now()).await
    }

    /// Get a live entry, evaluating expiry against `now`.
    pub async fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        match self.inner.get(key).await {
            Some(entry) if entry.is_expired_at(now) => {
                trace!(?key, "cache entry expired");
                self.inner.invalidate(key).await;
                self.record_miss();
                None
            }
            Some(entry) => {
                trace!(?key, "cache hit");
                self.record_hit();
                Some(entry.value)
            }
            None => {
                trace!(?key, "cache miss");
                self.record_miss();
                None
            }
        }
    }

    /// Insert a value that expires `ttu` from now.
    pub async fn insert(&self, key: K, value: V, ttu: Duration) {
        self.insert_at(key, value, ttu, Instant::now()).await;
    }

    /// Insert a value that expires `ttu` from `now`.
    pub async fn insert_at(&self, key: K, value: V, ttu: Duration, now: Instant) {
        self.inner
            .insert(
                key,
                TtuEntry {
                    value,
                    expires_at: now + ttu,
                },
            )
            .await;
    }

    /// Drop an entry regardless of expiry.
    pub async fn invalidate(&self, key: &K) {
        self.inner.invalidate(key).await;
    }

    fn record_hit(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.record_cache_hit();
        }
    }

    fn record_miss(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.record_cache_miss();
        }
    }
}
