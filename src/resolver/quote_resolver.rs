//! Quote Resolver
//!
//! Per request: check the cache, serve a fresh hit, otherwise fetch from
//! upstream and write the result back with a new expiry.
//!
//! Stale entries are never served, even when the upstream fetch fails.
//! A store that cannot be read is treated as a miss.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheKey, CacheStore};
use crate::error::{StoreError, UpstreamError};
use crate::models::Quote;
use crate::resolver::Clock;
use crate::upstream::UpstreamClient;

/// Freshness and store-latency limits, fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    /// How long a filled entry stays fresh
    pub ttl: chrono::Duration,
    /// Upper bound on any single store call
    pub store_timeout: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: chrono::Duration::hours(24),
            store_timeout: Duration::from_secs(5),
        }
    }
}

/// Read-through resolver over a [`CacheStore`] and an [`UpstreamClient`].
///
/// Holds no per-request state; one instance serves all requests.
pub struct QuoteResolver {
    store: Arc<dyn CacheStore>,
    upstream: Arc<dyn UpstreamClient>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
}

impl QuoteResolver {
    pub fn new(
        store: Arc<dyn CacheStore>,
        upstream: Arc<dyn UpstreamClient>,
        clock: Arc<dyn Clock>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            store,
            upstream,
            clock,
            policy,
        }
    }

    /// Returns a fresh quote for `key`, from cache when possible.
    ///
    /// Upstream errors are returned unchanged. Store failures never fail the
    /// request on their own.
    pub async fn resolve(&self, key: &CacheKey) -> Result<Quote, UpstreamError> {
        let now = self.clock.now();

        match self.lookup(key).await {
            Ok(Some(entry)) if entry.is_fresh_at(now) => {
                debug!(
                    app_id = key.app_id(),
                    market_hash_name = key.market_hash_name(),
                    ttl_remaining = entry.ttl_remaining(now),
                    "Cache hit"
                );
                return Ok(entry.quote);
            }
            Ok(Some(entry)) => debug!(
                app_id = key.app_id(),
                market_hash_name = key.market_hash_name(),
                expired_at = %entry.expires_at,
                "Cache entry stale"
            ),
            Ok(None) => debug!(
                app_id = key.app_id(),
                market_hash_name = key.market_hash_name(),
                "Cache miss"
            ),
            Err(err) => warn!(
                app_id = key.app_id(),
                market_hash_name = key.market_hash_name(),
                backend = self.store.backend_type(),
                error = %err,
                "Cache read failed, falling through to upstream"
            ),
        }

        let quote = self.upstream.fetch(key).await?;

        let entry = CacheEntry::new(quote.clone(), self.clock.now(), self.policy.ttl);
        self.write_back(key.clone(), entry).await;

        Ok(quote)
    }

    async fn lookup(&self, key: &CacheKey) -> Result<Option<CacheEntry>, StoreError> {
        tokio::time::timeout(self.policy.store_timeout, self.store.get(key))
            .await
            .map_err(|_| StoreError::Unavailable("read timed out".to_string()))?
    }

    /// Persists a filled entry. Failures are logged and swallowed.
    ///
    /// The write runs on its own task so it still lands if the caller goes away.
    async fn write_back(&self, key: CacheKey, entry: CacheEntry) {
        let store = Arc::clone(&self.store);
        let store_timeout = self.policy.store_timeout;

        let handle = tokio::spawn(async move {
            let expires_at = entry.expires_at;
            match tokio::time::timeout(store_timeout, store.put(&key, entry)).await {
                Ok(Ok(())) => info!(
                    app_id = key.app_id(),
                    market_hash_name = key.market_hash_name(),
                    expires_at = %expires_at,
                    "Cached quote"
                ),
                Ok(Err(err)) => warn!(
                    app_id = key.app_id(),
                    market_hash_name = key.market_hash_name(),
                    error = %err,
                    "Cache write failed"
                ),
                Err(_) => warn!(
                    app_id = key.app_id(),
                    market_hash_name = key.market_hash_name(),
                    "Cache write timed out"
                ),
            }
        });

        if let Err(err) = handle.await {
            warn!(error = %err, "Cache write task failed");
        }
    }
}
