//! Cache Store Module
//!
//! The storage seam the resolver depends on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::cache::{CacheEntry, CacheKey};
use crate::error::StoreError;

/// Key-value persistence for quotes with per-entry expiry.
///
/// Implementations must be safe to call from many requests at once.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the stored entry regardless of freshness, or `None` if the
    /// key was never written. Absence is not an error.
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, StoreError>;

    /// Unconditional upsert. Quote and expiry are written atomically.
    async fn put(&self, key: &CacheKey, entry: CacheEntry) -> Result<(), StoreError>;

    /// Removes entries whose expiry is at or before `now`.
    ///
    /// Returns the number of entries removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;

    /// Returns the backend type as a string identifier.
    fn backend_type(&self) -> &'static str;
}
