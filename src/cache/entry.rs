//! Cache Entry Module
//!
//! A quote together with its absolute expiry.

use chrono::{DateTime, Duration, Utc};

use crate::models::Quote;

// == Cache Entry ==
/// Represents a single cache entry: the quote and when it stops being fresh.
///
/// Quote and expiry are always written together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The cached quote
    pub quote: Quote,
    /// Expiration timestamp
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl` after `now`.
    pub fn new(quote: Quote, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            quote,
            expires_at: now + ttl,
        }
    }

    // == Is Fresh ==
    /// Checks freshness against `now`.
    ///
    /// Boundary condition: an entry is stale once `now >= expires_at`.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    // == Time To Live ==
    /// Returns remaining TTL in seconds at `now`, zero once expired.
    pub fn ttl_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}
