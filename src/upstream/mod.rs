//! Upstream Module
//!
//! Client for the metered Steam market price API.
//!
//! Transient failures (429, 5xx, timeouts, network errors) are retried inside
//! the client with exponential backoff; callers never re-invoke a failed fetch.

mod client;
mod fake;
mod retry;

use async_trait::async_trait;

use crate::cache::CacheKey;
use crate::error::UpstreamError;
use crate::models::Quote;

pub use client::{HttpUpstreamClient, UpstreamSettings};
pub use fake::ScriptedUpstream;
pub use retry::RetryPolicy;

/// Fetches authoritative quotes.
///
/// Each call owns its retry budget; nothing is shared between concurrent calls.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn fetch(&self, key: &CacheKey) -> Result<Quote, UpstreamError>;
}
