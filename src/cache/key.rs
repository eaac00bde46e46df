//! Cache key identity.

use std::fmt;

/// Identity of a cached quote.
///
/// Two keys are equal iff both fields match exactly. No case folding or
/// trimming is applied; the same market_hash_name under two app_ids yields
/// two independent keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    app_id: String,
    market_hash_name: String,
}

impl CacheKey {
    pub fn new(app_id: impl Into<String>, market_hash_name: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            market_hash_name: market_hash_name.into(),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn market_hash_name(&self) -> &str {
        &self.market_hash_name
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_id, self.market_hash_name)
    }
}
