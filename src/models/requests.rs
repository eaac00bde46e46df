//! Request DTOs for the price cache API
//!
//! Defines the path parameters accepted by the item endpoint.

use serde::Deserialize;

use crate::cache::CacheKey;

/// Path parameters for GET /item/:app_id/:market_hash_name
///
/// Segments arrive percent-decoded. Both default to empty so a missing
/// segment is reported as a validation error rather than a routing miss.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemRequest {
    /// Steam application id, kept as opaque text
    #[serde(default)]
    pub app_id: String,
    /// Market hash name, may contain spaces and punctuation
    #[serde(default)]
    pub market_hash_name: String,
}

impl ItemRequest {
    /// Creates a new ItemRequest
    pub fn new(app_id: impl Into<String>, market_hash_name: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            market_hash_name: market_hash_name.into(),
        }
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.app_id.is_empty() || self.market_hash_name.is_empty() {
            return Some("app_id and market_hash_name are required".to_string());
        }
        None
    }

    /// Builds the cache key. No normalization is applied.
    pub fn key(&self) -> CacheKey {
        CacheKey::new(self.app_id.clone(), self.market_hash_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_market_hash_name() {
        let req = ItemRequest::new("730", "");
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_empty_app_id() {
        let req = ItemRequest::new("", "AK-47 | Redline (Field-Tested)");
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = ItemRequest::new("730", "AK-47 | Redline (Field-Tested)");
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_missing_field_defaults_to_empty() {
        let req: ItemRequest = serde_json::from_str(r#"{"app_id": "730"}"#).unwrap();
        assert_eq!(req.market_hash_name, "");
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_key_preserves_case_and_whitespace() {
        let req = ItemRequest::new("730", " Sticker | Team Liquid ");
        let key = req.key();
        assert_eq!(key.market_hash_name(), " Sticker | Team Liquid ");
    }
}
