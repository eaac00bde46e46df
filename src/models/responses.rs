//! Response DTOs for the price cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Quote;

/// Response body for GET /item/:app_id/:market_hash_name
///
/// Prices serialize as JSON numbers.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub app_id: String,
    pub market_hash_name: String,
    pub highest_buy_order: Decimal,
    pub lowest_sell_order: Decimal,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            app_id: quote.app_id,
            market_hash_name: quote.market_hash_name,
            highest_buy_order: quote.highest_buy_order,
            lowest_sell_order: quote.lowest_sell_order,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
///
/// `error` is a stable machine-readable code, `message` a generic description.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
