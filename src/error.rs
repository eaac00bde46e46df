//! Error types for the price cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Failures of the cache backend. A missing key is not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backend could not be reached or did not answer in time
    #[error("Cache store unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be decoded
    #[error("Corrupt cache record: {0}")]
    Corrupt(String),
}

// == Upstream Error Enum ==
/// Outcomes of a call to the metered price API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// Upstream has no such item (404, or 400 for unknown parameters)
    #[error("Item not found upstream (status {status})")]
    NotFound { status: u16 },

    /// Upstream answered 429
    #[error("Upstream rate limit exceeded")]
    RateLimited,

    /// Connect or read timeout
    #[error("Upstream request timed out")]
    Timeout,

    /// 5xx or a network failure
    #[error("Upstream unavailable: {reason}")]
    Unavailable { status: Option<u16>, reason: String },

    /// Non-retryable status that is not the caller's fault (bad credential, etc.)
    #[error("Upstream rejected request with status {status}")]
    Rejected { status: u16 },

    /// Success status but the body lacks the price fields
    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl UpstreamError {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UpstreamError::RateLimited | UpstreamError::Timeout | UpstreamError::Unavailable { .. }
        )
    }

    /// Stable outcome label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::NotFound { .. } => "upstream_not_found",
            UpstreamError::RateLimited => "upstream_rate_limited",
            UpstreamError::Timeout => "upstream_timeout",
            UpstreamError::Unavailable { .. } => "upstream_unavailable",
            UpstreamError::Rejected { .. } => "upstream_rejected",
            UpstreamError::InvalidResponse(_) => "upstream_invalid_response",
        }
    }

    /// HTTP status reported by upstream, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::NotFound { status } | UpstreamError::Rejected { status } => {
                Some(*status)
            }
            UpstreamError::RateLimited => Some(429),
            UpstreamError::Unavailable { status, .. } => *status,
            UpstreamError::Timeout | UpstreamError::InvalidResponse(_) => None,
        }
    }
}

// == Config Error Enum ==
/// Invalid or missing startup configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

// == API Error Enum ==
/// Response category exposed to callers.
///
/// Carries no upstream detail; each variant renders a fixed message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or empty key component
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Item not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,

    #[error("Internal error")]
    Internal,
}

impl ApiError {
    /// HTTP status for this category.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code placed in the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound => "item_not_found",
            ApiError::RateLimited => "rate_limit_exceeded",
            ApiError::Timeout => "request_timeout",
            ApiError::Internal => "internal_server_error",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::NotFound => "Item not found on Steam market".to_string(),
            ApiError::RateLimited => "Rate limit exceeded, try again later".to_string(),
            ApiError::Timeout => "Price API request timed out".to_string(),
            ApiError::Internal => "An unexpected error occurred".to_string(),
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotFound { .. } => ApiError::NotFound,
            UpstreamError::RateLimited => ApiError::RateLimited,
            UpstreamError::Timeout => ApiError::Timeout,
            UpstreamError::Unavailable { .. }
            | UpstreamError::Rejected { .. }
            | UpstreamError::InvalidResponse(_) => ApiError::Internal,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.code(), self.message()));
        (self.status_code(), body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
