//! API Handlers
//!
//! HTTP request handlers for each price cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use tracing::{info, warn};

use crate::error::{ApiError, Result};
use crate::models::{HealthResponse, ItemRequest, QuoteResponse};
use crate::resolver::QuoteResolver;

/// Application state shared across all handlers.
///
/// The resolver is stateless across requests, so it is shared behind an Arc
/// without a lock.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<QuoteResolver>,
}

impl AppState {
    /// Creates a new AppState around the given resolver.
    pub fn new(resolver: QuoteResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}

/// Validates the request, resolves the quote and maps every failure to its
/// response category. Non-success outcomes are logged with the key.
pub async fn handle_quote_request(
    resolver: &QuoteResolver,
    request: ItemRequest,
) -> Result<QuoteResponse> {
    if let Some(error_msg) = request.validate() {
        warn!(
            app_id = %request.app_id,
            market_hash_name = %request.market_hash_name,
            outcome = "validation_error",
            "Rejected item request"
        );
        return Err(ApiError::Validation(error_msg));
    }

    let key = request.key();
    match resolver.resolve(&key).await {
        Ok(quote) => Ok(QuoteResponse::from(quote)),
        Err(err) => {
            let api_error = ApiError::from(err.clone());
            let status = api_error.status_code().as_u16();
            if api_error == ApiError::Internal {
                warn!(
                    app_id = key.app_id(),
                    market_hash_name = key.market_hash_name(),
                    outcome = err.kind(),
                    upstream_status = ?err.status(),
                    status,
                    error = %err,
                    "Item request failed"
                );
            } else {
                info!(
                    app_id = key.app_id(),
                    market_hash_name = key.market_hash_name(),
                    outcome = err.kind(),
                    upstream_status = ?err.status(),
                    status,
                    "Item request not served"
                );
            }
            Err(api_error)
        }
    }
}

/// Handler for GET /item/:app_id/:market_hash_name
///
/// Also mounted on GET /item/:app_id and GET /item/:app_id/, where the
/// missing name yields 400. Segments that fail to decode are a 400 as well.
pub async fn get_item_handler(
    State(state): State<AppState>,
    path: std::result::Result<Path<ItemRequest>, PathRejection>,
) -> Result<Json<QuoteResponse>> {
    let Path(request) = path.map_err(reject_path)?;
    handle_quote_request(&state.resolver, request)
        .await
        .map(Json)
}

/// Maps an undecodable item path to a validation error without echoing the
/// extractor's message.
fn reject_path(rejection: PathRejection) -> ApiError {
    warn!(
        outcome = "validation_error",
        reason = %rejection.body_text(),
        "Rejected item request path"
    );
    ApiError::Validation("app_id and market_hash_name must be valid UTF-8 path segments".to_string())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
