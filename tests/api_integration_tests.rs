//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle through the router with a scripted
//! upstream and in-memory or file-backed stores.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use rust_decimal_macros::dec;
use serde_json::Value;
use steam_price_cache::{
    api::create_router,
    cache::{CacheKey, CacheStore, FileStore, MemoryStore},
    error::UpstreamError,
    resolver::{CachePolicy, FixedClock, QuoteResolver, SystemClock},
    upstream::ScriptedUpstream,
    AppState,
};
use tower::ServiceExt;

const REDLINE_PATH: &str = "/item/730/AK-47%20%7C%20Redline%20(Field-Tested)";

// == Helper Functions ==

fn create_app(store: Arc<dyn CacheStore>, upstream: Arc<ScriptedUpstream>) -> Router {
    let resolver = QuoteResolver::new(store, upstream, Arc::new(SystemClock), CachePolicy::default());
    create_router(AppState::new(resolver))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn redline() -> CacheKey {
    CacheKey::new("730", "AK-47 | Redline (Field-Tested)")
}

// == Success Path ==

#[tokio::test]
async fn test_cold_then_warm_request() {
    let store = Arc::new(MemoryStore::new());
    let upstream = Arc::new(ScriptedUpstream::prices(dec!(5.67), dec!(6.12)));
    let app = create_app(store.clone(), upstream.clone());

    let (status, json) = get(&app, REDLINE_PATH).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["app_id"], "730");
    assert_eq!(json["market_hash_name"], "AK-47 | Redline (Field-Tested)");
    assert_eq!(json["highest_buy_order"].as_f64(), Some(5.67));
    assert_eq!(json["lowest_sell_order"].as_f64(), Some(6.12));
    assert_eq!(upstream.calls(), 1);

    let (status, json) = get(&app, REDLINE_PATH).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["highest_buy_order"].as_f64(), Some(5.67));
    assert_eq!(json["lowest_sell_order"].as_f64(), Some(6.12));
    assert_eq!(upstream.calls(), 1, "second request must be served from cache");

    assert!(store.get(&redline()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_app_ids_are_cached_independently() {
    let store = Arc::new(MemoryStore::new());
    let upstream = Arc::new(ScriptedUpstream::prices(dec!(1.00), dec!(2.00)));
    let app = create_app(store.clone(), upstream.clone());

    let (status, _) = get(&app, "/item/730/Sticker").await;
    assert_eq!(status, StatusCode::OK);
    let (status, json) = get(&app, "/item/570/Sticker").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["app_id"], "570");

    assert_eq!(upstream.calls(), 2);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn test_expired_entry_is_refetched() {
    let store = Arc::new(MemoryStore::new());
    let upstream = Arc::new(
        ScriptedUpstream::prices(dec!(5.67), dec!(6.12)).then_prices(dec!(5.90), dec!(6.40)),
    );
    let clock = Arc::new(FixedClock::new(Utc::now()));
    let resolver = QuoteResolver::new(
        store.clone(),
        upstream.clone(),
        clock.clone(),
        CachePolicy::default(),
    );
    let app = create_router(AppState::new(resolver));

    get(&app, REDLINE_PATH).await;
    clock.advance(chrono::Duration::hours(25));
    let (status, json) = get(&app, REDLINE_PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["highest_buy_order"].as_f64(), Some(5.90));
    assert_eq!(upstream.calls(), 2);
}

#[tokio::test]
async fn test_file_store_serves_after_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let upstream = Arc::new(ScriptedUpstream::prices(dec!(5.67), dec!(6.12)));

    let store = Arc::new(FileStore::open(dir.path()).await.unwrap());
    let app = create_app(store, upstream.clone());
    let (status, _) = get(&app, REDLINE_PATH).await;
    assert_eq!(status, StatusCode::OK);
    drop(app);

    // New process: fresh store handle over the same directory
    let store = Arc::new(FileStore::open(dir.path()).await.unwrap());
    let app = create_app(store, upstream.clone());
    let (status, json) = get(&app, REDLINE_PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["lowest_sell_order"].as_f64(), Some(6.12));
    assert_eq!(upstream.calls(), 1);
}

// == Error Mapping ==

#[tokio::test]
async fn test_missing_name_is_bad_request() {
    let store = Arc::new(MemoryStore::new());
    let upstream = Arc::new(ScriptedUpstream::prices(dec!(5.67), dec!(6.12)));
    let app = create_app(store.clone(), upstream.clone());

    let (status, json) = get(&app, "/item/730").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
    assert!(json.get("message").is_some());
    assert_eq!(upstream.calls(), 0);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_empty_segments_are_bad_request() {
    let store = Arc::new(MemoryStore::new());
    let upstream = Arc::new(ScriptedUpstream::prices(dec!(5.67), dec!(6.12)));
    let app = create_app(store.clone(), upstream.clone());

    for uri in ["/item/730/", "/item//Sticker"] {
        let (status, json) = get(&app, uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(json["error"], "validation_error", "{}", uri);
    }
    assert_eq!(upstream.calls(), 0);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_undecodable_name_is_json_bad_request() {
    let upstream = Arc::new(ScriptedUpstream::prices(dec!(5.67), dec!(6.12)));
    let app = create_app(Arc::new(MemoryStore::new()), upstream.clone());

    let (status, json) = get(&app, "/item/730/%FF").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
    assert!(!json.to_string().contains("Invalid URL"));
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_long_name_is_cached_by_file_store() {
    let dir = tempfile::TempDir::new().unwrap();
    let upstream = Arc::new(ScriptedUpstream::prices(dec!(1450.00), dec!(1499.99)));
    let store = Arc::new(FileStore::open(dir.path()).await.unwrap());
    let app = create_app(store, upstream.clone());

    // 210 bytes of UTF-8 in the name alone
    let name = "★".repeat(70);
    let encoded = "%E2%98%85".repeat(70);
    let uri = format!("/item/730/{}", encoded);

    let (status, json) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["market_hash_name"], name.as_str());
    let (status, _) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_upstream_not_found_is_404_and_not_cached() {
    let store = Arc::new(MemoryStore::new());
    let upstream = Arc::new(ScriptedUpstream::failing(UpstreamError::NotFound {
        status: 404,
    }));
    let app = create_app(store.clone(), upstream);

    let (status, json) = get(&app, REDLINE_PATH).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "item_not_found");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_rate_limited_is_429() {
    let upstream = Arc::new(ScriptedUpstream::failing(UpstreamError::RateLimited));
    let app = create_app(Arc::new(MemoryStore::new()), upstream);

    let (status, json) = get(&app, REDLINE_PATH).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["error"], "rate_limit_exceeded");
}

#[tokio::test]
async fn test_timeout_is_504() {
    let upstream = Arc::new(ScriptedUpstream::failing(UpstreamError::Timeout));
    let app = create_app(Arc::new(MemoryStore::new()), upstream);

    let (status, json) = get(&app, REDLINE_PATH).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json["error"], "request_timeout");
}

#[tokio::test]
async fn test_unavailable_is_500_without_detail() {
    let upstream = Arc::new(ScriptedUpstream::failing(UpstreamError::Unavailable {
        status: Some(502),
        reason: "upstream said: secret internals".to_string(),
    }));
    let app = create_app(Arc::new(MemoryStore::new()), upstream);

    let (status, json) = get(&app, REDLINE_PATH).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "internal_server_error");
    assert!(!json.to_string().contains("secret internals"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_app(
        Arc::new(MemoryStore::new()),
        Arc::new(ScriptedUpstream::new()),
    );

    let (status, json) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}
