//! HTTP client for the SteamApis market item endpoint.
//!
//! GET {base_url}/{app_id}/{market_hash_name}?api_key=... returning JSON with
//! `highest_buy_order` and `lowest_sell_order`, either at the top level or
//! nested under `histogram`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info};

use super::{RetryPolicy, UpstreamClient};
use crate::cache::CacheKey;
use crate::error::{ConfigError, UpstreamError};
use crate::models::Quote;

/// Longest slice of an upstream error body kept in logs
const MAX_LOGGED_BODY: usize = 256;

/// Everything needed to build an [`HttpUpstreamClient`].
#[derive(Clone)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub retry: RetryPolicy,
}

impl fmt::Debug for UpstreamSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

/// reqwest-backed [`UpstreamClient`].
///
/// Stateless apart from the connection pool, so one instance is shared by
/// all requests.
pub struct HttpUpstreamClient {
    client: Client,
    base_url: Url,
    api_key: String,
    retry: RetryPolicy,
}

impl HttpUpstreamClient {
    pub fn new(settings: UpstreamSettings) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| ConfigError::Invalid {
            name: "UPSTREAM_BASE_URL",
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                name: "UPSTREAM_BASE_URL",
                reason: "URL cannot carry path segments".to_string(),
            });
        }

        // Hard cap on a single attempt on top of the per-phase timeouts
        let attempt_deadline = settings.connect_timeout + settings.read_timeout;
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .read_timeout(settings.read_timeout)
            .timeout(attempt_deadline)
            .user_agent(concat!("steam-price-cache/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::Invalid {
                name: "http client",
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            api_key: settings.api_key,
            retry: settings.retry,
        })
    }

    /// Builds the item URL; path segments are percent-encoded here.
    fn item_url(&self, key: &CacheKey) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(key.app_id())
                .push(key.market_hash_name());
        }
        url
    }

    /// One request, no retries.
    async fn fetch_once(&self, key: &CacheKey, attempt: u32) -> Result<Quote, UpstreamError> {
        debug!(app_id = key.app_id(), market_hash_name = key.market_hash_name(), attempt, "Calling price API");

        let response = self
            .client
            .get(self.item_url(key))
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            let body: Value = response.json().await.map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout
                } else if e.is_decode() {
                    UpstreamError::InvalidResponse("body is not valid JSON".to_string())
                } else {
                    transport_error(e)
                }
            })?;
            return parse_quote(key, &body);
        }

        let body = response.text().await.unwrap_or_default();
        let body: String = body.chars().take(MAX_LOGGED_BODY).collect();
        info!(
            app_id = key.app_id(),
            market_hash_name = key.market_hash_name(),
            attempt,
            upstream_status = status.as_u16(),
            upstream_body = %body,
            "Price API returned an error status"
        );
        Err(classify_status(status))
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn fetch(&self, key: &CacheKey) -> Result<Quote, UpstreamError> {
        self.retry
            .run(|attempt| self.fetch_once(key, attempt))
            .await
    }
}

/// Maps a non-success status to an upstream outcome.
fn classify_status(status: StatusCode) -> UpstreamError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => UpstreamError::RateLimited,
        // SteamApis answers 400 when no item matches the parameters
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => UpstreamError::NotFound {
            status: status.as_u16(),
        },
        s if s.is_server_error() => UpstreamError::Unavailable {
            status: Some(s.as_u16()),
            reason: format!("upstream returned {}", s),
        },
        s => UpstreamError::Rejected { status: s.as_u16() },
    }
}

/// The URL carries the API key, so it is stripped before the error is kept.
fn transport_error(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        return UpstreamError::Timeout;
    }
    UpstreamError::Unavailable {
        status: err.status().map(|s| s.as_u16()),
        reason: err.without_url().to_string(),
    }
}

/// Extracts both prices from an upstream body.
fn parse_quote(key: &CacheKey, body: &Value) -> Result<Quote, UpstreamError> {
    let highest_buy_order = price_field(body, "highest_buy_order");
    let lowest_sell_order = price_field(body, "lowest_sell_order");

    match (highest_buy_order, lowest_sell_order) {
        (Some(buy), Some(sell)) => Ok(Quote::new(key, buy, sell)),
        _ => Err(UpstreamError::InvalidResponse(
            "missing market data in response".to_string(),
        )),
    }
}

fn price_field(body: &Value, field: &str) -> Option<Decimal> {
    let value = body
        .get("histogram")
        .and_then(|histogram| histogram.get(field))
        .or_else(|| body.get(field))?;

    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return None,
    };
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
