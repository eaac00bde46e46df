//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::resolver::CachePolicy;
use crate::upstream::{RetryPolicy, UpstreamSettings};

/// Default SteamApis market item endpoint
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.steamapis.com/market/item";

/// Longest accepted freshness window (one year)
pub const MAX_CACHE_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Which cache backend to run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// JSON records on disk, survives restarts
    File,
    /// Process memory, lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Service configuration parameters.
///
/// Built once at startup and never mutated; components receive the parts
/// they need.
#[derive(Clone)]
pub struct Config {
    /// Secret key for the upstream price API
    pub api_key: String,
    /// Base URL of the upstream item endpoint
    pub upstream_base_url: String,
    /// Freshness window for cached quotes, in seconds
    pub cache_ttl: u64,
    /// Upstream connection-establishment timeout in seconds
    pub connect_timeout: u64,
    /// Upstream response-read timeout in seconds
    pub read_timeout: u64,
    /// Total upstream attempts per fetch, including the first
    pub max_attempts: u32,
    /// Backoff before the first retry in milliseconds, doubled per attempt
    pub backoff_base_ms: u64,
    /// Bound on each cache store call in seconds
    pub store_timeout: u64,
    /// Cache backend selection
    pub store_backend: StoreBackend,
    /// Directory for the file backend
    pub cache_dir: PathBuf,
    /// HTTP server port
    pub server_port: u16,
    /// Interval between expired-entry sweeps in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STEAMAPIS_KEY` - Upstream API key (required at startup)
    /// - `UPSTREAM_BASE_URL` - Item endpoint (default: SteamApis)
    /// - `CACHE_TTL_SECONDS` - Quote freshness (default: 86400)
    /// - `UPSTREAM_CONNECT_TIMEOUT_SECONDS` - Connect timeout (default: 5)
    /// - `UPSTREAM_READ_TIMEOUT_SECONDS` - Read timeout (default: 15)
    /// - `UPSTREAM_MAX_ATTEMPTS` - Attempts per fetch (default: 3)
    /// - `UPSTREAM_BACKOFF_BASE_MS` - First retry delay (default: 1000)
    /// - `STORE_TIMEOUT_SECONDS` - Store call bound (default: 5)
    /// - `CACHE_BACKEND` - `file` or `memory` (default: file)
    /// - `CACHE_DIR` - File backend directory (default: ./cache-data)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL_SECONDS` - Expiry sweep frequency (default: 300)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("STEAMAPIS_KEY").unwrap_or(defaults.api_key),
            upstream_base_url: env::var("UPSTREAM_BASE_URL").unwrap_or(defaults.upstream_base_url),
            cache_ttl: env_or("CACHE_TTL_SECONDS", defaults.cache_ttl),
            connect_timeout: env_or("UPSTREAM_CONNECT_TIMEOUT_SECONDS", defaults.connect_timeout),
            read_timeout: env_or("UPSTREAM_READ_TIMEOUT_SECONDS", defaults.read_timeout),
            max_attempts: env_or("UPSTREAM_MAX_ATTEMPTS", defaults.max_attempts),
            backoff_base_ms: env_or("UPSTREAM_BACKOFF_BASE_MS", defaults.backoff_base_ms),
            store_timeout: env_or("STORE_TIMEOUT_SECONDS", defaults.store_timeout),
            store_backend: env_or("CACHE_BACKEND", defaults.store_backend),
            cache_dir: env::var("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            sweep_interval: env_or("SWEEP_INTERVAL_SECONDS", defaults.sweep_interval),
        }
    }

    /// Rejects settings the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("STEAMAPIS_KEY"));
        }
        if self.cache_ttl == 0 || self.cache_ttl > MAX_CACHE_TTL_SECONDS {
            return Err(ConfigError::Invalid {
                name: "CACHE_TTL_SECONDS",
                reason: format!("must be between 1 and {}", MAX_CACHE_TTL_SECONDS),
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: "UPSTREAM_MAX_ATTEMPTS",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.connect_timeout == 0 || self.read_timeout == 0 {
            return Err(ConfigError::Invalid {
                name: "UPSTREAM_*_TIMEOUT_SECONDS",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.store_timeout == 0 {
            return Err(ConfigError::Invalid {
                name: "STORE_TIMEOUT_SECONDS",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.sweep_interval == 0 {
            return Err(ConfigError::Invalid {
                name: "SWEEP_INTERVAL_SECONDS",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.backoff_base_ms))
    }

    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            ttl: chrono::Duration::seconds(self.cache_ttl.min(MAX_CACHE_TTL_SECONDS) as i64),
            store_timeout: Duration::from_secs(self.store_timeout),
        }
    }

    pub fn upstream_settings(&self) -> UpstreamSettings {
        UpstreamSettings {
            base_url: self.upstream_base_url.clone(),
            api_key: self.api_key.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout),
            read_timeout: Duration::from_secs(self.read_timeout),
            retry: self.retry_policy(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            cache_ttl: 86_400,
            connect_timeout: 5,
            read_timeout: 15,
            max_attempts: 3,
            backoff_base_ms: 1_000,
            store_timeout: 5,
            store_backend: StoreBackend::File,
            cache_dir: PathBuf::from("./cache-data"),
            server_port: 3000,
            sweep_interval: 300,
        }
    }
}

/// Parses an environment variable, falling back to `default` when it is
/// unset or unparsable.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
