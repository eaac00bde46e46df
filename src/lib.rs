//! Steam Price Cache - A read-through cache for Steam market prices
//!
//! Serves `(app_id, market_hash_name)` quotes from a TTL cache and fills
//! misses from a metered, rate-limited upstream API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod resolver;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use resolver::QuoteResolver;
pub use tasks::spawn_sweep_task;
