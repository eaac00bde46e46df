//! API Module
//!
//! HTTP handlers and routing for the price cache REST API.
//!
//! # Endpoints
//! - `GET /item/:app_id/:market_hash_name` - Price quote for one market item
//! - `GET /health` - Health check endpoint
//!
//! Authentication happens in the gateway in front of this service.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
