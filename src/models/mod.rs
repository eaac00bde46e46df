//! Request and Response models for the price cache API
//!
//! This module defines the domain quote plus the DTOs used for
//! serializing/deserializing HTTP request and response bodies.

pub mod quote;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use quote::Quote;
pub use requests::ItemRequest;
pub use responses::{ErrorResponse, HealthResponse, QuoteResponse};
