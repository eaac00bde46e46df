//! Resolver Module
//!
//! Read-through coordination between the cache store and the upstream API.

mod clock;
mod quote_resolver;

pub use clock::{Clock, FixedClock, SystemClock};
pub use quote_resolver::{CachePolicy, QuoteResolver};
