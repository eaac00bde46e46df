//! Cache Module
//!
//! Quote persistence keyed by `(app_id, market_hash_name)` with per-entry expiry.

mod entry;
mod file;
mod key;
mod memory;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use file::FileStore;
pub use key::CacheKey;
pub use memory::MemoryStore;
pub use store::CacheStore;
