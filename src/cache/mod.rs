//! Cache Module
//!
//! Provides in-process caching with per-entry expiration policies, lazy
//! expiry and capacity-bounded storage.

mod entry;
mod expiry;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use expiry::ExpirationPolicy;
pub use shared::Cache;
pub use stats::CacheStats;
pub use store::CacheStore;
