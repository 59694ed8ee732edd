//! Stash Cache - an in-process key-value cache
//!
//! Memoizes expensive lookups with per-entry expiration policies, lazy
//! staleness checking and an optional capacity bound.
//!
//! # Example
//! ```
//! use stash_cache::{Cache, CacheConfig, ExpirationPolicy};
//! use std::time::Duration;
//!
//! let cache: Cache<String, String> = Cache::new(CacheConfig {
//!     capacity: Some(1024),
//!     default_expiry: ExpirationPolicy::After(Duration::from_secs(300)),
//! })
//! .unwrap();
//!
//! let value = cache
//!     .fetch_or("user:42".to_string(), |_key| Ok("fetched".to_string()))
//!     .unwrap();
//! assert_eq!(value, "fetched");
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Cache, CacheStats, CacheStore, ExpirationPolicy};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
