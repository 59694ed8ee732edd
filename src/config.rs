//! Configuration Module
//!
//! Handles cache configuration, with optional loading from environment
//! variables.

use std::env;
use std::time::Duration;

use crate::cache::ExpirationPolicy;
use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be loaded from environment variables with sensible
/// defaults, or set directly.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries, `None` = unbounded.
    /// `Some(0)` is invalid and rejected by [`validate`](Self::validate)
    /// and by the cache constructor.
    pub capacity: Option<usize>,
    /// Expiration policy applied when a save does not name one
    pub default_expiry: ExpirationPolicy,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum entries; unset or negative = unbounded
    /// - `CACHE_DEFAULT_TTL_SECS` - Default time-to-live in seconds;
    ///   unset = entries never expire
    pub fn from_env() -> Self {
        let capacity = env::var("CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .and_then(|v| if v < 0 { None } else { Some(v as usize) });

        let default_expiry = env::var("CACHE_DEFAULT_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(|secs| ExpirationPolicy::After(Duration::from_secs(secs)))
            .unwrap_or(ExpirationPolicy::Never);

        Self {
            capacity,
            default_expiry,
        }
    }

    /// Checks the configuration for invalid values.
    ///
    /// # Errors
    /// `ZeroCapacity` if capacity is exactly zero.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == Some(0) {
            return Err(CacheError::ZeroCapacity);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: None,
            default_expiry: ExpirationPolicy::Never,
        }
    }
}
