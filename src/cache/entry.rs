//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with expiration support.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::cache::ExpirationPolicy;

// == Cache Entry ==
/// A single cache entry: the stored value plus expiry metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Insertion sequence number, assigned by the owning store.
    /// Breaks ties between entries created in the same millisecond when
    /// eviction orders entries by recency of creation.
    pub seq: u64,
    /// When this entry becomes stale
    pub expiry: ExpirationPolicy,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry timestamped "now".
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `expiry` - Expiration policy for this entry
    /// * `seq` - Insertion sequence number from the owning store
    pub fn new(value: V, expiry: ExpirationPolicy, seq: u64) -> Self {
        Self {
            value,
            created_at: current_timestamp_ms(),
            seq,
            expiry,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Checks if the entry counts as expired at the given instant.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        self.expiry.is_expired_at(now_ms, self.created_at)
    }

    // == Age ==
    /// Returns the entry's age in milliseconds.
    ///
    /// Saturates at zero if the clock moved backwards since creation.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.created_at)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
