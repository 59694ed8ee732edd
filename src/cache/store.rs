//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with lazy expiration and
//! capacity enforcement. This type is not synchronized; [`Cache`] wraps it
//! in a mutex for shared use.
//!
//! [`Cache`]: crate::cache::Cache

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, trace, warn};

use crate::cache::{CacheEntry, CacheStats, ExpirationPolicy};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Unsynchronized cache engine with per-entry expiration and an optional
/// capacity bound.
///
/// Expiration is lazy: entries are checked when touched, and additionally
/// purged during capacity enforcement. `capacity == None` means unbounded;
/// a zero capacity is rejected wherever capacity is assigned.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Maximum number of entries, None = unbounded
    capacity: Option<usize>,
    /// Expiration policy applied when a save does not name one
    default_expiry: ExpirationPolicy,
    /// Performance statistics
    stats: CacheStats,
    /// Next insertion sequence number
    next_seq: u64,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, `None` for unbounded
    /// * `default_expiry` - Policy used by saves that do not name one
    ///
    /// # Errors
    /// `ZeroCapacity` if `capacity` is `Some(0)`.
    pub fn new(capacity: Option<usize>, default_expiry: ExpirationPolicy) -> Result<Self> {
        if capacity == Some(0) {
            return Err(CacheError::ZeroCapacity);
        }

        Ok(Self {
            entries: HashMap::new(),
            capacity,
            default_expiry,
            stats: CacheStats::new(),
            next_seq: 0,
        })
    }

    // == Save ==
    /// Stores a value under `key` with the default expiration policy.
    ///
    /// See [`save_with`](Self::save_with).
    pub fn save(&mut self, key: K, value: V) {
        let expiry = self.default_expiry;
        self.save_with(key, value, expiry);
    }

    /// Stores a value under `key`, timestamped now, with the given policy.
    ///
    /// Overwrites any existing entry under the same key. An entry that is
    /// already expired at save time is not stored; the save is then a no-op
    /// with respect to storage and any prior entry under the key is left
    /// as-is. Capacity enforcement runs after every save regardless, so a
    /// rejected save still sweeps an over-capacity store.
    pub fn save_with(&mut self, key: K, value: V, expiry: ExpirationPolicy) {
        let entry = CacheEntry::new(value, expiry, self.next_seq);
        self.next_seq += 1;

        if entry.is_expired() {
            trace!(?key, "entry already expired at save time, not stored");
        } else {
            self.entries.insert(key, entry);
        }

        self.enforce_capacity();
        self.stats.set_total_entries(self.entries.len());
    }

    // == Fetch ==
    /// Retrieves the value under `key`.
    ///
    /// An entry observed as expired is removed and reported as not found.
    ///
    /// # Errors
    /// `KeyNotFound` if the key is absent or its entry had expired.
    pub fn fetch(&mut self, key: &K) -> Result<V> {
        match self.lookup(key) {
            Some(value) => Ok(value),
            None => Err(CacheError::not_found(key)),
        }
    }

    /// Retrieves the value under `key`, or computes and stores it on a miss.
    ///
    /// The result of `fetch_fn` is stored with the default expiration policy.
    /// See [`fetch_or_with`](Self::fetch_or_with).
    pub fn fetch_or<F>(&mut self, key: K, fetch_fn: F) -> Result<V>
    where
        F: FnOnce(&K) -> anyhow::Result<V>,
    {
        let expiry = self.default_expiry;
        self.fetch_or_with(key, expiry, fetch_fn)
    }

    /// Retrieves the value under `key`, or computes and stores it on a miss
    /// with the given policy.
    ///
    /// # Errors
    /// `KeyNotFound` carrying the callback's error as its source if
    /// `fetch_fn` fails; nothing is stored in that case.
    pub fn fetch_or_with<F>(
        &mut self,
        key: K,
        expiry: ExpirationPolicy,
        fetch_fn: F,
    ) -> Result<V>
    where
        F: FnOnce(&K) -> anyhow::Result<V>,
    {
        if let Some(value) = self.lookup(&key) {
            return Ok(value);
        }

        match fetch_fn(&key) {
            Ok(value) => {
                self.save_with(key, value.clone(), expiry);
                Ok(value)
            }
            Err(cause) => {
                debug!(?key, error = %cause, "fetch function failed");
                Err(CacheError::fetch_failed(&key, cause))
            }
        }
    }

    // == Try Fetch ==
    /// Non-erroring variant of [`fetch`](Self::fetch): `None` on a miss,
    /// with the same expired-entry removal side effect.
    pub fn try_fetch(&mut self, key: &K) -> Option<V> {
        self.lookup(key)
    }

    /// Non-erroring lookup-or-compute with the default expiration policy.
    pub fn try_fetch_or<F>(&mut self, key: K, fetch_fn: F) -> Option<V>
    where
        F: FnOnce(&K) -> anyhow::Result<V>,
    {
        let expiry = self.default_expiry;
        self.try_fetch_or_with(key, expiry, fetch_fn)
    }

    /// Non-erroring lookup-or-compute with the given policy.
    ///
    /// A failing `fetch_fn` yields `None` and stores nothing; the failure is
    /// logged and swallowed.
    pub fn try_fetch_or_with<F>(
        &mut self,
        key: K,
        expiry: ExpirationPolicy,
        fetch_fn: F,
    ) -> Option<V>
    where
        F: FnOnce(&K) -> anyhow::Result<V>,
    {
        if let Some(value) = self.lookup(&key) {
            return Some(value);
        }

        match fetch_fn(&key) {
            Ok(value) => {
                self.save_with(key, value.clone(), expiry);
                Some(value)
            }
            Err(cause) => {
                warn!(?key, error = %cause, "fetch function failed, reporting miss");
                None
            }
        }
    }

    // == Lookup ==
    /// Shared read path: returns the live value under `key`, removing the
    /// entry if it is observed as expired. Records hit/miss statistics.
    fn lookup(&mut self, key: &K) -> Option<V> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired() {
            self.entries.remove(key);
            self.stats.record_expiration();
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            debug!(?key, "removed expired entry on access");
            return None;
        }

        let value = entry.value.clone();
        self.stats.record_hit();
        Some(value)
    }

    // == Remove ==
    /// Removes the entry under `key` if present.
    ///
    /// Returns whether something was removed; removing an absent key is not
    /// an error.
    pub fn remove(&mut self, key: &K) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == For Each ==
    /// Visits every currently stored entry, including expired-but-unpurged
    /// ones, in map iteration order (unspecified).
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, entry) in &self.entries {
            visit(key, &entry.value);
        }
    }

    // == Clean ==
    /// Removes all entries unconditionally.
    pub fn clean(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    /// Removes only the entries expired at call time.
    ///
    /// Returns the number of entries removed.
    pub fn clean_expired(&mut self) -> usize {
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.stats.record_expiration();
        }

        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Capacity ==
    /// Returns the capacity bound, `None` if unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Returns true iff the cache has a positive capacity bound.
    pub fn has_capacity(&self) -> bool {
        self.capacity.is_some()
    }

    /// Replaces the capacity bound.
    ///
    /// Shrinking below the current size enforces the new bound immediately.
    ///
    /// # Errors
    /// `ZeroCapacity` if `capacity` is `Some(0)`.
    pub fn set_capacity(&mut self, capacity: Option<usize>) -> Result<()> {
        if capacity == Some(0) {
            return Err(CacheError::ZeroCapacity);
        }

        self.capacity = capacity;
        self.enforce_capacity();
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    /// Enforces the capacity bound, if set.
    ///
    /// Over capacity: expired entries are purged first; if the store is
    /// still over, the entries with the smallest age (most recently created,
    /// insertion order breaking same-millisecond ties) are retained and the
    /// rest evicted.
    fn enforce_capacity(&mut self) {
        let Some(cap) = self.capacity else {
            return;
        };
        if self.entries.len() <= cap {
            return;
        }

        let purged = self.clean_expired();
        if purged > 0 {
            debug!(purged, "purged expired entries during capacity enforcement");
        }
        if self.entries.len() <= cap {
            return;
        }

        // Oldest first by creation time, then by insertion order.
        let mut order: Vec<(K, u64, u64)> = self
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.created_at, entry.seq))
            .collect();
        order.sort_by_key(|(_, created_at, seq)| (*created_at, *seq));

        let excess = self.entries.len() - cap;
        for (key, _, _) in order.into_iter().take(excess) {
            self.entries.remove(&key);
            self.stats.record_eviction();
            debug!(?key, "evicted entry over capacity");
        }
    }

    // == Length ==
    /// Returns the number of stored entries.
    ///
    /// This includes expired-but-not-yet-purged entries; it is not a count
    /// of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Default Expiry ==
    /// Returns the policy applied by saves that do not name one.
    pub fn default_expiry(&self) -> ExpirationPolicy {
        self.default_expiry
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }
}
