//! Shared Cache Handle Module
//!
//! Wraps [`CacheStore`] in a single mutex so one cache instance can be
//! shared across threads. Clones of a [`Cache`] refer to the same store.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::cache::{CacheStats, CacheStore, ExpirationPolicy};
use crate::config::CacheConfig;
use crate::error::Result;

// == Cache ==
/// Thread-safe cache handle.
///
/// Every operation serializes through one mutex held for the operation's
/// full duration, so operations on a given cache instance appear in a total
/// order. The exception is [`save_from_compute`](Self::save_from_compute),
/// which runs its compute function before taking the mutex.
///
/// The fetch functions passed to [`fetch_or`](Self::fetch_or) and
/// [`try_fetch_or`](Self::try_fetch_or) run *while the mutex is held*: a
/// slow fetch function blocks every other operation on the same instance.
///
/// Callbacks and [`for_each`](Self::for_each) visitors must not call back
/// into the same cache instance; the mutex is not reentrant and doing so
/// deadlocks.
#[derive(Debug)]
pub struct Cache<K, V> {
    inner: Arc<Mutex<CacheStore<K, V>>>,
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    /// An unbounded cache whose entries never expire.
    fn default() -> Self {
        Self::new(CacheConfig::default()).expect("default config is always valid")
    }
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new cache from the given configuration.
    ///
    /// # Errors
    /// `ZeroCapacity` if the configuration sets a capacity of exactly zero.
    pub fn new(config: CacheConfig) -> Result<Self> {
        let store = CacheStore::new(config.capacity, config.default_expiry)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(store)),
        })
    }

    /// Acquires the store mutex, recovering from poisoning.
    ///
    /// A panic inside a fetch function or visitor poisons the mutex; the
    /// store itself is left in a consistent state by every operation, so the
    /// lock is safe to take over.
    fn lock(&self) -> MutexGuard<'_, CacheStore<K, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Save ==
    /// Stores `value` under `key` with the default expiration policy.
    pub fn save(&self, key: K, value: V) {
        self.lock().save(key, value);
    }

    /// Stores `value` under `key` with the given expiration policy.
    ///
    /// An entry already expired at save time is not stored; any prior entry
    /// under the key is left as-is.
    pub fn save_with(&self, key: K, value: V, expiry: ExpirationPolicy) {
        self.lock().save_with(key, value, expiry);
    }

    // == Save From Compute ==
    /// Computes a value for `key` and stores it only on success.
    ///
    /// `compute_fn` runs *outside* the mutex, so a slow computation does not
    /// block other operations. On success the result is stored with the
    /// default expiration policy and `true` is returned. On failure any
    /// existing entry under `key` is removed, the error is logged and
    /// swallowed, and `false` is returned — the cache never retains a value
    /// whose computation is known to have failed.
    pub fn save_from_compute<F>(&self, key: K, compute_fn: F) -> bool
    where
        F: FnOnce(&K) -> anyhow::Result<V>,
    {
        match compute_fn(&key) {
            Ok(value) => {
                self.lock().save(key, value);
                true
            }
            Err(cause) => {
                warn!(?key, error = %cause, "compute function failed, dropping entry");
                self.lock().remove(&key);
                false
            }
        }
    }

    // == Fetch ==
    /// Retrieves the value under `key`.
    ///
    /// # Errors
    /// `KeyNotFound` if the key is absent or its entry had expired (expired
    /// entries are removed as a side effect).
    pub fn fetch(&self, key: &K) -> Result<V> {
        self.lock().fetch(key)
    }

    /// Retrieves the value under `key`, or computes and stores it on a miss
    /// with the default expiration policy.
    ///
    /// `fetch_fn` runs while the mutex is held.
    ///
    /// # Errors
    /// `KeyNotFound`, carrying the fetch function's error as its source when
    /// the miss was caused by a failing fetch.
    pub fn fetch_or<F>(&self, key: K, fetch_fn: F) -> Result<V>
    where
        F: FnOnce(&K) -> anyhow::Result<V>,
    {
        self.lock().fetch_or(key, fetch_fn)
    }

    /// Like [`fetch_or`](Self::fetch_or) with an explicit expiration policy.
    pub fn fetch_or_with<F>(&self, key: K, expiry: ExpirationPolicy, fetch_fn: F) -> Result<V>
    where
        F: FnOnce(&K) -> anyhow::Result<V>,
    {
        self.lock().fetch_or_with(key, expiry, fetch_fn)
    }

    // == Try Fetch ==
    /// Non-erroring fetch: `None` on a miss.
    pub fn try_fetch(&self, key: &K) -> Option<V> {
        self.lock().try_fetch(key)
    }

    /// Non-erroring lookup-or-compute with the default expiration policy.
    ///
    /// A failing `fetch_fn` yields `None` and stores nothing.
    pub fn try_fetch_or<F>(&self, key: K, fetch_fn: F) -> Option<V>
    where
        F: FnOnce(&K) -> anyhow::Result<V>,
    {
        self.lock().try_fetch_or(key, fetch_fn)
    }

    /// Like [`try_fetch_or`](Self::try_fetch_or) with an explicit policy.
    pub fn try_fetch_or_with<F>(
        &self,
        key: K,
        expiry: ExpirationPolicy,
        fetch_fn: F,
    ) -> Option<V>
    where
        F: FnOnce(&K) -> anyhow::Result<V>,
    {
        self.lock().try_fetch_or_with(key, expiry, fetch_fn)
    }

    // == Remove ==
    /// Removes the entry under `key`; returns whether something was removed.
    pub fn remove(&self, key: &K) -> bool {
        self.lock().remove(key)
    }

    // == For Each ==
    /// Visits every currently stored entry, including expired-but-unpurged
    /// ones, in map iteration order. Runs inside the mutex; the visitor must
    /// not re-enter the cache.
    pub fn for_each<F>(&self, visit: F)
    where
        F: FnMut(&K, &V),
    {
        self.lock().for_each(visit);
    }

    // == Clean ==
    /// Removes all entries unconditionally.
    pub fn clean(&self) {
        self.lock().clean();
    }

    /// Removes only the entries expired at call time; returns how many.
    pub fn clean_expired(&self) -> usize {
        self.lock().clean_expired()
    }

    // == Capacity ==
    /// Returns the capacity bound, `None` if unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.lock().capacity()
    }

    /// Returns true iff the cache has a positive capacity bound.
    pub fn has_capacity(&self) -> bool {
        self.lock().has_capacity()
    }

    /// Replaces the capacity bound; shrinking enforces it immediately.
    ///
    /// # Errors
    /// `ZeroCapacity` if `capacity` is `Some(0)`.
    pub fn set_capacity(&self, capacity: Option<usize>) -> Result<()> {
        self.lock().set_capacity(capacity)
    }

    // == Length ==
    /// Returns the number of stored entries, including
    /// expired-but-not-yet-purged ones.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // == Default Expiry ==
    /// Returns the policy applied by saves that do not name one.
    pub fn default_expiry(&self) -> ExpirationPolicy {
        self.lock().default_expiry()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }
}
