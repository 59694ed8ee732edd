//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify storage, eviction and statistics properties of
//! the cache engine.

use proptest::prelude::*;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::{current_timestamp_ms, CacheStore, ExpirationPolicy};

// == Test Configuration ==
const TEST_CAPACITY: usize = 100;

fn test_store() -> CacheStore<String, String> {
    CacheStore::new(Some(TEST_CAPACITY), ExpirationPolicy::Never).unwrap()
}

// == Strategies ==
/// Generates valid cache keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}".prop_map(|s| s)
}

/// Generates valid cache values
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}".prop_map(|s| s)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Save { key: String, value: String },
    Fetch { key: String },
    Remove { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Save { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Fetch { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations, hit/miss statistics reflect exactly
    // the fetch outcomes, and total_entries tracks the stored count.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = test_store();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Save { key, value } => {
                    store.save(key, value);
                }
                CacheOp::Fetch { key } => {
                    match store.fetch(&key) {
                        Ok(_) => expected_hits += 1,
                        Err(_) => expected_misses += 1,
                    }
                }
                CacheOp::Remove { key } => {
                    let _ = store.remove(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, store.len(), "Total entries mismatch");
    }

    // For any key-value pair, saving then fetching (under a never-expiring
    // policy) returns the exact value that was stored.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = test_store();

        store.save(key.clone(), value.clone());

        let retrieved = store.fetch(&key).unwrap();
        prop_assert_eq!(retrieved, value, "Round-trip value mismatch");
    }

    // For any stored key, a remove makes a subsequent fetch miss, and a
    // second remove reports nothing left to remove.
    #[test]
    fn prop_remove_semantics(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = test_store();

        store.save(key.clone(), value);

        prop_assert!(store.fetch(&key).is_ok(), "Key should exist before remove");
        prop_assert!(store.remove(&key), "First remove should report removal");
        prop_assert!(!store.remove(&key), "Second remove should be a no-op");
        prop_assert!(store.fetch(&key).is_err(), "Key should not exist after remove");
    }

    // For any key, saving value V1 then V2 leaves a single entry holding V2.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let mut store = test_store();

        store.save(key.clone(), value1);
        store.save(key.clone(), value2.clone());

        let retrieved = store.fetch(&key).unwrap();
        prop_assert_eq!(retrieved, value2, "Overwrite should return new value");
        prop_assert_eq!(store.len(), 1, "Should have exactly one entry after overwrite");
    }

    // For any sequence of saves, the stored-entry count never exceeds the
    // capacity bound once a save has returned.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..200
        )
    ) {
        let capacity = 50; // Use smaller bound for testing
        let mut store: CacheStore<String, String> =
            CacheStore::new(Some(capacity), ExpirationPolicy::Never).unwrap();

        for (key, value) in entries {
            store.save(key, value);
            prop_assert!(
                store.len() <= capacity,
                "Cache size {} exceeds capacity {}",
                store.len(),
                capacity
            );
        }
    }

    // For any key-value pair, a save under a policy whose deadline is
    // already in the past stores nothing and leaves the count unchanged.
    #[test]
    fn prop_past_deadline_never_stored(
        key in valid_key_strategy(),
        value in valid_value_strategy()
    ) {
        let mut store = test_store();
        let count_before = store.len();

        let past = current_timestamp_ms() - 10_000;
        store.save_with(key.clone(), value, ExpirationPolicy::At(past));

        prop_assert_eq!(store.len(), count_before, "Born-expired entry must not be stored");
        prop_assert!(store.try_fetch(&key).is_none(), "Born-expired entry must not be found");
    }
}

// Separate proptest block with fewer cases for time-sensitive expiry tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // For any entry stored with a duration policy, a fetch succeeds before
    // the duration elapses and misses after it has elapsed.
    #[test]
    fn prop_duration_expiry_behavior(
        key in valid_key_strategy(),
        value in valid_value_strategy()
    ) {
        let mut store = test_store();

        store.save_with(
            key.clone(),
            value.clone(),
            ExpirationPolicy::After(Duration::from_millis(100)),
        );

        let result_before = store.fetch(&key);
        prop_assert!(result_before.is_ok(), "Entry should exist before expiry");
        prop_assert_eq!(result_before.unwrap(), value, "Value should match before expiry");

        // Wait past the deadline (with a buffer for timing)
        sleep(Duration::from_millis(200));

        let result_after = store.fetch(&key);
        prop_assert!(result_after.is_err(), "Entry should not be found after expiry");
    }
}
