//! Stash Cache demo
//!
//! Exercises the cache as an embedding application would: memoizes a
//! simulated expensive lookup, demonstrates compute-failure isolation and
//! expiry, then logs the collected statistics.

use std::thread::sleep;
use std::time::Duration;

use anyhow::bail;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stash_cache::{Cache, CacheConfig, ExpirationPolicy};

/// Simulated expensive backend lookup.
fn slow_lookup(key: &String) -> anyhow::Result<String> {
    info!(%key, "querying backend");
    sleep(Duration::from_millis(50));
    Ok(format!("record for {key}"))
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stash_cache=info,stash_cache_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Stash Cache demo");

    // Load configuration from environment variables
    let config = CacheConfig::from_env();
    config.validate()?;
    info!(
        "Configuration loaded: capacity={:?}, default_expiry={:?}",
        config.capacity, config.default_expiry
    );

    let cache: Cache<String, String> = Cache::new(config)?;

    // First fetch misses and runs the lookup; the second is served from the
    // cache without touching the backend.
    let value = cache.fetch_or("user:42".to_string(), slow_lookup)?;
    info!(%value, "first fetch (computed)");

    let value = cache.fetch_or("user:42".to_string(), slow_lookup)?;
    info!(%value, "second fetch (cached)");

    // A failing compute never leaves a value behind.
    let stored = cache.save_from_compute("user:7".to_string(), |_| {
        bail!("backend rejected the write")
    });
    if !stored {
        warn!("compute for user:7 failed, nothing cached");
    }

    // Short-lived entry: present before the deadline, gone after it.
    cache.save_with(
        "session:1".to_string(),
        "token".to_string(),
        ExpirationPolicy::After(Duration::from_millis(100)),
    );
    info!(found = cache.try_fetch(&"session:1".to_string()).is_some(), "session before expiry");
    sleep(Duration::from_millis(200));
    info!(found = cache.try_fetch(&"session:1".to_string()).is_some(), "session after expiry");

    let stats = cache.stats();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        expirations = stats.expirations,
        entries = stats.total_entries,
        hit_rate = stats.hit_rate(),
        "final statistics"
    );

    Ok(())
}
