//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache library.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache (absent, expired, or its fetch function failed).
    ///
    /// When the miss was caused by a failing fetch function, the underlying
    /// error is attached as the source for diagnostics.
    #[error("key not found: {key}")]
    KeyNotFound {
        key: String,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Capacity was set to exactly zero.
    ///
    /// A zero bound would make every save a guaranteed eviction; use an
    /// unbounded cache (`None`) instead.
    #[error("cache capacity must be greater than zero")]
    ZeroCapacity,

    /// A policy payload accessor was called on a policy in the wrong mode.
    #[error("expiration policy has no {0}")]
    InvalidPolicyState(&'static str),
}

impl CacheError {
    /// Builds a `KeyNotFound` for a plain miss (no underlying cause).
    pub(crate) fn not_found(key: impl std::fmt::Debug) -> Self {
        CacheError::KeyNotFound {
            key: format!("{key:?}"),
            cause: None,
        }
    }

    /// Builds a `KeyNotFound` caused by a failing fetch function.
    pub(crate) fn fetch_failed(key: impl std::fmt::Debug, cause: anyhow::Error) -> Self {
        CacheError::KeyNotFound {
            key: format!("{key:?}"),
            cause: Some(cause.into()),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache library.
pub type Result<T> = std::result::Result<T, CacheError>;
