//! Expiration Policy Module
//!
//! Describes when a cache entry becomes stale: never, at a fixed instant,
//! or after a duration since creation.

use std::time::Duration;

use crate::error::{CacheError, Result};

// == Expiration Policy ==
/// Immutable description of when an entry expires.
///
/// The payload lives in the variant, so evaluating expiry can never read
/// the wrong field for the current mode. The payload accessors
/// ([`deadline_ms`](Self::deadline_ms), [`duration`](Self::duration)) exist
/// for display and comparison; asking for the other mode's payload is an
/// [`CacheError::InvalidPolicyState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpirationPolicy {
    /// The entry never expires.
    #[default]
    Never,
    /// The entry expires strictly after the given instant (Unix milliseconds).
    At(u64),
    /// The entry expires strictly after this duration has elapsed since its
    /// creation.
    After(Duration),
}

impl ExpirationPolicy {
    // == Is Expired At ==
    /// Evaluates whether an entry created at `created_at_ms` counts as
    /// expired at `now_ms`.
    ///
    /// Boundary condition: both timed modes are strict — an entry is still
    /// live at exactly its deadline and expires one millisecond later.
    pub fn is_expired_at(&self, now_ms: u64, created_at_ms: u64) -> bool {
        match self {
            ExpirationPolicy::Never => false,
            ExpirationPolicy::At(deadline_ms) => now_ms > *deadline_ms,
            ExpirationPolicy::After(ttl) => {
                now_ms > created_at_ms.saturating_add(ttl.as_millis() as u64)
            }
        }
    }

    // == Deadline Accessor ==
    /// Returns the fixed deadline in Unix milliseconds.
    ///
    /// # Returns
    /// - `At` mode: the deadline
    /// - `Never` mode: `u64::MAX` as an "unbounded" sentinel, for display
    ///   and comparison only — expiry evaluation never reads it
    /// - `After` mode: `InvalidPolicyState` (the deadline depends on an
    ///   entry's creation time, which the policy does not know)
    pub fn deadline_ms(&self) -> Result<u64> {
        match self {
            ExpirationPolicy::Never => Ok(u64::MAX),
            ExpirationPolicy::At(deadline_ms) => Ok(*deadline_ms),
            ExpirationPolicy::After(_) => Err(CacheError::InvalidPolicyState("fixed deadline")),
        }
    }

    // == Duration Accessor ==
    /// Returns the time-to-live duration.
    ///
    /// # Returns
    /// - `After` mode: the configured duration
    /// - `Never` mode: `Duration::MAX` as an "unbounded" sentinel, for
    ///   display and comparison only
    /// - `At` mode: `InvalidPolicyState`
    pub fn duration(&self) -> Result<Duration> {
        match self {
            ExpirationPolicy::Never => Ok(Duration::MAX),
            ExpirationPolicy::After(ttl) => Ok(*ttl),
            ExpirationPolicy::At(_) => Err(CacheError::InvalidPolicyState("duration")),
        }
    }

    // == Mode Predicates ==
    /// Returns true for the `Never` mode.
    pub fn is_never(&self) -> bool {
        matches!(self, ExpirationPolicy::Never)
    }
}

/// Constructing a policy from a duration yields the `After` mode.
impl From<Duration> for ExpirationPolicy {
    fn from(ttl: Duration) -> Self {
        ExpirationPolicy::After(ttl)
    }
}
