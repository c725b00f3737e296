//! Lock acquisition tuning.

use std::time::Duration;

/// Timing and retry configuration for lock acquisition.
///
/// The defaults match what callers of these helpers have historically relied
/// on: up to 10 seconds of waiting per attempt, 5 attempts, half a second
/// between attempts. Tests override the fields to keep contention scenarios
/// fast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockOptions {
    /// Maximum time a single acquisition attempt waits for the lock.
    pub timeout: Duration,

    /// Total number of acquisition attempts before giving up.
    pub attempts: u32,

    /// Fixed delay between attempts. No backoff, no jitter.
    pub retry_delay: Duration,

    /// How often a waiting attempt re-checks the lock artifact.
    pub poll_interval: Duration,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            attempts: 5,
            retry_delay: Duration::from_millis(500),
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl LockOptions {
    /// Default options with a different per-attempt timeout, the knob callers
    /// most commonly change.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}
