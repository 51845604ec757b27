//! Retry policy with linear backoff.

use std::time::Duration;

/// Backoff unit between attempts.
pub const BASE_DELAY: Duration = Duration::from_millis(100);

/// A bounded attempt budget with linearly increasing backoff.
///
/// The delay grows by one `base_delay` per attempt: 100ms, 200ms, 300ms
/// with the default unit. Linear, not exponential.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts. Values below 1 act as 1.
    pub max_attempts: u32,
    /// Backoff unit; the sleep after attempt `n` (0-indexed) is
    /// `base_delay * (n + 1)`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// A policy with the given attempt budget and the default backoff unit.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Effective attempt budget: at least one attempt is always made.
    pub fn effective_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Sleep to insert after the failed attempt `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt + 1)
    }
}
