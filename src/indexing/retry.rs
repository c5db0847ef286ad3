//! Exponential backoff policy for rate-limited calls.

use crate::config::IndexingSettings;
use std::time::Duration;

/// Cap on the backoff exponent so delays stay bounded.
const MAX_EXPONENT: u32 = 10;

/// Largest retry count whose delays still strictly increase.
pub const MAX_BACKOFF_RETRIES: u32 = MAX_EXPONENT + 1;

/// How many times to retry and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each one after.
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
        }
    }

    /// Delay before retry number `retry` (1-based): `initial * 2^(retry - 1)`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(MAX_EXPONENT);
        self.initial_delay.saturating_mul(1 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(2))
    }
}

impl From<&IndexingSettings> for RetryPolicy {
    fn from(settings: &IndexingSettings) -> Self {
        Self::new(settings.max_retries, settings.initial_backoff())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_double() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
    }

    #[test]
    fn test_exponent_is_capped() {
        let policy = RetryPolicy::new(50, Duration::from_millis(1));
        assert_eq!(policy.delay_for(40), Duration::from_millis(1024));
    }

    #[test]
    fn test_delays_grow_up_to_retry_cap() {
        let policy = RetryPolicy::new(MAX_BACKOFF_RETRIES, Duration::from_millis(1));
        let delays: Vec<_> = (1..=MAX_BACKOFF_RETRIES).map(|n| policy.delay_for(n)).collect();
        assert!(delays.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(policy.delay_for(MAX_BACKOFF_RETRIES + 1), delays[delays.len() - 1]);
    }
}
