//! Retry policy: decides attempts and backoff delays.
//!
//! v1: 線形バックオフ（`base_delay * attempt`）、最大 3 回。

use std::time::Duration;

/// Retry policy for failed publish attempts.
///
/// Backoff is linear: the wait after attempt `n` is `base_delay * n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,

    /// Delay after the first failed attempt.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// 3 attempts, waiting 5s then 10s.
    pub fn linear_v1() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(5),
        }
    }

    /// Whether another attempt is allowed after `attempts` have failed.
    pub fn should_retry(&self, attempts: u32) -> bool {
        attempts < self.max_attempts
    }

    /// Delay before the next attempt.
    ///
    /// # Arguments
    /// * `attempts` - Number of attempts already made (1-indexed).
    ///
    /// With base_delay=5s:
    /// - attempt 1 (first failure): 5s
    /// - attempt 2: 10s
    pub fn next_delay(&self, attempts: u32) -> Duration {
        self.base_delay.saturating_mul(attempts.max(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::linear_v1()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_has_three_attempts() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(5));
    }

    #[test]
    fn linear_backoff_grows_by_base_delay() {
        let policy = RetryPolicy::linear_v1();

        assert_eq!(policy.next_delay(1), Duration::from_secs(5));
        assert_eq!(policy.next_delay(2), Duration::from_secs(10));
        assert_eq!(policy.next_delay(3), Duration::from_secs(15));
    }

    #[test]
    fn attempt_zero_uses_base_delay() {
        let policy = RetryPolicy::linear_v1();
        assert_eq!(policy.next_delay(0), policy.base_delay);
    }

    #[test]
    fn no_retry_after_max_attempts() {
        let policy = RetryPolicy::linear_v1();
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }
}
