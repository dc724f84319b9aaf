use async_trait::async_trait;
use std::time::Duration;

/// How often and how patiently an investigation is retried.
///
/// Attempts are 1-indexed. The wait before attempt `n + 1` is
/// `backoff_base ^ n` seconds, and nothing is awaited after the final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: 2,
        }
    }
}

impl RetryPolicy {
    /// Builds a policy; at least one attempt is always made.
    pub fn new(max_attempts: u32, backoff_base: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    /// Delay awaited after failed attempt `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_secs(self.backoff_base.saturating_pow(attempt))
    }

    /// Whether a failed `attempt` is followed by another one.
    pub fn has_next(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Upper bound on the time spent waiting between attempts.
    pub fn total_backoff(&self) -> Duration {
        (1..self.max_attempts).map(|attempt| self.backoff(attempt)).sum()
    }
}

/// Waits between attempts. Replaced by a recording fake in tests.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock sleeper backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(8));
    }

    #[test]
    fn test_no_wait_after_final_attempt() {
        let policy = RetryPolicy::default();
        assert!(policy.has_next(1));
        assert!(policy.has_next(2));
        assert!(!policy.has_next(3));
        assert_eq!(policy.total_backoff(), Duration::from_secs(6));
    }

    #[test]
    fn test_at_least_one_attempt() {
        let policy = RetryPolicy::new(0, 2);
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.total_backoff(), Duration::ZERO);
    }

    #[test]
    fn test_backoff_saturates() {
        let policy = RetryPolicy::new(100, 10);
        assert_eq!(policy.backoff(64), Duration::from_secs(u64::MAX));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_waits() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_secs(4)).await;
        assert!(start.elapsed() >= Duration::from_secs(4));
    }
}
