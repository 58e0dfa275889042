use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Default number of registration attempts
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default pause between two registration attempts
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(200);

/// Bounded retry with a fixed pause between attempts.
///
/// The pause suspends only the calling task; with the defaults a fully failing
/// operation gives up after roughly one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Same attempt budget, no pause between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Run `operation` until it reports success or the attempt budget is spent.
    ///
    /// `operation` receives the 1-based attempt number. At least one attempt is
    /// always made.
    pub async fn run<F, Fut>(&self, mut operation: F) -> bool
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = bool>,
    {
        let max_attempts = self.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            if operation(attempt).await {
                return true;
            }

            debug!("Attempt {}/{} failed", attempt, max_attempts);

            if attempt < max_attempts && !self.interval.is_zero() {
                tokio::time::sleep(self.interval).await;
            }
        }

        false
    }
}
