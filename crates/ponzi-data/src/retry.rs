//! Exponential backoff for throttled provider calls.

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Delays of 1, 2, 4, 8, 16, 16... seconds, giving up after eight attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
    pub max_attempts: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(16),
            max_attempts: 8,
        }
    }
}

impl Backoff {
    /// Delay before retry number `retry` (zero based).
    pub fn delay(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial.saturating_mul(factor).min(self.max)
    }
}

/// Run `op` until it succeeds, fails with a non-retriable error, or the
/// attempt budget is spent.
pub async fn retry_throttled<T, F, Fut>(backoff: &Backoff, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Err(e) if e.is_retriable() && attempt < backoff.max_attempts => {
                let delay = backoff.delay(attempt - 1);
                tracing::warn!(
                    "throttled ({e}), retrying in {}s ({attempt}/{})",
                    delay.as_secs(),
                    backoff.max_attempts
                );
                tokio::time::sleep(delay).await;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[test]
    fn test_delays_double_then_cap() {
        let b = Backoff::default();
        let secs: Vec<u64> = (0..7).map(|i| b.delay(i).as_secs()).collect();
        assert_eq!(secs, vec![1, 2, 4, 8, 16, 16, 16]);
        assert_eq!(b.delay(40), Duration::from_secs(16));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let calls = &AtomicU32::new(0);
        let start = Instant::now();
        let result = retry_throttled(&Backoff::default(), || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(Error::Throttled("slow down".into()))
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_budget() {
        let calls = &AtomicU32::new(0);
        let result: Result<()> = retry_throttled(&Backoff::default(), || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::Throttled("slow down".into()))
        })
        .await;
        assert!(matches!(result, Err(Error::Throttled(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn test_other_errors_not_retried() {
        let calls = &AtomicU32::new(0);
        let result: Result<()> = retry_throttled(&Backoff::default(), || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::Transport("refused".into()))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
