//! Request spacing gate shared by every outbound call.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Source of monotonic time. Swapped out in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Clock backed by tokio's timer, which honours paused test time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Enforces a minimum interval between requests.
///
/// Holds a single "next allowed call time". A slot is only claimed once it
/// has arrived, so a caller dropped while waiting leaves nothing behind.
#[derive(Clone)]
pub struct RateLimiter {
    interval: Duration,
    next_allowed: Arc<Mutex<Option<Instant>>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self::with_clock(interval, Arc::new(TokioClock))
    }

    pub fn with_clock(interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            interval,
            next_allowed: Arc::new(Mutex::new(None)),
            clock,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Claim the slot if it is open and return zero. Otherwise claim nothing
    /// and return how long until it opens.
    pub async fn try_claim(&self) -> Duration {
        let mut next = self.next_allowed.lock().await;
        let now = self.clock.now();
        match *next {
            Some(t) if t > now => t - now,
            _ => {
                *next = Some(now + self.interval);
                Duration::ZERO
            }
        }
    }

    /// Wait until a request may be sent.
    pub async fn acquire(&self) {
        loop {
            let wait = self.try_claim().await;
            if wait.is_zero() {
                return;
            }
            tracing::debug!("rate limit gate: waiting {}ms", wait.as_millis());
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    struct ManualClock(StdMutex<Instant>);

    impl ManualClock {
        fn advance(&self, d: Duration) {
            let mut t = self.0.lock().unwrap();
            *t += d;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.0.lock().unwrap()
        }
    }

    #[tokio::test]
    async fn test_claim_only_when_open() {
        let clock = Arc::new(ManualClock(StdMutex::new(Instant::now())));
        let limiter = RateLimiter::with_clock(Duration::from_secs(1), clock.clone());

        assert_eq!(limiter.try_claim().await, Duration::ZERO);
        assert_eq!(limiter.try_claim().await, Duration::from_secs(1));
        assert_eq!(limiter.try_claim().await, Duration::from_secs(1));

        clock.advance(Duration::from_millis(400));
        assert_eq!(limiter.try_claim().await, Duration::from_millis(600));

        clock.advance(Duration::from_millis(600));
        assert_eq!(limiter.try_claim().await, Duration::ZERO);

        clock.advance(Duration::from_secs(10));
        assert_eq!(limiter.try_claim().await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_sleeps_until_slot() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_waiter_keeps_no_slot() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();
        limiter.acquire().await;

        let waited = tokio::time::timeout(Duration::from_millis(100), limiter.acquire()).await;
        assert!(waited.is_err());

        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
