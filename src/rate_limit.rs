//! Client-side request rate limiting.
//!
//! Every API endpoint call passes through [`RateLimiter::until_ready`] before
//! the request is sent. Bulk downloads are served from external storage and
//! are not gated.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::cancel::CancellationToken;
use crate::error::{Result, ScryfallError};

/// "Wait until permitted" admission control shared by concurrent callers.
pub trait RateLimiter: Send + Sync {
    /// Block until one request may proceed, consuming one unit of budget.
    ///
    /// Fails with [`ScryfallError::Cancelled`] if `cancel` is already
    /// cancelled or becomes cancelled while waiting.
    fn until_ready(&self, cancel: &CancellationToken) -> Result<()>;
}

// ---------------------------------------------------------------------------
// TokenBucket
// ---------------------------------------------------------------------------

/// Longest single sleep; the bucket is re-checked after each one.
const MAX_WAIT: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket refilled continuously at `rate` tokens per second, holding at
/// most `burst` tokens. Starts full.
#[derive(Debug)]
pub struct TokenBucket {
    rate: f64,
    burst: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Create a bucket admitting `requests_per_second` on average with bursts
    /// of up to `burst` requests.
    ///
    /// # Errors
    ///
    /// Returns [`ScryfallError::InvalidArgument`] if either value is zero or
    /// the rate is not finite.
    pub fn new(requests_per_second: f64, burst: u32) -> Result<Self> {
        if !requests_per_second.is_finite() || requests_per_second <= 0.0 {
            return Err(ScryfallError::InvalidArgument(format!(
                "requests per second must be positive, got {requests_per_second}"
            )));
        }
        if burst == 0 {
            return Err(ScryfallError::InvalidArgument(
                "burst must be at least 1".into(),
            ));
        }
        Ok(Self {
            rate: requests_per_second,
            burst: f64::from(burst),
            state: Mutex::new(BucketState {
                tokens: f64::from(burst),
                last_refill: Instant::now(),
            }),
        })
    }

    /// Take a token if one is available, otherwise report how long until one is.
    fn try_acquire(&self) -> std::result::Result<(), Duration> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.rate).min(self.burst);
        state.last_refill = now;

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            Ok(())
        } else {
            let missing = 1.0 - state.tokens;
            let wait = Duration::try_from_secs_f64(missing / self.rate).unwrap_or(MAX_WAIT);
            Err(wait.min(MAX_WAIT))
        }
    }
}

impl RateLimiter for TokenBucket {
    fn until_ready(&self, cancel: &CancellationToken) -> Result<()> {
        loop {
            cancel.check()?;
            match self.try_acquire() {
                Ok(()) => return Ok(()),
                Err(wait) => {
                    trace!(wait_ms = wait.as_millis() as u64, "rate limited, waiting for token");
                    cancel.sleep(wait)?;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Unlimited
// ---------------------------------------------------------------------------

/// Admits every request immediately. Still honors cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl RateLimiter for Unlimited {
    fn until_ready(&self, cancel: &CancellationToken) -> Result<()> {
        cancel.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn rejects_invalid_parameters() {
        assert!(TokenBucket::new(0.0, 1).is_err());
        assert!(TokenBucket::new(-1.0, 1).is_err());
        assert!(TokenBucket::new(f64::NAN, 1).is_err());
        assert!(TokenBucket::new(10.0, 0).is_err());
    }

    #[test]
    fn burst_is_admitted_without_waiting() {
        let bucket = TokenBucket::new(1.0, 5).unwrap();
        let cancel = CancellationToken::new();
        let start = Instant::now();
        for _ in 0..5 {
            bucket.until_ready(&cancel).unwrap();
        }
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn waits_once_burst_is_spent() {
        let bucket = TokenBucket::new(50.0, 1).unwrap();
        let cancel = CancellationToken::new();
        bucket.until_ready(&cancel).unwrap();
        let start = Instant::now();
        bucket.until_ready(&cancel).unwrap();
        // One token every 20ms.
        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn cancelled_token_fails_immediately() {
        let bucket = TokenBucket::new(10.0, 10).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(matches!(
            bucket.until_ready(&cancel),
            Err(ScryfallError::Cancelled)
        ));
    }

    #[test]
    fn cancel_unblocks_waiter() {
        let bucket = Arc::new(TokenBucket::new(0.01, 1).unwrap());
        let cancel = CancellationToken::new();
        bucket.until_ready(&cancel).unwrap();

        let waiter_bucket = Arc::clone(&bucket);
        let waiter_cancel = cancel.clone();
        let handle = thread::spawn(move || waiter_bucket.until_ready(&waiter_cancel));
        thread::sleep(Duration::from_millis(20));
        cancel.cancel();
        assert!(matches!(
            handle.join().unwrap(),
            Err(ScryfallError::Cancelled)
        ));
    }

    #[test]
    fn tiny_rate_waits_instead_of_overflowing() {
        let bucket = Arc::new(TokenBucket::new(1e-20, 1).unwrap());
        let cancel = CancellationToken::new();
        bucket.until_ready(&cancel).unwrap();
        assert_eq!(bucket.try_acquire(), Err(MAX_WAIT));

        let waiter_bucket = Arc::clone(&bucket);
        let waiter_cancel = cancel.clone();
        let handle = thread::spawn(move || waiter_bucket.until_ready(&waiter_cancel));
        thread::sleep(Duration::from_millis(20));
        cancel.cancel();
        assert!(matches!(
            handle.join().unwrap(),
            Err(ScryfallError::Cancelled)
        ));
    }

    #[test]
    fn concurrent_callers_share_the_budget() {
        let bucket = Arc::new(TokenBucket::new(1000.0, 4).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let bucket = Arc::clone(&bucket);
                thread::spawn(move || bucket.until_ready(&CancellationToken::new()))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
    }

    #[test]
    fn unlimited_admits_unless_cancelled() {
        let cancel = CancellationToken::new();
        assert!(Unlimited.until_ready(&cancel).is_ok());
        cancel.cancel();
        assert!(Unlimited.until_ready(&cancel).is_err());
    }
}
