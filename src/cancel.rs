//! Cooperative cancellation for blocking operations.
//!
//! A [`CancellationToken`] is handed to every client call. Rate-limit waits
//! sleep on the token so that [`cancel()`](CancellationToken::cancel) wakes
//! them immediately; network reads check it between chunks.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use crate::error::{Result, ScryfallError};

#[derive(Debug, Default)]
struct Inner {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

/// Cloneable cancel signal shared between the caller and in-flight operations.
///
/// All clones observe the same state. Cancellation is permanent.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation and wake every thread sleeping on this token.
    pub fn cancel(&self) {
        let mut cancelled = self.lock();
        *cancelled = true;
        self.inner.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.lock()
    }

    /// Fail with [`ScryfallError::Cancelled`] if the token has been cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ScryfallError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Sleep for `timeout`, returning early with [`ScryfallError::Cancelled`]
    /// if the token is cancelled before or during the sleep.
    pub fn sleep(&self, timeout: Duration) -> Result<()> {
        let guard = self.lock();
        let (guard, _) = self
            .inner
            .wake
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if *guard {
            Err(ScryfallError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, bool> {
        // A poisoned flag is still a valid bool.
        self.inner
            .cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
