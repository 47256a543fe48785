//! Per-call cancellation and deadline handling.
//!
//! Every exchange takes a [`CallContext`]. Dropping the returned future
//! cancels a call as usual in async Rust; the context additionally lets the
//! caller cancel from elsewhere (another task holding a clone) or bound the
//! call with a deadline, and lets the client report *why* the exchange ended.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

/// Why a [`CallContext`] is done.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelReason {
    /// [`CallContext::cancel`] was called.
    Cancelled,
    /// The context's deadline passed.
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("context canceled"),
            Self::DeadlineExceeded => f.write_str("context deadline exceeded"),
        }
    }
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cancellation and deadline handle threaded through every client call.
///
/// Clones share cancellation state, so a clone handed to another task can
/// cancel calls made with the original.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use graphql_upload_client::{CallContext, CancelReason};
///
/// let ctx = CallContext::new().with_timeout(Duration::from_secs(5));
/// assert_eq!(ctx.err(), None);
///
/// ctx.cancel();
/// assert_eq!(ctx.err(), Some(CancelReason::Cancelled));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CallContext {
    state: Arc<CancelState>,
    deadline: Option<Instant>,
}

impl CallContext {
    /// Creates a context that is never done unless cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a context sharing this one's cancellation, bounded by `deadline`.
    ///
    /// An earlier existing deadline is kept.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = self.deadline.map_or(deadline, |d| d.min(deadline));
        Self {
            state: Arc::clone(&self.state),
            deadline: Some(deadline),
        }
    }

    /// Returns a context sharing this one's cancellation that expires after `timeout`.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels this context and every clone of it. Idempotent.
    pub fn cancel(&self) {
        if !self.state.cancelled.swap(true, Ordering::SeqCst) {
            self.state.notify.notify_waiters();
        }
    }

    /// Returns true once the context is cancelled or past its deadline.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Returns why the context is done, or `None` while it is still live.
    ///
    /// Explicit cancellation wins over an expired deadline.
    #[must_use]
    pub fn err(&self) -> Option<CancelReason> {
        if self.state.cancelled.load(Ordering::SeqCst) {
            return Some(CancelReason::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is done, yielding the reason.
    pub async fn done(&self) -> CancelReason {
        loop {
            // Register interest before checking the flag so a concurrent
            // `cancel` cannot slip between the check and the wait.
            let notified = self.state.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(reason) = self.err() {
                return reason;
            }

            match self.deadline {
                Some(deadline) => {
                    tokio::select! {
                        () = &mut notified => {}
                        () = tokio::time::sleep_until(deadline) => {}
                    }
                }
                None => notified.await,
            }
        }
    }
}
