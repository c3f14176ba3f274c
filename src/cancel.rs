//! Cooperative cancellation shared between the caller and a running job
//!
//! The orchestrator polls the token at item boundaries (top of every batch
//! loop iteration and before each per-track step), so a cancelled job always
//! stops at a clean point and reports [`JobStatus::Cancelled`] rather than an
//! error.
//!
//! [`JobStatus::Cancelled`]: crate::downloader::JobStatus::Cancelled

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Cloneable cancellation token.
///
/// All clones share the same flag; cancelling any clone cancels them all.
/// Cancellation is one-way and sticky.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    /// Create a fresh, not-yet-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake any waiters.
    ///
    /// Idempotent; repeated calls have no further effect.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Wait until cancellation is requested.
    ///
    /// Returns immediately if the token is already cancelled.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        let notified = self.inner.notify.notified();
        // Re-check after registering to close the race with cancel().
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}
