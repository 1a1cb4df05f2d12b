//! Cooperative cancellation for handler operations.
//!
//! A [`CancellationToken`] is handed to a [`crate::FileHandler`] at
//! construction. Clones share the same flag, so a signal handler (or a test)
//! can keep one clone and trip it while the handler is mid-operation.
//!
//! The flag is only observed at suspension points: before every chunk read,
//! before every chunk write, and while the log-file header is written.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared, cloneable cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
