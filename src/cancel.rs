//! Cooperative cancellation for async operations
//!
//! A `CancelToken` is checked by the async backend before every native call,
//! so a cancelled walk or copy stops at its next suspension point.

use crate::error::{FsError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; takes effect before the next native call
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with `FsError::Cancelled` once cancellation was requested
    ///
    /// # Errors
    ///
    /// Returns `FsError::Cancelled` if `cancel()` has been called.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(FsError::Cancelled)
        } else {
            Ok(())
        }
    }
}
