//! One-shot cooperative cancellation shared by a coordinator and its workers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Broadcast cancellation flag. Clones observe the same flag.
///
/// Once cancelled the token stays cancelled; further calls to [`cancel`]
/// are no-ops.
///
/// [`cancel`]: CancellationToken::cancel
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Returns true only for the call that flipped it.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Guard that raises the signal if the owning thread unwinds.
    pub fn cancel_on_panic(&self) -> CancelOnPanic {
        CancelOnPanic {
            token: self.clone(),
        }
    }
}

/// Raises its token when dropped during a panic so siblings stop promptly.
#[derive(Debug)]
pub struct CancelOnPanic {
    token: CancellationToken,
}

impl Drop for CancelOnPanic {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.token.cancel();
        }
    }
}
