//! Cooperative cancellation forwarded into every capability call.

use crate::error::CapabilityError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable cancellation flag.
///
/// The executor never cancels on its own; it hands the caller's token to
/// import, setup, each behavior and cleanup. A capability that notices the
/// token should return [`CapabilityError::Cancelled`], which the executor then
/// records like any other failure of that phase.
///
/// # Examples
///
/// ```
/// use weft_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let child = token.clone();
/// token.cancel();
/// assert!(child.is_cancelled());
/// assert!(child.check().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels this token and every clone of it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns `Err(CapabilityError::Cancelled)` if the token is cancelled.
    pub fn check(&self) -> Result<(), CapabilityError> {
        if self.is_cancelled() {
            Err(CapabilityError::Cancelled)
        } else {
            Ok(())
        }
    }
}
