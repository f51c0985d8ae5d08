//! Cancellation sources
//!
//! The poll loop checks its cancellation source once per tick boundary,
//! before the deadline check. Anything that can answer "has cancel been
//! requested?" without blocking can act as a source.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A pollable "cancel requested" flag.
pub trait CancelSignal: Send + Sync {
    /// Returns true once cancellation has been requested
    fn is_cancelled(&self) -> bool;
}

impl CancelSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        CancellationToken::is_cancelled(self)
    }
}

impl CancelSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<T: CancelSignal + ?Sized> CancelSignal for Arc<T> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// A cancellation source that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl CancelSignal for Never {
    fn is_cancelled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_token_signal() {
        let token = CancellationToken::new();
        let child = token.child_token();
        assert!(!CancelSignal::is_cancelled(&child));

        token.cancel();
        assert!(CancelSignal::is_cancelled(&token));
        assert!(CancelSignal::is_cancelled(&child), "Child token should follow its parent");
    }

    #[test]
    fn test_atomic_flag_signal() {
        let flag = Arc::new(AtomicBool::new(false));
        assert!(!flag.is_cancelled());

        flag.store(true, Ordering::Release);
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_never_signal() {
        assert!(!Never.is_cancelled());
    }
}
