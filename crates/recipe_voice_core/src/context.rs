//! Per-invocation cancellation and deadline context.
//!
//! # Responsibility
//! - Carry one invocation's deadline and cancellation signal into store calls.
//!
//! # Invariants
//! - Once done (cancelled or past deadline) a context never becomes live again.
//! - Clones share the same cancellation flag.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Reason a context stopped accepting work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    Cancelled,
    DeadlineExceeded,
}

impl Display for ContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "invocation context cancelled"),
            Self::DeadlineExceeded => write!(f, "invocation deadline exceeded"),
        }
    }
}

impl Error for ContextError {}

/// Cancellable invocation context handed to every dispatch call.
///
/// The token needs no async runtime; `cancel()` and the checks are
/// plain synchronous calls.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    cancellation_token: CancellationToken,
    deadline: Option<Instant>,
}

impl InvocationContext {
    /// Context without deadline that is only done when cancelled.
    pub fn background() -> Self {
        Self {
            cancellation_token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Context whose deadline is `timeout` from now.
    ///
    /// A timeout too large to represent as an `Instant` means no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancellation_token: CancellationToken::new(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancellation_token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Signals cancellation to this context and all of its clones.
    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    /// Returns `Err` once the context is cancelled or its deadline has passed.
    ///
    /// Cancellation wins over an expired deadline.
    pub fn check(&self) -> Result<(), ContextError> {
        if self.cancellation_token.is_cancelled() {
            return Err(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ContextError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    pub fn is_done(&self) -> bool {
        self.check().is_err()
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::background()
    }
}

#[cfg(test)]
mod tests {
    use super::{ContextError, InvocationContext};
    use std::time::{Duration, Instant};

    #[test]
    fn background_context_is_live_until_cancelled() {
        let ctx = InvocationContext::background();
        assert!(ctx.check().is_ok());

        let clone = ctx.clone();
        clone.cancel();
        assert_eq!(ctx.check(), Err(ContextError::Cancelled));
    }

    #[test]
    fn elapsed_deadline_reports_deadline_exceeded() {
        let ctx = InvocationContext::with_deadline(Instant::now());
        assert_eq!(ctx.check(), Err(ContextError::DeadlineExceeded));
    }

    #[test]
    fn cancellation_wins_over_deadline() {
        let ctx = InvocationContext::with_timeout(Duration::ZERO);
        ctx.cancel();
        assert_eq!(ctx.check(), Err(ContextError::Cancelled));
    }

    #[test]
    fn unrepresentable_timeout_does_not_panic() {
        let ctx = InvocationContext::with_timeout(Duration::from_secs(u64::MAX));
        assert!(ctx.check().is_ok());
        ctx.cancel();
        assert_eq!(ctx.check(), Err(ContextError::Cancelled));
    }

    #[test]
    fn future_deadline_is_live() {
        let ctx = InvocationContext::with_timeout(Duration::from_secs(60));
        assert!(!ctx.is_done());
    }
}
