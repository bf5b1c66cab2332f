//! Per-attempt deadline enforcement.

use crate::descriptor::RequestDescriptor;
use crate::error::TransportError;
use crate::transport::{RawResponse, Transport};
use std::time::Duration;
use tracing::warn;

/// Default deadline for one transport attempt.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

/// Bounds one transport attempt with a wall-clock deadline.
///
/// The attempt and the deadline race; whichever settles first wins.
/// Losing the race drops the in-flight transport future, which cancels
/// the underlying request. Cancellation is per attempt only: other
/// requests and an in-flight refresh are untouched.
#[derive(Debug, Clone)]
pub struct TimeoutGuard {
    default_deadline: Duration,
}

impl TimeoutGuard {
    /// Create a guard with the given default deadline.
    #[must_use]
    pub const fn new(default_deadline: Duration) -> Self {
        Self { default_deadline }
    }

    /// Run one attempt under the descriptor's deadline.
    ///
    /// # Errors
    ///
    /// Returns the transport's own error untouched when the attempt
    /// settles in time, or [`TransportError::DeadlineExceeded`] when the
    /// deadline fires first.
    pub async fn attempt<T: Transport + ?Sized>(
        &self,
        transport: &T,
        descriptor: &RequestDescriptor,
    ) -> Result<RawResponse, TransportError> {
        let deadline = descriptor.timeout().unwrap_or(self.default_deadline);
        match tokio::time::timeout(deadline, transport.perform(descriptor)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    path = descriptor.path(),
                    deadline_ms = deadline.as_millis() as u64,
                    "attempt aborted at deadline"
                );
                Err(TransportError::DeadlineExceeded { deadline })
            }
        }
    }
}

impl Default for TimeoutGuard {
    fn default() -> Self {
        Self::new(DEFAULT_DEADLINE)
    }
}

// Deadline tests live in tests/timeout_tests.rs: ScriptedTransport
// implements the externally linked `api_client::Transport`, which a
// `cfg(test)` module in this crate cannot unify with.
