//! Scripted transport for deterministic pipeline tests.

use api_client::{RawResponse, RequestDescriptor, Transport, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// One scripted result for a `perform` call, consumed in FIFO order.
#[derive(Debug, Clone)]
pub enum ScriptedCall {
    /// Respond with this status and body.
    Respond {
        /// HTTP status code.
        status: u16,
        /// Body bytes.
        body: Vec<u8>,
    },
    /// Respond after a pause, keeping the attempt in flight meanwhile.
    RespondAfter {
        /// HTTP status code.
        status: u16,
        /// Body bytes.
        body: Vec<u8>,
        /// Pause before settling.
        delay: Duration,
    },
    /// Fail with a transport error.
    Fail(TransportError),
    /// Never settle; the attempt must be cancelled by its deadline.
    Hang,
}

impl ScriptedCall {
    /// Shorthand for [`ScriptedCall::Respond`].
    #[must_use]
    pub fn respond(status: u16, body: &[u8]) -> Self {
        Self::Respond {
            status,
            body: body.to_vec(),
        }
    }

    /// Shorthand for [`ScriptedCall::RespondAfter`].
    #[must_use]
    pub fn respond_after(status: u16, body: &[u8], delay: Duration) -> Self {
        Self::RespondAfter {
            status,
            body: body.to_vec(),
            delay,
        }
    }
}

/// One scripted result for a `refresh` call.
#[derive(Debug, Clone)]
pub struct ScriptedRefresh {
    result: Result<(), TransportError>,
    delay: Option<Duration>,
}

/// In-memory transport that replays a script.
///
/// `perform` results are consumed in the order calls arrive; an
/// exhausted script fails the attempt with a malformed-request error so
/// the mistake is visible in the test's assertions. `refresh` succeeds
/// immediately when unscripted. Call counters and the cancellation
/// counter make attempt accounting observable.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    calls: Mutex<VecDeque<ScriptedCall>>,
    refreshes: Mutex<VecDeque<ScriptedRefresh>>,
    perform_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    cancelled: Arc<AtomicUsize>,
}

/// Increments the counter unless the attempt settled on its own.
struct CancelGuard {
    counter: Arc<AtomicUsize>,
    armed: bool,
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if self.armed {
            self.counter.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl ScriptedTransport {
    /// Create a transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one scripted `perform` result.
    pub async fn script(&self, call: ScriptedCall) {
        self.calls.lock().await.push_back(call);
    }

    /// Append a plain response.
    pub async fn script_response(&self, status: u16, body: &[u8]) {
        self.script(ScriptedCall::respond(status, body)).await;
    }

    /// Append a refresh that succeeds after a pause.
    pub async fn script_refresh_ok_after(&self, delay: Duration) {
        self.refreshes.lock().await.push_back(ScriptedRefresh {
            result: Ok(()),
            delay: Some(delay),
        });
    }

    /// Append a refresh that fails immediately.
    pub async fn script_refresh_err(&self, err: TransportError) {
        self.refreshes.lock().await.push_back(ScriptedRefresh {
            result: Err(err),
            delay: None,
        });
    }

    /// Append a refresh that fails after a pause.
    pub async fn script_refresh_err_after(&self, err: TransportError, delay: Duration) {
        self.refreshes.lock().await.push_back(ScriptedRefresh {
            result: Err(err),
            delay: Some(delay),
        });
    }

    /// Number of `perform` calls observed.
    #[must_use]
    pub fn perform_count(&self) -> usize {
        self.perform_calls.load(Ordering::SeqCst)
    }

    /// Number of `refresh` calls observed.
    #[must_use]
    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Number of attempts that were dropped before settling.
    #[must_use]
    pub fn cancelled_count(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn perform(&self, _descriptor: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        self.perform_calls.fetch_add(1, Ordering::SeqCst);
        let call = self.calls.lock().await.pop_front();

        match call {
            None => Err(TransportError::Request(
                "transport script exhausted".to_string(),
            )),
            Some(ScriptedCall::Respond { status, body }) => Ok(RawResponse { status, body }),
            Some(ScriptedCall::RespondAfter {
                status,
                body,
                delay,
            }) => {
                let mut guard = CancelGuard {
                    counter: Arc::clone(&self.cancelled),
                    armed: true,
                };
                tokio::time::sleep(delay).await;
                guard.armed = false;
                Ok(RawResponse { status, body })
            }
            Some(ScriptedCall::Fail(err)) => Err(err),
            Some(ScriptedCall::Hang) => {
                let _guard = CancelGuard {
                    counter: Arc::clone(&self.cancelled),
                    armed: true,
                };
                std::future::pending().await
            }
        }
    }

    async fn refresh(&self) -> Result<(), TransportError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.refreshes.lock().await.pop_front();

        match scripted {
            None => Ok(()),
            Some(ScriptedRefresh { result, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                result
            }
        }
    }
}
