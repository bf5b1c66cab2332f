//! Single-flight coordination of session refresh.
//!
//! At most one refresh network call exists at any instant. Every caller
//! that needs the session re-established either starts that call or
//! joins the one already in flight, and all of them observe the same
//! settled result.

use crate::error::RefreshError;
use crate::transport::Transport;
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info, warn};

/// Whether a refresh round is outstanding.
///
/// Owned by the coordinator, mutated only under its mutex. The sender is
/// the shared handle every waiter of the current round subscribes to.
enum RefreshState {
    Idle,
    InFlight(broadcast::Sender<Result<(), RefreshError>>),
}

/// Process-wide coordinator for session refresh.
///
/// The mutex is `tokio::sync::Mutex`, whose wait queue is FIFO: under a
/// burst of simultaneous 401s, callers decide "start vs join" one at a
/// time, so two rounds can never start concurrently.
pub struct RefreshCoordinator<T: ?Sized> {
    state: Arc<Mutex<RefreshState>>,
    transport: Arc<T>,
}

impl<T: Transport + ?Sized + 'static> RefreshCoordinator<T> {
    /// Create a coordinator over the given transport.
    #[must_use]
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            state: Arc::new(Mutex::new(RefreshState::Idle)),
            transport,
        }
    }

    /// Ensure the session credentials are fresh.
    ///
    /// Safe to call from any number of tasks concurrently: across N
    /// callers arriving while a round is outstanding, exactly one
    /// refresh request is sent, and all N observe its result no earlier
    /// than the call settles.
    ///
    /// # Errors
    ///
    /// Returns the round's shared [`RefreshError`] when the refresh call
    /// itself failed. Terminal for that round; the coordinator never
    /// retries internally.
    pub async fn ensure_fresh(&self) -> Result<(), RefreshError> {
        let mut rx = {
            let mut state = self.state.lock().await;
            match &*state {
                RefreshState::InFlight(tx) => {
                    debug!("joining in-flight session refresh");
                    tx.subscribe()
                }
                RefreshState::Idle => {
                    let (tx, rx) = broadcast::channel(1);
                    *state = RefreshState::InFlight(tx.clone());

                    // The round runs on its own task: cancelling the
                    // request that happened to start it must not strand
                    // the other waiters.
                    let transport = Arc::clone(&self.transport);
                    let slot = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        debug!("starting session refresh");
                        let result = transport
                            .refresh()
                            .await
                            .map_err(|e| RefreshError::new(e.to_string()));

                        match &result {
                            Ok(()) => info!("session refresh succeeded"),
                            Err(err) => warn!(error = %err, "session refresh failed"),
                        }

                        // Reset and broadcast under the lock, so nobody
                        // can subscribe between the two and miss the
                        // result.
                        let mut state = slot.lock().await;
                        *state = RefreshState::Idle;
                        let _ = tx.send(result);
                    });

                    rx
                }
            }
        };

        rx.recv()
            .await
            .unwrap_or_else(|_| Err(RefreshError::interrupted()))
    }
}

// Single-flight tests live in tests/refresh_tests.rs:
// ScriptedTransport implements the externally linked
// `api_client::Transport`, which a `cfg(test)` module in this
// crate cannot unify with.
