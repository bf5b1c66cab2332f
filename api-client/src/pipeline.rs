//! The retry orchestrator: one attempt, classification, and at most one
//! refresh-and-retry cycle.

use crate::classify::classify;
use crate::config::ClientConfig;
use crate::descriptor::RequestDescriptor;
use crate::error::BuildError;
use crate::outcome::Outcome;
use crate::refresh::RefreshCoordinator;
use crate::timeout::TimeoutGuard;
use crate::transport::{HttpTransport, Transport};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Resilient client for the dashboard API.
///
/// One instance is shared across the process; all requests sent through
/// it share the same session and the same refresh coordinator.
pub struct ApiClient<T: Transport + 'static> {
    transport: Arc<T>,
    guard: TimeoutGuard,
    refresh: RefreshCoordinator<T>,
}

impl ApiClient<HttpTransport> {
    /// Build a client backed by the real HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the configuration is invalid or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, BuildError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(
            transport,
            TimeoutGuard::new(config.attempt_deadline),
        ))
    }
}

impl<T: Transport + 'static> ApiClient<T> {
    /// Build a client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(transport: T, guard: TimeoutGuard) -> Self {
        Self::with_transport_shared(Arc::new(transport), guard)
    }

    /// Build a client over a transport the caller keeps a handle to.
    #[must_use]
    pub fn with_transport_shared(transport: Arc<T>, guard: TimeoutGuard) -> Self {
        Self {
            guard,
            refresh: RefreshCoordinator::new(Arc::clone(&transport)),
            transport,
        }
    }

    /// Dispatch one request through the middleware pipeline.
    ///
    /// Performs one guarded attempt and classifies it. A 401 triggers
    /// exactly one coordinated session refresh followed by exactly one
    /// retry; every other classification is returned unchanged. The
    /// returned [`Outcome`] is terminal: at most two transport attempts
    /// and at most one refresh call per invocation, never more.
    #[instrument(
        skip(self, descriptor),
        fields(
            method = %descriptor.method(),
            path = descriptor.path(),
            request_id = %Uuid::new_v4(),
        )
    )]
    pub async fn send(&self, descriptor: RequestDescriptor) -> Outcome {
        let first = classify(self.guard.attempt(&*self.transport, &descriptor).await);

        if !first.is_unauthorized() {
            return first.into_outcome();
        }

        debug!("unauthorized; refreshing session");
        match self.refresh.ensure_fresh().await {
            Err(err) => {
                warn!(error = %err, "session could not be re-established");
                Outcome::AuthError
            }
            Ok(()) => {
                // Same descriptor content, fresh deadline. The retried
                // attempt's classification is final: a second 401
                // resolves to AuthError instead of looping.
                debug!("session refreshed; retrying request");
                classify(self.guard.attempt(&*self.transport, &descriptor).await).into_outcome()
            }
        }
    }
}
