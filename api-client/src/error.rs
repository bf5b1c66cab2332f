//! Error types for the request pipeline using thiserror 2.0.
//!
//! Transport errors describe a single failed attempt; refresh errors
//! describe a failed session-refresh round shared by every waiter.

use std::time::Duration;
use thiserror::Error;

/// Errors raised by one transport attempt.
///
/// `Clone` so a scripted or recorded attempt result can be replayed, and
/// so a refresh failure can be broadcast to every waiter.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The network is unreachable: refused connection, DNS failure,
    /// dropped socket.
    #[error("network unreachable: {0}")]
    Unreachable(String),

    /// The attempt was cancelled at its deadline.
    #[error("attempt aborted after {}ms", deadline.as_millis())]
    DeadlineExceeded {
        /// The deadline that expired.
        deadline: Duration,
    },

    /// The request could not be constructed or sent as specified.
    #[error("malformed request: {0}")]
    Request(String),
}

impl TransportError {
    /// Whether this error indicates the remote end could not be reached
    /// at all. Unreachable errors classify as offline; everything else
    /// is a contract violation.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_) | Self::DeadlineExceeded { .. })
    }

    /// Map a reqwest error onto the transport taxonomy.
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Request(err.to_string())
        } else {
            // Connect failures, timeouts, and connections dropped
            // mid-transfer all mean the remote end was not reached.
            Self::Unreachable(err.to_string())
        }
    }
}

/// The session could not be re-established.
///
/// Terminal for one refresh round: the coordinator never retries the
/// refresh call internally, and every waiter on that round receives a
/// clone of the same error.
#[derive(Error, Debug, Clone)]
#[error("session refresh failed: {detail}")]
pub struct RefreshError {
    detail: String,
}

impl RefreshError {
    /// Create a refresh error with the given detail.
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    /// The refresh task went away before settling.
    pub(crate) fn interrupted() -> Self {
        Self::new("refresh interrupted before completion")
    }

    /// Human-readable detail of the failure.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Cause carried by a fatal outcome. Never retried.
#[derive(Error, Debug, Clone)]
pub enum FatalCause {
    /// The server rejected the request as malformed (4xx other than 401).
    #[error("request rejected with status {status}")]
    Rejected {
        /// The rejecting status code.
        status: u16,
    },

    /// The request could not be issued at all.
    #[error("malformed request: {0}")]
    Request(String),

    /// A successful response carried a payload the caller could not decode.
    #[error("undecodable payload: {0}")]
    Decode(String),
}

/// Errors building an [`crate::ApiClient`] from configuration.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The configured base URL does not parse.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
