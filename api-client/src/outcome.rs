//! Terminal outcomes exposed to callers of the pipeline.

use crate::error::FatalCause;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// Payload of a successful attempt: the response status and body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    status: u16,
    body: Vec<u8>,
}

impl Payload {
    pub(crate) const fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Terminal outcome of [`crate::ApiClient::send`].
///
/// This is the whole error surface the view layer reacts to. There is no
/// `Unauthorized` variant on purpose: a 401 is always resolved inside the
/// pipeline, either into the retried attempt's outcome or into
/// [`Outcome::AuthError`] when the session could not be re-established.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The request succeeded (status in [200, 400)).
    Ok(Payload),

    /// The network was unreachable or the attempt hit its deadline.
    /// Transient; the caller may retry later or show a connectivity banner.
    Offline {
        /// Stringified transport-level cause.
        detail: String,
        /// When the attempt was classified.
        timestamp: DateTime<Utc>,
    },

    /// The server answered with a 5xx. Surfaced, never retried here.
    ServerError {
        /// The failing status code.
        status: u16,
    },

    /// The session could not be re-established. The caller's standard
    /// response is to redirect to the login flow on this tag, and only
    /// this tag.
    AuthError,

    /// Request-contract violation. Never retried, always surfaced.
    Fatal(FatalCause),
}

impl Outcome {
    /// Whether this outcome carries a successful payload.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Whether the network was unreachable for this request.
    #[must_use]
    pub const fn is_offline(&self) -> bool {
        matches!(self, Self::Offline { .. })
    }

    /// Whether the server reported a 5xx fault.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::ServerError { .. })
    }

    /// Whether the session could not be re-established.
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_json() {
        let payload = Payload::new(200, br#"{"id":"u1"}"#.to_vec());
        let value: serde_json::Value = payload.json().unwrap();
        assert_eq!(value["id"], "u1");
    }

    #[test]
    fn test_payload_json_rejects_garbage() {
        let payload = Payload::new(200, b"not json".to_vec());
        let result: Result<serde_json::Value, _> = payload.json();
        assert!(result.is_err());
    }

    #[test]
    fn test_outcome_predicates() {
        assert!(Outcome::Ok(Payload::new(204, Vec::new())).is_ok());
        assert!(Outcome::AuthError.is_auth_error());
        assert!(Outcome::ServerError { status: 503 }.is_server_error());
        assert!(
            Outcome::Offline {
                detail: "refused".to_string(),
                timestamp: Utc::now(),
            }
            .is_offline()
        );
        assert!(!Outcome::AuthError.is_ok());
    }
}
