//! Classification of one transport attempt into a semantic outcome.
//!
//! Pure mapping, no side effects: the same attempt result always carries
//! the same tag. The pipeline's retry decision hangs entirely on the
//! `Unauthorized` tag, which never leaves this crate.

use crate::error::{FatalCause, TransportError};
use crate::outcome::{Outcome, Payload};
use crate::transport::RawResponse;
use chrono::{DateTime, Utc};

/// Classification of one attempt. Internal: the public surface is
/// [`Outcome`], which replaces `Unauthorized` with `AuthError`.
#[derive(Debug, Clone)]
pub(crate) enum Classification {
    /// Status in [200, 400).
    Ok(Payload),
    /// Status 401; resolved by the orchestrator, never surfaced.
    Unauthorized,
    /// The attempt never reached the server.
    Offline {
        detail: String,
        timestamp: DateTime<Utc>,
    },
    /// Status >= 500.
    ServerError { status: u16 },
    /// Contract violation; not retried.
    Fatal(FatalCause),
}

impl Classification {
    /// Resolve into a terminal outcome.
    ///
    /// `Unauthorized` maps to `AuthError` here: the orchestrator
    /// intercepts the first 401 before conversion, so this branch is
    /// only reached by a second 401 after a successful refresh, which
    /// must terminate rather than loop.
    pub(crate) fn into_outcome(self) -> Outcome {
        match self {
            Self::Ok(payload) => Outcome::Ok(payload),
            Self::Unauthorized => Outcome::AuthError,
            Self::Offline { detail, timestamp } => Outcome::Offline { detail, timestamp },
            Self::ServerError { status } => Outcome::ServerError { status },
            Self::Fatal(cause) => Outcome::Fatal(cause),
        }
    }

    pub(crate) const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Classify the result of one transport attempt.
pub(crate) fn classify(attempt: Result<RawResponse, TransportError>) -> Classification {
    match attempt {
        Err(err) if err.is_unreachable() => Classification::Offline {
            detail: err.to_string(),
            timestamp: Utc::now(),
        },
        Err(err) => Classification::Fatal(FatalCause::Request(err.to_string())),
        Ok(response) => classify_response(response),
    }
}

fn classify_response(response: RawResponse) -> Classification {
    match response.status {
        401 => Classification::Unauthorized,
        s if s >= 500 => Classification::ServerError { status: s },
        s if (200..400).contains(&s) => Classification::Ok(Payload::new(s, response.body)),
        // Remaining 4xx (and 1xx): the server reporting a
        // request-contract violation. Retrying cannot help.
        s => Classification::Fatal(FatalCause::Rejected { status: s }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn response(status: u16) -> RawResponse {
        RawResponse {
            status,
            body: b"{}".to_vec(),
        }
    }

    #[test]
    fn test_success_range() {
        assert!(matches!(
            classify(Ok(response(200))),
            Classification::Ok(_)
        ));
        assert!(matches!(
            classify(Ok(response(204))),
            Classification::Ok(_)
        ));
        assert!(matches!(
            classify(Ok(response(304))),
            Classification::Ok(_)
        ));
    }

    #[test]
    fn test_unauthorized() {
        assert!(classify(Ok(response(401))).is_unauthorized());
    }

    #[test]
    fn test_server_errors() {
        assert!(matches!(
            classify(Ok(response(500))),
            Classification::ServerError { status: 500 }
        ));
        assert!(matches!(
            classify(Ok(response(503))),
            Classification::ServerError { status: 503 }
        ));
    }

    #[test]
    fn test_other_client_errors_are_fatal() {
        assert!(matches!(
            classify(Ok(response(404))),
            Classification::Fatal(FatalCause::Rejected { status: 404 })
        ));
        assert!(matches!(
            classify(Ok(response(400))),
            Classification::Fatal(FatalCause::Rejected { status: 400 })
        ));
    }

    #[test]
    fn test_unreachable_is_offline() {
        let err = TransportError::Unreachable("connection refused".to_string());
        match classify(Err(err)) {
            Classification::Offline { detail, .. } => {
                assert!(detail.contains("connection refused"));
            }
            other => panic!("expected Offline, got {other:?}"),
        }
    }

    #[test]
    fn test_deadline_is_offline() {
        let err = TransportError::DeadlineExceeded {
            deadline: Duration::from_secs(10),
        };
        assert!(matches!(
            classify(Err(err)),
            Classification::Offline { .. }
        ));
    }

    #[test]
    fn test_malformed_request_is_fatal() {
        let err = TransportError::Request("invalid header value".to_string());
        assert!(matches!(
            classify(Err(err)),
            Classification::Fatal(FatalCause::Request(_))
        ));
    }

    #[test]
    fn test_classification_is_deterministic() {
        // Same raw outcome, same tag, every time.
        for status in [200u16, 401, 404, 500] {
            let first = classify(Ok(response(status)));
            let second = classify(Ok(response(status)));
            assert_eq!(
                std::mem::discriminant(&first),
                std::mem::discriminant(&second)
            );
        }
    }

    #[test]
    fn test_second_unauthorized_resolves_to_auth_error() {
        let outcome = classify(Ok(response(401))).into_outcome();
        assert!(outcome.is_auth_error());
    }
}
