//! Resilient HTTP client pipeline for the dashboard API.
//!
//! Every outbound request goes through a single middleware pipeline that
//! provides:
//! - A hard per-attempt deadline with cancellation of the in-flight call
//! - Classification of each attempt into a closed set of outcomes
//! - A single-flight session refresh shared by all concurrent requests,
//!   followed by at most one retry of the original request
//!
//! Callers interact with one operation, [`ApiClient::send`], and react to
//! the terminal [`Outcome`] tags instead of raw transport errors.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod classify;
pub mod config;
pub mod descriptor;
pub mod endpoints;
pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod refresh;
pub mod timeout;
pub mod transport;

pub use config::ClientConfig;
pub use descriptor::RequestDescriptor;
pub use endpoints::UserProfile;
pub use error::{BuildError, FatalCause, RefreshError, TransportError};
pub use outcome::{Outcome, Payload};
pub use pipeline::ApiClient;
pub use refresh::RefreshCoordinator;
pub use timeout::TimeoutGuard;
pub use transport::{HttpTransport, RawResponse, Transport};
