//! Typed calls on top of the pipeline.

use crate::descriptor::RequestDescriptor;
use crate::error::FatalCause;
use crate::outcome::Outcome;
use crate::pipeline::ApiClient;
use crate::transport::Transport;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Path of the user profile endpoint.
pub const USER_PROFILE_PATH: &str = "/api/user/profile";

/// Profile record returned by `GET /api/user/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Stable user identifier.
    pub id: String,
    /// Primary email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl<T: Transport + 'static> ApiClient<T> {
    /// Issue a GET and decode the successful payload as JSON.
    ///
    /// # Errors
    ///
    /// Non-success outcomes pass through unchanged for the caller's own
    /// policy; an undecodable payload surfaces as [`Outcome::Fatal`].
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, Outcome> {
        match self.send(RequestDescriptor::get(path)).await {
            Outcome::Ok(payload) => payload
                .json()
                .map_err(|e| Outcome::Fatal(FatalCause::Decode(e.to_string()))),
            other => Err(other),
        }
    }

    /// Fetch the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn user_profile(&self) -> Result<UserProfile, Outcome> {
        self.get_json(USER_PROFILE_PATH).await
    }
}
