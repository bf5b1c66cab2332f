//! Transport seam between the pipeline and the network.
//!
//! The pipeline consumes exactly two operations: perform one attempt of a
//! described request, and refresh the ambient session. [`HttpTransport`]
//! is the production implementation over reqwest; tests substitute a
//! scripted transport through the same trait.

use crate::config::ClientConfig;
use crate::descriptor::RequestDescriptor;
use crate::error::{BuildError, TransportError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use tracing::debug;
use url::Url;

/// Raw result of one HTTP attempt, before classification.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Body bytes.
    pub body: Vec<u8>,
}

/// The two network operations the pipeline consumes.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one attempt of the described request.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the attempt does not produce an
    /// HTTP response at all.
    async fn perform(&self, descriptor: &RequestDescriptor) -> Result<RawResponse, TransportError>;

    /// Refresh the ambient session credentials.
    ///
    /// A fixed, parameterless call to the refresh endpoint. Credential
    /// storage rides on the transport's session state (cookies); the
    /// pipeline only cares whether the refresh settled successfully.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the refresh call fails or is
    /// rejected.
    async fn refresh(&self) -> Result<(), TransportError>;
}

/// reqwest-backed transport with a shared cookie-based session.
pub struct HttpTransport {
    base_url: Url,
    refresh_path: String,
    http: Client,
}

impl HttpTransport {
    /// Build a transport from configuration.
    ///
    /// Per-attempt deadlines are enforced by the pipeline's timeout
    /// guard, so the client itself carries only a connect timeout.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the base URL does not parse or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, BuildError> {
        let base_url = Url::parse(&config.base_url)?;
        let http = ClientBuilder::new()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .use_rustls_tls()
            .build()?;

        Ok(Self {
            base_url,
            refresh_path: config.refresh_path.clone(),
            http,
        })
    }

    fn join(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|e| TransportError::Request(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(&self, descriptor: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        let url = self.join(descriptor.path())?;
        let mut request = self.http.request(descriptor.method().clone(), url);

        for (name, value) in descriptor.headers() {
            request = request.header(name, value);
        }
        if let Some(body) = descriptor.body() {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?
            .to_vec();

        debug!(path = descriptor.path(), status, "attempt settled");
        Ok(RawResponse { status, body })
    }

    async fn refresh(&self) -> Result<(), TransportError> {
        let url = self.join(&self.refresh_path)?;
        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Request(format!(
                "refresh rejected with status {status}"
            )));
        }
        Ok(())
    }
}
