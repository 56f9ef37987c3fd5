//! Network invocation: send one intake request and return what came back.
//!
//! The transport reports raw facts only (a status and a body, or no
//! response at all). Deciding what those facts mean for the user is the
//! job of [`crate::pipeline::classify`].

use crate::config::IntakeConfig;
use crate::error::{IntakeError, TransportError};
use crate::pipeline::request::IntakeRequest;
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// A response received from the intake endpoint, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a single intake request. Implementations must not retry.
#[async_trait]
pub trait IntakeTransport: Send + Sync {
    async fn send(&self, request: IntakeRequest) -> Result<RawResponse, TransportError>;
}

/// `multipart/form-data` POST over HTTP via `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Build a transport for the configured endpoint and timeout.
    pub fn new(config: &IntakeConfig) -> Result<Self, IntakeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| IntakeError::Internal(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint_url()?,
        })
    }

    /// The absolute URL requests are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl IntakeTransport for HttpTransport {
    async fn send(&self, request: IntakeRequest) -> Result<RawResponse, TransportError> {
        debug!(
            "POST {} ({} field, {} bytes)",
            self.endpoint,
            request.field(),
            request.payload_len()
        );

        let form = request
            .into_form()
            .map_err(|e| TransportError::Local(e.to_string()))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        let status = response.status().as_u16();

        // The timeout also covers reading the body.
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        debug!("Response status {} ({} bytes)", status, body.len());
        Ok(RawResponse { status, body })
    }
}
