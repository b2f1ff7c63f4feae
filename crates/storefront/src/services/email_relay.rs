//! EmailJS client used by the contact form.
//!
//! The relay renders a fixed template with the submitted fields and mails it
//! to the support inbox. It answers with a plain-text body, so failures are
//! classified by status and body text rather than parsed.

use std::future::Future;

use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::EmailRelayConfig;

/// Errors that can occur when interacting with the email relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Relay rejected the service/template/key combination (HTTP 412).
    #[error("Email relay configuration error")]
    Configuration,

    /// Relay refused the message and said why.
    #[error("Relay rejected message: {0}")]
    Rejected(String),

    /// Relay failed without an explanation.
    #[error("Relay returned status {0}")]
    Unexpected(u16),
}

/// Fields rendered into the relay's template.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub phone: String,
    pub message: String,
}

/// Something that can deliver a contact message.
pub trait MessageRelay: Send + Sync {
    fn send(&self, params: &TemplateParams) -> impl Future<Output = Result<(), RelayError>> + Send;
}

/// Request body for the EmailJS send endpoint.
#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
}

/// EmailJS REST client.
#[derive(Clone)]
pub struct EmailRelayClient {
    client: reqwest::Client,
    config: EmailRelayConfig,
}

impl EmailRelayClient {
    /// Create a new relay client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &EmailRelayConfig) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cardfolio/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

impl MessageRelay for EmailRelayClient {
    #[instrument(skip(self, params), fields(service_id = %self.config.service_id))]
    async fn send(&self, params: &TemplateParams) -> Result<(), RelayError> {
        let body = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: self.config.public_key.expose_secret(),
            template_params: params,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, body = %text, "Email relay returned an error");
        Err(classify_failure(status.as_u16(), &text))
    }
}

/// Map a non-success relay response onto a [`RelayError`].
fn classify_failure(status: u16, body: &str) -> RelayError {
    let body = body.trim();
    if status == 412 {
        RelayError::Configuration
    } else if body.is_empty() {
        RelayError::Unexpected(status)
    } else {
        RelayError::Rejected(body.to_string())
    }
}
