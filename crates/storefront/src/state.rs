//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{BackendClient, BackendError};
use crate::config::StorefrontConfig;
use crate::resolver::RememberedProfileIds;
use crate::services::whatsapp;
use crate::services::{EmailRelayClient, RelayError};

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("backend client: {0}")]
    Backend(#[from] BackendError),
    #[error("email relay client: {0}")]
    Relay(#[from] RelayError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like API clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
    email_relay: Option<EmailRelayClient>,
    remembered: RememberedProfileIds,
    whatsapp_link: Option<String>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let backend = BackendClient::new(&config.backend)?;
        let email_relay = config
            .email_relay
            .as_ref()
            .map(EmailRelayClient::new)
            .transpose()?;
        let whatsapp_link = config.whatsapp.as_ref().and_then(whatsapp::chat_link);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                email_relay,
                remembered: RememberedProfileIds::new(),
                whatsapp_link,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Email relay client, if configured.
    #[must_use]
    pub fn email_relay(&self) -> Option<&EmailRelayClient> {
        self.inner.email_relay.as_ref()
    }

    /// Profile ids remembered across visitors.
    #[must_use]
    pub fn remembered(&self) -> &RememberedProfileIds {
        &self.inner.remembered
    }

    /// WhatsApp chat link for the page layout.
    #[must_use]
    pub fn whatsapp_link(&self) -> Option<&str> {
        self.inner.whatsapp_link.as_deref()
    }
}
