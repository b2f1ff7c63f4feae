//! HTTP implementation of the backend traits.

use std::sync::Arc;

use reqwest::RequestBuilder;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};

use cardfolio_core::{ProductId, ProfileId, UserId};

use super::envelope::ApiEnvelope;
use super::types::{Account, Cart, Profile, QrCode};
use super::{BackendError, CartApi, Credentials, ProfileApi};
use crate::config::BackendConfig;

/// Client for the backend REST API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("cardfolio/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client: builder.build()?,
                base_url: config.api_url.clone(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Send a request and decode the envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiEnvelope<T>, BackendError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&response_text)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| response_text.chars().take(200).collect());
            tracing::warn!(
                status = %status,
                message = %message,
                "Backend returned non-success status"
            );
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(BackendError::NotFound(message));
            }
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    fn authorized(&self, request: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
        request.bearer_auth(credentials.token.expose_secret())
    }

    /// Fetch the QR code and redirect record for a card owner.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the record is absent.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_qr_code(&self, user_id: &UserId) -> Result<QrCode, BackendError> {
        let url = self.url(&format!(
            "/qrCode/getQrCode/{}",
            urlencoding::encode(user_id.as_str())
        ));
        self.send::<QrCode>(self.inner.client.get(url))
            .await?
            .into_data("qr code")
    }
}

impl ProfileApi for BackendClient {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn get_account(&self, user_id: &UserId) -> Result<Account, BackendError> {
        let request = self
            .inner
            .client
            .post(self.url("/userProfile/getUser"))
            .json(&json!({ "userId": user_id }));

        let account = self.send::<Account>(request).await?.into_data("account")?;
        debug!(theme = ?account.theme, profile_id = ?account.profile_id, "Fetched account");
        Ok(account)
    }

    #[instrument(skip(self), fields(profile_id = %profile_id))]
    async fn get_profile(&self, profile_id: &ProfileId) -> Result<Profile, BackendError> {
        let url = self.url(&format!(
            "/userProfile/getUserProfile/{}",
            urlencoding::encode(profile_id.as_str())
        ));

        let profile = self
            .send::<Profile>(self.inner.client.get(url))
            .await?
            .into_data("profile")?;

        if profile.is_empty() {
            return Err(BackendError::NotFound(format!("profile {profile_id}")));
        }
        Ok(profile)
    }
}

impl CartApi for BackendClient {
    #[instrument(skip(self, credentials), fields(user_id = %credentials.user_id))]
    async fn get_cart(&self, credentials: &Credentials) -> Result<Cart, BackendError> {
        let request = self.authorized(
            self.inner
                .client
                .post(self.url("/cart/getUserCart"))
                .json(&json!({ "userId": credentials.user_id })),
            credentials,
        );

        match self.send::<Cart>(request).await?.into_data("cart") {
            // A visitor who never added anything has no cart document yet
            Err(BackendError::NotFound(_)) => Ok(Cart::default()),
            other => other,
        }
    }

    #[instrument(skip(self, credentials), fields(user_id = %credentials.user_id))]
    async fn update_quantity(
        &self,
        credentials: &Credentials,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), BackendError> {
        let request = self.authorized(
            self.inner
                .client
                .post(self.url("/cart/updateQuantity"))
                .json(&json!({
                    "userId": credentials.user_id,
                    "productId": product_id,
                    "quantity": quantity,
                })),
            credentials,
        );

        self.send::<serde_json::Value>(request)
            .await?
            .into_unit("update quantity")
    }

    #[instrument(skip(self, credentials), fields(user_id = %credentials.user_id))]
    async fn remove_item(
        &self,
        credentials: &Credentials,
        product_id: &ProductId,
    ) -> Result<(), BackendError> {
        let request = self.authorized(
            self.inner
                .client
                .post(self.url("/cart/removeItem"))
                .json(&json!({
                    "userId": credentials.user_id,
                    "productId": product_id,
                })),
            credentials,
        );

        self.send::<serde_json::Value>(request)
            .await?
            .into_unit("remove item")
    }
}
