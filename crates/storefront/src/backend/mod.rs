//! Client for the profile/cart backend REST API.
//!
//! # Architecture
//!
//! - The backend is the source of truth for profiles, carts and QR codes -
//!   this crate keeps no copy beyond a single request
//! - Plain JSON over HTTPS via `reqwest`; cart endpoints take a bearer token
//! - Responses arrive in one of two success envelopes (`status: true` or
//!   `code: 200`); both are accepted, see [`envelope`]
//!
//! # Endpoints
//!
//! ```text
//! POST /userProfile/getUser              {userId}                     account + theme
//! GET  /userProfile/getUserProfile/{id}                               profile document
//! GET  /qrCode/getQrCode/{userId}                                     QR + redirect record
//! POST /cart/getUserCart                 {userId}                     cart (bearer)
//! POST /cart/updateQuantity              {userId, productId, quantity} (bearer)
//! POST /cart/removeItem                  {userId, productId}          (bearer)
//! ```
//!
//! Route handlers and the resolver talk to the backend through the
//! [`ProfileApi`] and [`CartApi`] traits so tests can substitute fakes.

mod client;
mod conversions;
pub mod envelope;
pub mod types;

use std::future::Future;

use secrecy::SecretString;
use thiserror::Error;

use cardfolio_core::{ProductId, ProfileId, UserId};

pub use client::BackendClient;
pub use types::*;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success HTTP status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request succeeded but carried no data.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Envelope reported failure (`status: false` or a non-200 `code`).
    #[error("Unsuccessful response: {0}")]
    Unsuccessful(String),
}

impl BackendError {
    /// Returns `true` for the "resource not found" failure kind, as opposed
    /// to "unable to load".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Unsuccessful(_) | Self::Api { status: 404, .. }
        )
    }
}

/// Bearer credentials for cart endpoints.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Credentials {
    pub user_id: UserId,
    pub token: SecretString,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Read access to accounts and profile documents.
pub trait ProfileApi: Send + Sync {
    /// Fetch the account record (theme preference, linked profile id).
    fn get_account(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Account, BackendError>> + Send;

    /// Fetch a profile document by id.
    fn get_profile(
        &self,
        profile_id: &ProfileId,
    ) -> impl Future<Output = Result<Profile, BackendError>> + Send;
}

/// Server-side cart operations.
pub trait CartApi: Send + Sync {
    /// Fetch the full cart.
    fn get_cart(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Cart, BackendError>> + Send;

    /// Set the quantity of one product line.
    fn update_quantity(
        &self,
        credentials: &Credentials,
        product_id: &ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Remove one product line.
    fn remove_item(
        &self,
        credentials: &Credentials,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;
}
