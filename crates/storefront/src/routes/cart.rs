//! Cart route handlers.
//!
//! The cart lives in the backend and is keyed by the signed-in visitor.
//! Mutations re-render the refreshed cart with a toast instead of
//! redirecting, so the outcome is visible on the same response.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use cardfolio_core::ProductId;

use super::PageChrome;
use crate::backend::{BackendError, Cart};
use crate::filters;
use crate::middleware::{CspNonce, RequireSession};
use crate::services::cart::{CartService, CartSummary};
use crate::state::AppState;

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub chrome: PageChrome,
    pub cart: CartSummary,
    pub load_failed: bool,
}

impl CartShowTemplate {
    fn new(state: &AppState, chrome: PageChrome, cart: Result<Cart, BackendError>) -> Self {
        let currency = &state.config().store.currency;
        match cart {
            Ok(cart) => Self {
                chrome,
                cart: CartSummary::new(&cart, currency),
                load_failed: false,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load cart");
                Self {
                    chrome,
                    cart: CartSummary::empty(currency),
                    load_failed: true,
                }
            }
        }
    }
}

/// Display cart page.
#[instrument(skip(state, session, nonce), fields(user_id = %session.credentials.user_id))]
pub async fn show(
    State(state): State<AppState>,
    session: RequireSession,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let chrome = PageChrome::new(&state, nonce, &session.context);
    let cart = CartService::new(state.backend(), &session.credentials)
        .fetch()
        .await;

    CartShowTemplate::new(&state, chrome, cart)
}

/// Update a line's quantity.
#[instrument(skip(state, session, nonce), fields(user_id = %session.credentials.user_id))]
pub async fn update(
    State(state): State<AppState>,
    session: RequireSession,
    CspNonce(nonce): CspNonce,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let chrome = PageChrome::new(&state, nonce, &session.context);
    let service = CartService::new(state.backend(), &session.credentials);
    let product_id = ProductId::new(form.product_id);

    match service.update_quantity(&product_id, form.quantity).await {
        Some(outcome) => {
            CartShowTemplate::new(&state, chrome.with_flash(outcome.flash), outcome.cart)
                .into_response()
        }
        // Below one: nothing changed
        None => CartShowTemplate::new(&state, chrome, service.fetch().await).into_response(),
    }
}

/// Remove a line from the cart.
#[instrument(skip(state, session, nonce), fields(user_id = %session.credentials.user_id))]
pub async fn remove(
    State(state): State<AppState>,
    session: RequireSession,
    CspNonce(nonce): CspNonce,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let chrome = PageChrome::new(&state, nonce, &session.context);
    let outcome = CartService::new(state.backend(), &session.credentials)
        .remove_item(&ProductId::new(form.product_id))
        .await;

    CartShowTemplate::new(&state, chrome.with_flash(outcome.flash), outcome.cart).into_response()
}
