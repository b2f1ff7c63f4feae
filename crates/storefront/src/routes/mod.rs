//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Health check
//!
//! # Profiles
//! GET    /profile/{user_id}      - Theme router (redirects to the themed page)
//! GET    /standard/{id}          - Standard card
//! GET    /modern/{id}            - Modern card
//! GET    /epic/{id}              - Epic card
//! GET    /{theme}/{id}/vcard     - vCard download
//!
//! # Cart (requires session)
//! GET    /cart                   - Cart page
//! POST   /cart/update            - Update quantity (re-renders cart with a toast)
//! POST   /cart/remove            - Remove item (re-renders cart with a toast)
//!
//! # Store
//! GET    /checkout               - Redirect to checkout
//! GET    /shop                   - Redirect to the shop
//! GET    /contact                - Contact form
//! POST   /contact                - Send contact form (rate limited)
//! GET    /order-success          - Order confirmation
//!
//! # Session hand-off
//! POST   /api/session            - Store identity from the login front end
//! DELETE /api/session            - Sign out
//! ```

pub mod cart;
pub mod contact;
pub mod order;
pub mod profile;
pub mod session;
pub mod theme_router;

use askama::Template;
use axum::{
    Extension, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tracing::instrument;

use cardfolio_core::Theme;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{contact_rate_limiter, session_rate_limiter};
use crate::models::{Flash, SessionContext};
use crate::navigation::{NavLinks, Route};
use crate::state::AppState;

// =============================================================================
// Shared page pieces
// =============================================================================

/// Data every full page needs for the layout.
#[derive(Debug, Clone)]
pub struct PageChrome {
    pub nonce: String,
    pub whatsapp_link: Option<String>,
    pub signed_in: bool,
    pub flash: Option<Flash>,
    pub links: NavLinks,
}

impl PageChrome {
    #[must_use]
    pub fn new(state: &AppState, nonce: String, context: &SessionContext) -> Self {
        Self {
            nonce,
            whatsapp_link: state.whatsapp_link().map(str::to_owned),
            signed_in: context.credentials().is_some(),
            flash: None,
            links: NavLinks::default(),
        }
    }

    #[must_use]
    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }
}

/// Full-page error panel with an explicit status code.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub chrome: PageChrome,
    pub status: StatusCode,
    pub heading: String,
    pub message: String,
    /// Request id shown so visitors can quote it to support.
    pub reference: Option<String>,
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(body) => (self.status, Html(body)).into_response(),
            Err(e) => AppError::from(e).into_response(),
        }
    }
}

// =============================================================================
// Router
// =============================================================================

/// Create the themed profile routes, one mount per theme.
pub fn profile_routes() -> Router<AppState> {
    Theme::ALL
        .into_iter()
        .fold(Router::new(), |router, theme| {
            router
                .route(
                    &format!("/{theme}/{{id}}"),
                    get(profile::show).layer(Extension(theme)),
                )
                .route(&format!("/{theme}/{{id}}/vcard"), get(profile::vcard))
        })
        .route("/profile/{user_id}", get(theme_router::redirect))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(&Route::Cart.path(), get(cart::show))
        .route(&Route::CartUpdate.path(), post(cart::update))
        .route(&Route::CartRemove.path(), post(cart::remove))
}

/// Create the session hand-off routes router.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(session::establish).delete(session::sign_out),
        )
        .layer(session_rate_limiter())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(profile_routes())
        .merge(cart_routes())
        .route(&Route::Checkout.path(), get(checkout))
        .route(&Route::Shop.path(), get(shop))
        .route(
            &Route::Contact.path(),
            get(contact::show).merge(post(contact::submit).layer(contact_rate_limiter())),
        )
        .route(&Route::OrderSuccess.path(), get(order::success))
        .nest("/api/session", session_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Redirect to the configured checkout.
#[instrument(skip(state))]
async fn checkout(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.config().store.checkout_url)
}

/// Redirect to the configured shop.
#[instrument(skip(state))]
async fn shop(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.config().store.shop_url)
}
