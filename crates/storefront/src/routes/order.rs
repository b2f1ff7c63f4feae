//! Order confirmation page.
//!
//! Shows a placeholder order summary, a preview of the visitor's own card
//! and its QR code. The profile and QR panels load independently; either
//! one failing only replaces that panel with a notice.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use cardfolio_core::UserId;

use super::PageChrome;
use super::profile::{ProfileView, render_card};
use crate::backend::QrCode;
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::SessionContext;
use crate::resolver::{LookupStrategy, ProfileResolver, ResolveError};
use crate::services::order::OrderDetails;
use crate::state::AppState;

/// The visitor's own card never comes from a remembered lookup.
const OWN_PROFILE_STRATEGIES: &[LookupStrategy] = &[LookupStrategy::Direct, LookupStrategy::Account];

/// State of an independently loaded panel.
#[derive(Debug, Clone)]
pub enum Panel<T> {
    Ready(T),
    SignedOut,
    Missing,
    Failed,
}

/// QR code ready for display.
#[derive(Debug, Clone)]
pub struct QrView {
    pub image: Option<String>,
    pub redirect_url: Option<String>,
}

impl From<QrCode> for QrView {
    fn from(qr: QrCode) -> Self {
        let safe = |value: Option<String>, allow_data: bool| {
            value.filter(|v| {
                (allow_data && v.starts_with("data:image/"))
                    || v.starts_with("https://")
                    || v.starts_with("http://")
            })
        };
        Self {
            image: safe(qr.qr_code, true),
            redirect_url: safe(qr.redirect_url, false),
        }
    }
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "order/success.html")]
pub struct OrderSuccessTemplate {
    pub chrome: PageChrome,
    pub order: OrderDetails,
    pub preview: Panel<String>,
    pub qr: Panel<QrView>,
}

async fn load_preview(state: &AppState, context: &SessionContext) -> Panel<String> {
    let Some(lookup) = context.own_profile_lookup() else {
        return Panel::SignedOut;
    };
    let account_id = context
        .user_id
        .clone()
        .unwrap_or_else(|| UserId::new(lookup));

    let mut resolver = ProfileResolver::new(state.backend(), account_id)
        .with_strategies(OWN_PROFILE_STRATEGIES);

    let resolved = match resolver.resolve(lookup).await {
        Ok(resolved) => resolved,
        Err(ResolveError::NotFound(_)) => return Panel::Missing,
        Err(ResolveError::Unavailable(e)) => {
            tracing::warn!(error = %e, "Failed to load profile preview");
            return Panel::Failed;
        }
    };

    let theme = context.selected_card_template.unwrap_or(resolved.theme);
    match render_card(&ProfileView::new(&resolved.profile, None), theme) {
        Ok(html) => Panel::Ready(html),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render profile preview");
            Panel::Failed
        }
    }
}

async fn load_qr(state: &AppState, context: &SessionContext) -> Panel<QrView> {
    let Some(user_id) = context.user_id.as_ref().filter(|id| !id.is_empty()) else {
        return Panel::SignedOut;
    };

    match state.backend().get_qr_code(user_id).await {
        Ok(qr) => Panel::Ready(QrView::from(qr)),
        Err(e) if e.is_not_found() => Panel::Missing,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load QR code");
            Panel::Failed
        }
    }
}

/// Display the order confirmation.
#[instrument(skip(state, context, nonce))]
pub async fn success(
    State(state): State<AppState>,
    context: SessionContext,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let order = OrderDetails::placeholder(chrono::Utc::now());
    let preview = load_preview(&state, &context).await;
    let qr = load_qr(&state, &context).await;

    tracing::info!(order_number = %order.order_number, "Order confirmation shown");

    OrderSuccessTemplate {
        chrome: PageChrome::new(&state, nonce, &context),
        order,
        preview,
        qr,
    }
}
