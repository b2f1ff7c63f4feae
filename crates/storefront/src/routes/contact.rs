//! Contact form.
//!
//! Submissions are validated locally and forwarded to the email relay.
//! On success the page shows a confirmation and returns to a blank form
//! after a few seconds.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use super::PageChrome;
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::SessionContext;
use crate::services::contact::{ContactForm, SubmitError};
use crate::state::AppState;

/// Seconds the confirmation stays up before the form is reset.
pub const RESET_AFTER_SECS: u32 = 5;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact/show.html")]
pub struct ContactTemplate {
    pub chrome: PageChrome,
    /// Values echoed back into the inputs after a failed submission.
    pub form: ContactForm,
    pub error: Option<String>,
    pub sent: bool,
    pub reset_after_secs: u32,
}

impl ContactTemplate {
    fn new(chrome: PageChrome) -> Self {
        Self {
            chrome,
            form: ContactForm::default(),
            error: None,
            sent: false,
            reset_after_secs: RESET_AFTER_SECS,
        }
    }
}

/// Display the contact form.
#[instrument(skip(state, context, nonce))]
pub async fn show(
    State(state): State<AppState>,
    context: SessionContext,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    ContactTemplate::new(PageChrome::new(&state, nonce, &context))
}

/// Send the contact form.
#[instrument(skip(state, context, nonce, form))]
pub async fn submit(
    State(state): State<AppState>,
    context: SessionContext,
    CspNonce(nonce): CspNonce,
    Form(form): Form<ContactForm>,
) -> impl IntoResponse {
    let mut page = ContactTemplate::new(PageChrome::new(&state, nonce, &context));

    match form.submit(state.email_relay()).await {
        Ok(()) => {
            page.sent = true;
            (StatusCode::OK, page)
        }
        Err(e) => {
            let status = match &e {
                SubmitError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
                SubmitError::Relay(_) | SubmitError::Unavailable => StatusCode::BAD_GATEWAY,
            };
            page.error = Some(e.message());
            page.form = form;
            (status, page)
        }
    }
}
