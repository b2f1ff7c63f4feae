//! Session hand-off from the login front end.
//!
//! The login front end posts the visitor's identity here once after signing
//! in; from then on pages read it from the server-side session.

use axum::{Json, http::StatusCode};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{clear_session, establish_session};
use crate::models::SessionHandoff;

/// Store the handed-over identity.
///
/// POST /api/session
#[instrument(skip(session, handoff), fields(user_id = %handoff.user_id))]
pub async fn establish(session: Session, Json(handoff): Json<SessionHandoff>) -> Result<StatusCode> {
    if handoff.token.trim().is_empty() || handoff.user_id.is_empty() {
        return Err(AppError::BadRequest(
            "token and userId are required".to_string(),
        ));
    }

    establish_session(&session, &handoff).await?;
    add_breadcrumb(
        "session",
        "Session established",
        Some(&[("user_id", handoff.user_id.as_str())]),
    );
    tracing::info!("Session established");
    Ok(StatusCode::NO_CONTENT)
}

/// Sign out.
///
/// DELETE /api/session
#[instrument(skip(session))]
pub async fn sign_out(session: Session) -> Result<StatusCode> {
    clear_session(&session).await?;
    tracing::info!("Session cleared");
    Ok(StatusCode::NO_CONTENT)
}
