//! Session context extractors and helpers.
//!
//! Handlers never read session keys directly: they take a [`SessionContext`]
//! (always succeeds, possibly empty) or [`RequireSession`] (signed-in
//! visitors only).

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use tower_sessions::Session;

use cardfolio_core::{ProfileId, Theme, UserId};

use crate::backend::Credentials;
use crate::models::{SessionContext, SessionHandoff, session_keys};
use crate::resolver::RememberedProfile;
use crate::state::AppState;

async fn get<T: serde::de::DeserializeOwned>(session: &Session, key: &str) -> Option<T> {
    match session.get::<T>(key).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read session value");
            None
        }
    }
}

/// Load the context stored in `session`.
pub async fn load_context(session: &Session) -> SessionContext {
    SessionContext {
        token: get::<String>(session, session_keys::TOKEN)
            .await
            .map(SecretString::from),
        user_id: get::<UserId>(session, session_keys::USER_ID).await,
        user_profile_id: get::<ProfileId>(session, session_keys::USER_PROFILE_ID).await,
        selected_card_template: get::<Theme>(session, session_keys::SELECTED_CARD_TEMPLATE).await,
        last_profile: get::<RememberedProfile>(session, session_keys::LAST_PROFILE).await,
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            tracing::warn!("Session not found in request extensions - layer may be missing");
            return Ok(Self::default());
        };
        Ok(load_context(session).await)
    }
}

/// Extractor that requires a signed-in visitor.
///
/// # Example
///
/// ```rust,ignore
/// async fn cart(RequireSession { credentials, .. }: RequireSession) -> impl IntoResponse {
///     format!("Cart of {}", credentials.user_id)
/// }
/// ```
pub struct RequireSession {
    pub context: SessionContext,
    pub credentials: Credentials,
}

/// Error returned when a session is required but the visitor has none.
pub enum SessionRejection {
    /// Redirect to the login page (for HTML requests).
    RedirectToLogin(String),
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(url) => Redirect::to(&url).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = SessionRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(context) = SessionContext::from_request_parts(parts, state).await;

        match context.credentials() {
            Some(credentials) => Ok(Self {
                context,
                credentials,
            }),
            None if parts.uri.path().starts_with("/api/") => Err(SessionRejection::Unauthorized),
            None => Err(SessionRejection::RedirectToLogin(
                state.config().store.login_url.clone(),
            )),
        }
    }
}

/// Store a handed-over identity, replacing whatever the session held.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn establish_session(
    session: &Session,
    handoff: &SessionHandoff,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.clear().await;

    session.insert(session_keys::TOKEN, &handoff.token).await?;
    session.insert(session_keys::USER_ID, &handoff.user_id).await?;
    if let Some(profile_id) = handoff.user_profile_id.as_ref().filter(|id| !id.is_empty()) {
        session
            .insert(session_keys::USER_PROFILE_ID, profile_id)
            .await?;
    }
    if let Some(template) = handoff.selected_card_template.as_deref() {
        session
            .insert(
                session_keys::SELECTED_CARD_TEMPLATE,
                Theme::normalize(template),
            )
            .await?;
    }
    Ok(())
}

/// Drop the visitor's identity (sign-out).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// Remember the profile the visitor just loaded.
///
/// Failures are logged; the remembered id is only a lookup hint.
pub async fn remember_profile(session: &Session, remembered: &RememberedProfile) {
    if let Err(e) = session.insert(session_keys::LAST_PROFILE, remembered).await {
        tracing::warn!(error = %e, "Failed to remember profile in session");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_establish_and_load() {
        let session = session();
        let handoff: SessionHandoff = serde_json::from_str(
            r#"{"token": "t0k", "userId": "u1", "userProfileId": "p1", "selectedCardTemplate": "EPI"}"#,
        )
        .unwrap();

        establish_session(&session, &handoff).await.unwrap();
        let ctx = load_context(&session).await;

        assert_eq!(ctx.user_id, Some(UserId::new("u1")));
        assert_eq!(ctx.user_profile_id, Some(ProfileId::new("p1")));
        assert_eq!(ctx.selected_card_template, Some(Theme::Epic));
        assert!(ctx.credentials().is_some());
    }

    #[tokio::test]
    async fn test_empty_session_has_no_credentials() {
        let ctx = load_context(&session()).await;
        assert!(ctx.credentials().is_none());
        assert!(ctx.own_profile_lookup().is_none());
    }

    #[tokio::test]
    async fn test_clear_session() {
        let session = session();
        let handoff: SessionHandoff =
            serde_json::from_str(r#"{"token": "t0k", "userId": "u1"}"#).unwrap();
        establish_session(&session, &handoff).await.unwrap();

        clear_session(&session).await.unwrap();
        assert!(load_context(&session).await.user_id.is_none());
    }
}
