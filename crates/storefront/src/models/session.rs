//! Session-related types.
//!
//! The visitor's identity is handed over by the login front end (see
//! `routes::session`) and kept server-side; pages receive it as a
//! [`SessionContext`] extracted once per request.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use cardfolio_core::{ProfileId, Theme, UserId};

use crate::backend::Credentials;
use crate::resolver::RememberedProfile;

/// Session keys.
pub mod keys {
    /// Bearer token for cart endpoints.
    pub const TOKEN: &str = "token";

    /// Account id of the signed-in visitor.
    pub const USER_ID: &str = "user_id";

    /// Profile document id of the signed-in visitor.
    pub const USER_PROFILE_ID: &str = "user_profile_id";

    /// Theme picked while ordering a card.
    pub const SELECTED_CARD_TEMPLATE: &str = "selected_card_template";

    /// Last profile resolved for this visitor.
    pub const LAST_PROFILE: &str = "last_profile";
}

/// Everything a page needs to know about the visitor.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone, Default)]
pub struct SessionContext {
    pub token: Option<SecretString>,
    pub user_id: Option<UserId>,
    pub user_profile_id: Option<ProfileId>,
    pub selected_card_template: Option<Theme>,
    pub last_profile: Option<RememberedProfile>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user_id", &self.user_id)
            .field("user_profile_id", &self.user_profile_id)
            .field("selected_card_template", &self.selected_card_template)
            .field("last_profile", &self.last_profile)
            .finish()
    }
}

impl SessionContext {
    /// Bearer credentials, if the visitor is signed in.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        let token = self.token.as_ref()?;
        if token.expose_secret().trim().is_empty() {
            return None;
        }
        Some(Credentials {
            user_id: self.user_id.clone().filter(|id| !id.is_empty())?,
            token: token.clone(),
        })
    }

    /// Id used to look up the visitor's own profile: the profile id if
    /// known, otherwise the account id.
    #[must_use]
    pub fn own_profile_lookup(&self) -> Option<&str> {
        self.user_profile_id
            .as_ref()
            .map(ProfileId::as_str)
            .or_else(|| self.user_id.as_ref().map(UserId::as_str))
            .filter(|id| !id.is_empty())
    }
}

/// Identity handed over by the login front end.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionHandoff {
    #[serde(alias = "authToken")]
    pub token: String,
    pub user_id: UserId,
    #[serde(default)]
    pub user_profile_id: Option<ProfileId>,
    #[serde(default)]
    pub selected_card_template: Option<String>,
}

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// A toast-style notification shown above the page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// CSS modifier for the toast.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "toast--success",
            FlashKind::Error => "toast--error",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_token_and_user() {
        let mut ctx = SessionContext {
            token: Some(SecretString::from("t0k")),
            user_id: Some(UserId::new("u1")),
            ..SessionContext::default()
        };
        assert_eq!(ctx.credentials().unwrap().user_id, UserId::new("u1"));

        ctx.user_id = None;
        assert!(ctx.credentials().is_none());

        ctx.user_id = Some(UserId::new("u1"));
        ctx.token = Some(SecretString::from(" "));
        assert!(ctx.credentials().is_none());
    }

    #[test]
    fn test_own_profile_lookup_prefers_profile_id() {
        let mut ctx = SessionContext {
            user_id: Some(UserId::new("u1")),
            ..SessionContext::default()
        };
        assert_eq!(ctx.own_profile_lookup(), Some("u1"));

        ctx.user_profile_id = Some(ProfileId::new("p1"));
        assert_eq!(ctx.own_profile_lookup(), Some("p1"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let ctx = SessionContext {
            token: Some(SecretString::from("very-secret")),
            ..SessionContext::default()
        };
        assert!(!format!("{ctx:?}").contains("very-secret"));
    }

    #[test]
    fn test_handoff_accepts_auth_token_alias() {
        let handoff: SessionHandoff =
            serde_json::from_str(r#"{"authToken": "abc", "userId": "u1"}"#).unwrap();
        assert_eq!(handoff.token, "abc");
        assert!(handoff.user_profile_id.is_none());
    }
}
