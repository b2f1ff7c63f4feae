//! Contact form validation and submission.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::email_relay::{MessageRelay, RelayError, TemplateParams};

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Submitted contact form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

/// A field that failed validation, with the message shown to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    Name,
    Email,
    Message,
}

impl ValidationError {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Name => "Please enter your name",
            Self::Email => "Please enter a valid email address",
            Self::Message => "Please enter a message",
        }
    }
}

/// Why a submission did not go through.
#[derive(Debug)]
pub enum SubmitError {
    Invalid(ValidationError),
    Relay(RelayError),
    /// No relay is configured.
    Unavailable,
}

impl SubmitError {
    /// Text shown in the form's error banner.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Invalid(field) => field.message().to_string(),
            Self::Relay(RelayError::Configuration) => {
                "Email service configuration error. Please contact support.".to_string()
            }
            Self::Relay(RelayError::Rejected(text)) => format!("Failed to send message: {text}"),
            Self::Relay(_) | Self::Unavailable => {
                "Failed to send message. Please try again later.".to_string()
            }
        }
    }
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

impl ContactForm {
    /// Check the form, reporting the first invalid field.
    ///
    /// # Errors
    ///
    /// Returns the first field that failed, in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Name);
        }
        if !is_valid_email(self.email.trim()) {
            return Err(ValidationError::Email);
        }
        if self.message.trim().is_empty() {
            return Err(ValidationError::Message);
        }
        Ok(())
    }

    fn template_params(&self) -> TemplateParams {
        TemplateParams {
            from_name: self.name.trim().to_string(),
            from_email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    /// Validate and send the form through `relay`.
    ///
    /// Nothing is sent if validation fails or no relay is configured.
    ///
    /// # Errors
    ///
    /// Returns the validation failure or the relay's error.
    pub async fn submit<R: MessageRelay>(&self, relay: Option<&R>) -> Result<(), SubmitError> {
        self.validate().map_err(SubmitError::Invalid)?;

        let Some(relay) = relay else {
            tracing::error!("Email relay not configured");
            return Err(SubmitError::Unavailable);
        };

        relay
            .send(&self.template_params())
            .await
            .map_err(SubmitError::Relay)
    }
}
