//! Response envelopes.
//!
//! The backend wraps every payload, but not consistently:
//!
//! ```json
//! { "status": true, "message": "...", "data": { ... } }
//! { "code": 200,    "message": "...", "data": { ... } }
//! ```
//!
//! Whether the two shapes are intentional versioning is unknown, so both are
//! accepted as success. A missing or `null` `data` field is treated as
//! "not found".

use serde::Deserialize;

use super::BackendError;

/// A backend response in either envelope convention.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    /// Absent and `null` both deserialize as `None`.
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Returns `true` if either convention reports success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        let status_ok = matches!(self.status, Some(serde_json::Value::Bool(true)));
        let code_ok = self
            .code
            .as_ref()
            .and_then(|code| match code {
                serde_json::Value::Number(n) => n.as_u64(),
                serde_json::Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .is_some_and(|code| code == 200);
        status_ok || code_ok
    }

    /// Unwrap the payload.
    ///
    /// # Errors
    ///
    /// Returns `Unsuccessful` if the envelope reports failure and `NotFound`
    /// (labelled with `what`) if it carries no data.
    pub fn into_data(self, what: &str) -> Result<T, BackendError> {
        if !self.is_success() {
            return Err(BackendError::Unsuccessful(
                self.message
                    .unwrap_or_else(|| format!("{what}: request unsuccessful")),
            ));
        }
        self.data
            .ok_or_else(|| BackendError::NotFound(what.to_string()))
    }

    /// Check success for mutations whose payload is ignored.
    ///
    /// # Errors
    ///
    /// Returns `Unsuccessful` if the envelope reports failure.
    pub fn into_unit(self, what: &str) -> Result<(), BackendError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(BackendError::Unsuccessful(
                self.message
                    .unwrap_or_else(|| format!("{what}: request unsuccessful")),
            ))
        }
    }
}
