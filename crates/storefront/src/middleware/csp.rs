//! Content-Security-Policy with a per-request script nonce.
//!
//! The page layout carries one small inline script (toast dismissal), so the
//! policy allows scripts from `'self'` plus the nonce generated here. The
//! nonce reaches templates through the [`CspNonce`] extractor.

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderValue, header::CONTENT_SECURITY_POLICY, request::Parts},
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;

/// A CSP nonce value for inline scripts (128-bit, base64-encoded).
#[derive(Clone, Debug)]
pub struct CspNonce(pub String);

impl CspNonce {
    /// Generate a new random nonce.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        Self(STANDARD.encode(bytes))
    }

    /// Get the nonce value for use in templates.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Policy for a response rendered with `nonce`.
///
/// Profile media (pictures, covers, logos, QR codes) is hosted wherever the
/// backend put it, so images may come from any HTTPS origin or `data:` URLs.
#[must_use]
pub fn content_security_policy(nonce: &CspNonce) -> String {
    [
        "default-src 'none'".to_string(),
        format!("script-src 'self' 'nonce-{}'", nonce.value()),
        "style-src 'self'".to_string(),
        "font-src 'self'".to_string(),
        "img-src 'self' https: data:".to_string(),
        "connect-src 'self'".to_string(),
        "frame-src 'none'".to_string(),
        "object-src 'none'".to_string(),
        "base-uri 'self'".to_string(),
        "form-action 'self'".to_string(),
        "frame-ancestors 'none'".to_string(),
    ]
    .join("; ")
}

/// Generate a nonce, expose it to handlers and set the matching policy on
/// the response.
pub async fn csp_middleware(mut request: Request, next: Next) -> Response {
    let nonce = CspNonce::generate();
    request.extensions_mut().insert(nonce.clone());

    let mut response = next.run(request).await;
    match HeaderValue::from_str(&content_security_policy(&nonce)) {
        Ok(value) => {
            response.headers_mut().insert(CONTENT_SECURITY_POLICY, value);
        }
        Err(e) => tracing::error!(error = %e, "Failed to build CSP header"),
    }
    response
}

impl<S> FromRequestParts<S> for CspNonce
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_else(|| {
            tracing::warn!(
                "CSP nonce not found in request extensions - middleware may be misconfigured"
            );
            Self(String::new())
        }))
    }
}
