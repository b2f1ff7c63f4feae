//! Request IDs for tracing and error correlation.
//!
//! An `x-request-id` from an upstream proxy is reused when it looks sane;
//! otherwise a UUID v4 is generated. The id is recorded on the current span,
//! tagged in Sentry, echoed in the response and available to handlers via
//! the [`RequestId`] extractor so error panels can show a reference.

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderValue, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_INCOMING_LEN: usize = 64;

/// The current request's id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuse a proxy-supplied id if it is short and printable.
    fn from_incoming(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(id)
                if !id.is_empty()
                    && id.len() <= MAX_INCOMING_LEN
                    && id.chars().all(|c| c.is_ascii_graphic()) =>
            {
                Self(id.to_string())
            }
            _ => Self(Uuid::new_v4().to_string()),
        }
    }
}

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_incoming(
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok()),
    );

    Span::current().record("request_id", request_id.0.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id.0);
    });
    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id.0) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Self>()
            .cloned()
            .unwrap_or_else(|| Self(String::new())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incoming_id_is_reused() {
        assert_eq!(
            RequestId::from_incoming(Some("cf-ray-123")),
            RequestId("cf-ray-123".to_string())
        );
    }

    #[test]
    fn test_bad_incoming_id_is_replaced() {
        let long = "x".repeat(MAX_INCOMING_LEN + 1);
        for incoming in [None, Some(""), Some("has space"), Some(long.as_str())] {
            let id = RequestId::from_incoming(incoming);
            assert!(Uuid::parse_str(&id.0).is_ok(), "{incoming:?}");
        }
    }
}
