//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CSP (per-request nonce and policy header)
//! 5. Security headers
//! 6. Session layer (tower-sessions with in-memory store)
//! 7. Rate limiting (governor, per route)

pub mod auth;
pub mod csp;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{RequireSession, clear_session, establish_session, remember_profile};
pub use csp::{CspNonce, csp_middleware};
pub use rate_limit::{contact_rate_limiter, session_rate_limiter};
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
