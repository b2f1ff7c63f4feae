//! Domain models for storefront.

pub mod session;

pub use session::{Flash, FlashKind, SessionContext, SessionHandoff, keys as session_keys};
