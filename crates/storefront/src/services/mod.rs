//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Cart mutations with refetch, display summary
//! - `contact` - Contact form validation and submission
//! - `email_relay` - EmailJS client behind the `MessageRelay` trait
//! - `order` - Order confirmation placeholder
//! - `whatsapp` - Chat widget link

pub mod cart;
pub mod contact;
pub mod email_relay;
pub mod order;
pub mod whatsapp;

pub use email_relay::{EmailRelayClient, MessageRelay, RelayError};
