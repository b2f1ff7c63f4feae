//! Cardfolio Core - Shared types library.
//!
//! This crate provides common types used across all Cardfolio components:
//! - `storefront` - Public profile pages, cart, contact and order pages
//! - `cli` - Command-line tools for resolving themes and exporting cards
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, themes and money amounts
//! - [`vcard`] - vCard 3.0 contact card export

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod vcard;

pub use types::*;
pub use vcard::{ContactCard, PostalAddress};
