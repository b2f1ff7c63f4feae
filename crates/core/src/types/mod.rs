//! Core types for Cardfolio.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod theme;

pub use id::*;
pub use price::{DEFAULT_CURRENCY, Money};
pub use theme::Theme;
