//! Decimal money amounts with a currency label.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default store currency when the backend does not label an amount.
pub const DEFAULT_CURRENCY: &str = "AED";

/// A money amount in a store currency.
///
/// Displays as `"{CURRENCY} {amount}"` with trailing zeros removed, e.g.
/// `AED 200` or `AED 49.5`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 style currency code.
    pub currency: String,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Zero in the given currency.
    #[must_use]
    pub fn zero(currency: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Multiply a unit price by a line quantity.
    ///
    /// Returns `None` if the product is out of `Decimal` range.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Option<Self> {
        let amount = self.amount.checked_mul(Decimal::from(quantity))?;
        Some(Self::new(amount, self.currency.clone()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.amount.normalize())
    }
}
