//! Order confirmation details.
//!
//! The backend does not report the order back to this page, so the summary
//! is a placeholder built from the current time.

use chrono::{DateTime, Utc};

/// Delivery estimate shown for every order.
pub const ESTIMATED_DELIVERY: &str = "5-7 business days";

/// Placeholder summary shown after checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub order_number: String,
    pub placed_at: DateTime<Utc>,
    pub estimated_delivery: &'static str,
}

impl OrderDetails {
    /// Build the summary for an order placed at `now`.
    #[must_use]
    pub fn placeholder(now: DateTime<Utc>) -> Self {
        Self {
            order_number: format!("ORD-{}", now.timestamp_millis()),
            placed_at: now,
            estimated_delivery: ESTIMATED_DELIVERY,
        }
    }

    /// Date shown on the confirmation, e.g. `18 October 2026`.
    #[must_use]
    pub fn placed_on(&self) -> String {
        self.placed_at.format("%-d %B %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_placeholder() {
        let now = Utc.timestamp_millis_opt(1_760_745_600_123).single();
        let Some(now) = now else {
            panic!("valid timestamp");
        };
        let order = OrderDetails::placeholder(now);

        assert_eq!(order.order_number, "ORD-1760745600123");
        assert_eq!(order.estimated_delivery, "5-7 business days");
        assert_eq!(order.placed_on(), "18 October 2025");
    }
}
