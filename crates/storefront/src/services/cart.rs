//! Cart operations on top of the backend cart endpoints.
//!
//! The backend owns the cart. Every mutation is followed by a full refetch
//! and the page always shows the refetched cart, never a locally patched
//! copy. Nothing is retried or de-duplicated.

use tracing::instrument;

use cardfolio_core::{Money, ProductId};

use crate::backend::{BackendError, Cart, CartApi, CartItem, Credentials};
use crate::error::add_breadcrumb;
use crate::models::Flash;

/// A cart mutation's notification plus the cart as it is afterwards.
#[derive(Debug)]
pub struct CartOutcome {
    pub flash: Flash,
    pub cart: Result<Cart, BackendError>,
}

/// Cart operations for one signed-in visitor.
pub struct CartService<'a, C> {
    api: &'a C,
    credentials: &'a Credentials,
}

impl<'a, C: CartApi> CartService<'a, C> {
    pub const fn new(api: &'a C, credentials: &'a Credentials) -> Self {
        Self { api, credentials }
    }

    /// Fetch the whole cart.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the cart cannot be loaded.
    pub async fn fetch(&self) -> Result<Cart, BackendError> {
        self.api.get_cart(self.credentials).await
    }

    /// Set a line's quantity, then refetch.
    ///
    /// Quantities below 1 are ignored: nothing is sent and `None` is
    /// returned.
    #[instrument(skip(self), fields(user_id = %self.credentials.user_id))]
    pub async fn update_quantity(
        &self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Option<CartOutcome> {
        if quantity < 1 {
            return None;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        let flash = match self
            .api
            .update_quantity(self.credentials, product_id, quantity)
            .await
        {
            Ok(()) => {
                add_breadcrumb(
                    "cart",
                    "Updated quantity",
                    Some(&[("product_id", product_id.as_str())]),
                );
                Flash::success("Quantity updated")
            }
            Err(e) => {
                tracing::error!(error = %e, product_id = %product_id, "Failed to update quantity");
                Flash::error("Failed to update quantity")
            }
        };

        Some(CartOutcome {
            flash,
            cart: self.fetch().await,
        })
    }

    /// Remove a line, then refetch.
    #[instrument(skip(self), fields(user_id = %self.credentials.user_id))]
    pub async fn remove_item(&self, product_id: &ProductId) -> CartOutcome {
        let flash = match self.api.remove_item(self.credentials, product_id).await {
            Ok(()) => {
                add_breadcrumb(
                    "cart",
                    "Removed item",
                    Some(&[("product_id", product_id.as_str())]),
                );
                Flash::success("Item removed from cart")
            }
            Err(e) => {
                tracing::error!(error = %e, product_id = %product_id, "Failed to remove item");
                Flash::error("Failed to remove item")
            }
        };

        CartOutcome {
            flash,
            cart: self.fetch().await,
        }
    }
}

// =============================================================================
// Display summary
// =============================================================================

/// One cart line ready for display.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product_id: Option<ProductId>,
    pub title: String,
    pub category: Option<String>,
    pub material: Option<String>,
    pub image: Option<String>,
    pub unit_price: Money,
    pub quantity: u32,
    /// Quantity offered by the increase button; `None` at the `u32` limit.
    pub increment: Option<u32>,
    /// `None` if price times quantity overflows.
    pub line_total: Option<Money>,
}

impl CartLine {
    fn from_item(item: &CartItem, store_currency: &str) -> Self {
        let product = item.product.as_ref();
        let currency = product
            .and_then(|p| p.currency.as_deref())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(store_currency);
        let unit_price = Money::new(item.price, currency);

        Self {
            product_id: item.product_id().cloned(),
            title: product
                .and_then(|p| p.title.clone())
                .unwrap_or_else(|| "Product".to_string()),
            category: product.and_then(|p| p.category.clone()),
            material: product.and_then(|p| p.material.clone()),
            image: product
                .and_then(|p| p.variants.first())
                .and_then(|v| v.front_image.clone()),
            line_total: unit_price.times(item.quantity),
            unit_price,
            quantity: item.quantity,
            increment: item.quantity.checked_add(1),
        }
    }
}

/// Whole cart ready for display.
#[derive(Debug, Clone)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub total: Money,
    pub item_count: u32,
}

impl CartSummary {
    /// Build the summary. The total is the backend's `totalAmount`.
    #[must_use]
    pub fn new(cart: &Cart, currency: &str) -> Self {
        Self {
            lines: cart
                .items
                .iter()
                .map(|item| CartLine::from_item(item, currency))
                .collect(),
            total: Money::new(cart.total_amount, currency),
            item_count: cart
                .items
                .iter()
                .map(|item| item.quantity)
                .fold(0, u32::saturating_add),
        }
    }

    #[must_use]
    pub fn empty(currency: &str) -> Self {
        Self {
            lines: Vec::new(),
            total: Money::zero(currency),
            item_count: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rust_decimal::Decimal;
    use secrecy::SecretString;

    use super::*;
    use crate::backend::CartProduct;

    #[derive(Default)]
    struct FakeCart {
        cart: Mutex<Cart>,
        reads: AtomicUsize,
        writes: AtomicUsize,
        reject_writes: bool,
    }

    impl CartApi for FakeCart {
        async fn get_cart(&self, _credentials: &Credentials) -> Result<Cart, BackendError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.cart.lock().unwrap().clone())
        }

        async fn update_quantity(
            &self,
            _credentials: &Credentials,
            product_id: &ProductId,
            quantity: u32,
        ) -> Result<(), BackendError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.reject_writes {
                return Err(BackendError::Unsuccessful("rejected".to_string()));
            }
            let mut cart = self.cart.lock().unwrap();
            for item in &mut cart.items {
                if item.product_id() == Some(product_id) {
                    item.quantity = quantity;
                }
            }
            Ok(())
        }

        async fn remove_item(
            &self,
            _credentials: &Credentials,
            product_id: &ProductId,
        ) -> Result<(), BackendError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.reject_writes {
                return Err(BackendError::Unsuccessful("rejected".to_string()));
            }
            self.cart
                .lock()
                .unwrap()
                .items
                .retain(|item| item.product_id() != Some(product_id));
            Ok(())
        }
    }

    fn item(product_id: &str, price: i64, quantity: u32) -> CartItem {
        CartItem {
            id: Some(format!("line-{product_id}")),
            product: Some(CartProduct {
                id: Some(ProductId::new(product_id)),
                title: Some("Metal Card".to_string()),
                ..CartProduct::default()
            }),
            price: Decimal::from(price),
            quantity,
        }
    }

    fn fake(items: Vec<CartItem>, total: i64) -> FakeCart {
        FakeCart {
            cart: Mutex::new(Cart {
                items,
                total_amount: Decimal::from(total),
            }),
            ..FakeCart::default()
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            user_id: "u1".into(),
            token: SecretString::from("t0k"),
        }
    }

    #[tokio::test]
    async fn test_quantity_below_one_is_a_no_op() {
        let api = fake(vec![item("p1", 100, 2)], 200);
        let credentials = credentials();
        let service = CartService::new(&api, &credentials);

        assert!(service.update_quantity(&"p1".into(), 0).await.is_none());
        assert!(service.update_quantity(&"p1".into(), -3).await.is_none());
        assert_eq!(api.reads.load(Ordering::SeqCst), 0);
        assert_eq!(api.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_refetches_cart() {
        let api = fake(vec![item("p1", 100, 2)], 200);
        let credentials = credentials();
        let service = CartService::new(&api, &credentials);

        let outcome = service.update_quantity(&"p1".into(), 3).await.unwrap();
        assert_eq!(outcome.flash, Flash::success("Quantity updated"));
        assert_eq!(outcome.cart.unwrap().items[0].quantity, 3);
        assert_eq!(api.writes.load(Ordering::SeqCst), 1);
        assert_eq!(api.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_mutation_still_refetches() {
        let api = FakeCart {
            reject_writes: true,
            ..fake(vec![item("p1", 100, 2)], 200)
        };
        let credentials = credentials();
        let service = CartService::new(&api, &credentials);

        let outcome = service.remove_item(&"p1".into()).await;
        assert_eq!(outcome.flash, Flash::error("Failed to remove item"));
        assert_eq!(outcome.cart.unwrap().items.len(), 1);
        assert_eq!(api.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remove_item() {
        let api = fake(vec![item("p1", 100, 1), item("p2", 50, 1)], 150);
        let credentials = credentials();
        let service = CartService::new(&api, &credentials);

        let outcome = service.remove_item(&"p1".into()).await;
        assert_eq!(outcome.flash, Flash::success("Item removed from cart"));
        assert_eq!(outcome.cart.unwrap().items.len(), 1);
    }

    #[test]
    fn test_summary_line_and_total() {
        let cart = Cart {
            items: vec![item("p1", 100, 2)],
            total_amount: Decimal::from(200),
        };
        let summary = CartSummary::new(&cart, "AED");

        assert_eq!(
            summary.lines[0].line_total.as_ref().unwrap().amount,
            Decimal::from(200)
        );
        assert_eq!(summary.total.to_string(), "AED 200");
        assert_eq!(summary.item_count, 2);
    }

    #[test]
    fn test_summary_with_extreme_values() {
        let huge_price = CartItem {
            price: Decimal::MAX,
            ..item("p1", 0, 2)
        };
        let cart = Cart {
            items: vec![huge_price, item("p2", 1, u32::MAX), item("p3", 1, 1)],
            total_amount: Decimal::from(1),
        };
        let summary = CartSummary::new(&cart, "AED");

        assert!(summary.lines[0].line_total.is_none());
        assert_eq!(summary.lines[1].increment, None);
        assert_eq!(summary.lines[2].increment, Some(2));
        assert_eq!(summary.item_count, u32::MAX);
    }

    #[test]
    fn test_empty_summary() {
        let summary = CartSummary::empty("AED");
        assert!(summary.is_empty());
        assert_eq!(summary.total.to_string(), "AED 0");
    }
}
