//! Route table and theme transitions.
//!
//! Internal redirects, fixed route registrations and template links all go
//! through [`Route`], so the URL shapes live in one place. [`transition`]
//! decides whether a profile page mounted under one theme has to hand over
//! to another.

use axum::response::Redirect;

use cardfolio_core::Theme;

/// A page the storefront can send a visitor to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Themed profile page, `/{theme}/{id}`.
    Profile { theme: Theme, id: String },
    /// vCard download for a profile page.
    Vcard { theme: Theme, id: String },
    Cart,
    CartUpdate,
    CartRemove,
    Checkout,
    Shop,
    Contact,
    OrderSuccess,
}

impl Route {
    /// Themed profile page for `id`.
    pub fn profile(theme: Theme, id: impl Into<String>) -> Self {
        Self::Profile {
            theme,
            id: id.into(),
        }
    }

    /// Path of this route with the id segment percent-encoded.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Profile { theme, id } => format!("/{theme}/{}", urlencoding::encode(id)),
            Self::Vcard { theme, id } => format!("/{theme}/{}/vcard", urlencoding::encode(id)),
            Self::Cart => "/cart".to_string(),
            Self::CartUpdate => "/cart/update".to_string(),
            Self::CartRemove => "/cart/remove".to_string(),
            Self::Checkout => "/checkout".to_string(),
            Self::Shop => "/shop".to_string(),
            Self::Contact => "/contact".to_string(),
            Self::OrderSuccess => "/order-success".to_string(),
        }
    }

    /// `303 See Other` to this route.
    #[must_use]
    pub fn redirect(&self) -> Redirect {
        Redirect::to(&self.path())
    }
}

/// Fixed links rendered by the page layout and forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLinks {
    pub shop: String,
    pub cart: String,
    pub cart_update: String,
    pub cart_remove: String,
    pub checkout: String,
    pub contact: String,
}

impl Default for NavLinks {
    fn default() -> Self {
        Self {
            shop: Route::Shop.path(),
            cart: Route::Cart.path(),
            cart_update: Route::CartUpdate.path(),
            cart_remove: Route::CartRemove.path(),
            checkout: Route::Checkout.path(),
            contact: Route::Contact.path(),
        }
    }
}

/// Where a profile page mounted for `mounted` must go once the account's
/// theme resolved to `resolved`.
///
/// Returns `None` when the page is already the right one.
#[must_use]
pub fn transition(mounted: Theme, resolved: Theme, id: &str) -> Option<Route> {
    (mounted != resolved).then(|| Route::profile(resolved, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_paths() {
        assert_eq!(Route::profile(Theme::Epic, "u1").path(), "/epic/u1");
        assert_eq!(
            Route::Vcard {
                theme: Theme::Modern,
                id: "u1".to_string()
            }
            .path(),
            "/modern/u1/vcard"
        );
    }

    #[test]
    fn test_id_is_encoded() {
        assert_eq!(
            Route::profile(Theme::Standard, "a/b c").path(),
            "/standard/a%2Fb%20c"
        );
    }

    #[test]
    fn test_static_paths() {
        assert_eq!(Route::Cart.path(), "/cart");
        assert_eq!(Route::CartUpdate.path(), "/cart/update");
        assert_eq!(Route::CartRemove.path(), "/cart/remove");
        assert_eq!(Route::Checkout.path(), "/checkout");
        assert_eq!(Route::Shop.path(), "/shop");
        assert_eq!(Route::Contact.path(), "/contact");
        assert_eq!(Route::OrderSuccess.path(), "/order-success");
    }

    #[test]
    fn test_nav_links_follow_routes() {
        let links = NavLinks::default();
        assert_eq!(links.cart, Route::Cart.path());
        assert_eq!(links.checkout, "/checkout");
        assert_eq!(links.cart_remove, "/cart/remove");
    }

    #[test]
    fn test_transition_on_mismatch() {
        assert_eq!(
            transition(Theme::Standard, Theme::Epic, "u1"),
            Some(Route::profile(Theme::Epic, "u1"))
        );
        assert_eq!(transition(Theme::Epic, Theme::Epic, "u1"), None);
    }

    #[test]
    fn test_epi_account_lands_on_epic() {
        let resolved = Theme::normalize("epi");
        let route = transition(Theme::Standard, resolved, "u1");
        assert_eq!(route.map(|r| r.path()).as_deref(), Some("/epic/u1"));
    }
}
