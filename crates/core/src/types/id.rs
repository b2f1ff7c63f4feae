//! Newtype IDs for type-safe entity references.
//!
//! The backend issues opaque string identifiers (document ids). The account
//! id space and the profile id space are distinct even though both are plain
//! strings on the wire, so each gets its own wrapper.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use cardfolio_core::define_id;
/// define_id!(AccountId);
/// define_id!(DocumentId);
///
/// let account = AccountId::new("65f0c2");
/// let document = DocumentId::new("65f0c2");
///
/// // These are different types, so this won't compile:
/// // let _: AccountId = document;
/// assert_eq!(account.as_str(), document.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID, trimming surrounding whitespace.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                let id: String = id.into();
                let trimmed = id.trim();
                if trimmed.len() == id.len() {
                    Self(id)
                } else {
                    Self(trimmed.to_owned())
                }
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Returns `true` if the ID is empty.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self::new(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Account record id (the `userId` in URLs and session).
define_id!(UserId);
// Profile document id, distinct from the account id on the backend.
define_id!(ProfileId);
// Catalogue product id referenced by cart lines.
define_id!(ProductId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_whitespace() {
        let id = UserId::new("  abc123 ");
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn test_empty_after_trim() {
        assert!(ProfileId::new("   ").is_empty());
        assert!(!ProfileId::new("p1").is_empty());
    }

    #[test]
    fn test_serde_transparent() {
        let id = ProductId::new("prod-9");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"prod-9\"");

        let parsed: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_display() {
        assert_eq!(UserId::from("u-1").to_string(), "u-1");
    }
}
