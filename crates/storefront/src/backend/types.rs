//! Backend wire types.
//!
//! Field names follow the backend's camelCase JSON. The backend is loose
//! about absent values (fields may be missing, `null`, or populated
//! references instead of plain ids), so deserialization is lenient and
//! normalizes those cases.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use cardfolio_core::{ProductId, ProfileId, Theme, UserId};

// =============================================================================
// Account
// =============================================================================

/// Account record returned by `/userProfile/getUser`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "id_ref")]
    pub id: Option<UserId>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub selected_template: Option<String>,
    /// Linked profile document, a plain id or a populated reference.
    #[serde(default, alias = "userProfileId", deserialize_with = "id_ref")]
    pub profile_id: Option<ProfileId>,
}

impl Account {
    /// Canonical theme of this account.
    #[must_use]
    pub fn theme(&self) -> Theme {
        Theme::from_record(self.theme.as_deref(), self.selected_template.as_deref())
    }
}

// =============================================================================
// Profile
// =============================================================================

/// Profile document returned by `/userProfile/getUserProfile/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "id_ref")]
    pub id: Option<ProfileId>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub company_designation: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub contact_details: Option<ContactDetails>,
    #[serde(default, alias = "profileImage")]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub company_logo: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub phone_numbers: Vec<PhoneNumber>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub emails: Vec<EmailEntry>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub social_media: Vec<SocialLink>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub selected_template: Option<String>,
}

impl Profile {
    /// A document with neither an id nor a name is an empty result.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.as_ref().is_none_or(ProfileId::is_empty)
            && self
                .full_name
                .as_deref()
                .is_none_or(|name| name.trim().is_empty())
    }

    /// Theme stored on the profile document itself.
    #[must_use]
    pub fn own_theme(&self) -> Theme {
        Theme::from_record(self.theme.as_deref(), self.selected_template.as_deref())
    }

    /// Display name, empty if unset.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().map_or("", str::trim)
    }
}

/// Postal details and map link.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub google_map_link: Option<String>,
}

/// A phone number with optional country calling code.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl PhoneNumber {
    /// International display form, e.g. `+971 501234567`.
    #[must_use]
    pub fn display(&self) -> String {
        let number = self.number.trim();
        match self.country_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() && !number.starts_with('+') => {
                let code = code.trim_start_matches('+');
                format!("+{code} {number}")
            }
            _ => number.to_string(),
        }
    }

    /// `tel:` URI target with spaces and punctuation removed.
    #[must_use]
    pub fn dial_string(&self) -> String {
        self.display()
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect()
    }
}

/// An email address entry.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailEntry {
    #[serde(default)]
    pub email_address: String,
}

/// A social network link.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub url: String,
}

// =============================================================================
// QR code
// =============================================================================

/// QR image and redirect target for a card.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCode {
    #[serde(default, alias = "qrCodeUrl", alias = "qrImage")]
    pub qr_code: Option<String>,
    #[serde(default, alias = "url")]
    pub redirect_url: Option<String>,
}

// =============================================================================
// Cart
// =============================================================================

/// Cart returned by `/cart/getUserCart`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default, deserialize_with = "nullable_vec")]
    pub items: Vec<CartItem>,
    #[serde(default, deserialize_with = "nullable_decimal")]
    pub total_amount: Decimal,
}

/// One cart line.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "productId", default)]
    pub product: Option<CartProduct>,
    #[serde(default, deserialize_with = "nullable_decimal")]
    pub price: Decimal,
    #[serde(default)]
    pub quantity: u32,
}

impl CartItem {
    /// Catalogue product id used by cart mutations.
    #[must_use]
    pub fn product_id(&self) -> Option<&ProductId> {
        self.product.as_ref().and_then(|p| p.id.as_ref())
    }
}

/// Populated product reference on a cart line.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    #[serde(rename = "_id", default)]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub variants: Vec<ProductVariant>,
}

/// Product variant; only the preview image is used.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    #[serde(default)]
    pub front_image: Option<String>,
}

// =============================================================================
// Deserialization helpers
// =============================================================================

/// Treat `null` like an absent list.
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Treat `null` like zero.
fn nullable_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept a plain id string or a populated document carrying `_id`.
fn id_ref<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRef {
        Plain(String),
        Populated {
            #[serde(rename = "_id", alias = "id")]
            id: String,
        },
    }

    let id = match Option::<IdRef>::deserialize(deserializer)? {
        Some(IdRef::Plain(id) | IdRef::Populated { id }) => id,
        None => return Ok(None),
    };
    let id = id.trim();
    Ok((!id.is_empty()).then(|| T::from(id.to_owned())))
}
