//! Profile page themes.
//!
//! The backend stores the theme as free text in either `theme` or
//! `selectedTemplate`. Older accounts carry legacy names, so every raw token
//! goes through [`Theme::normalize`] before it selects a renderer.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One of the three canonical profile page layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Standard,
    Modern,
    Epic,
}

impl Theme {
    /// All canonical themes, in route-table order.
    pub const ALL: [Self; 3] = [Self::Standard, Self::Modern, Self::Epic];

    /// Canonical lower-case name, also used as the route segment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Modern => "modern",
            Self::Epic => "epic",
        }
    }

    /// Normalize a raw theme token.
    ///
    /// Lower-cases and trims the token, maps legacy aliases
    /// (`epi`, `linkedin`, `map`) and falls back to [`Theme::Standard`] for
    /// anything else, including an empty token.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "modern" | "linkedin" => Self::Modern,
            "epic" | "epi" => Self::Epic,
            // "standard", "map" and anything unrecognized
            _ => Self::Standard,
        }
    }

    /// Resolve the theme of an account or profile record.
    ///
    /// `theme` wins when it is present and non-blank; otherwise
    /// `selected_template` is used.
    #[must_use]
    pub fn from_record(theme: Option<&str>, selected_template: Option<&str>) -> Self {
        let raw = theme
            .filter(|t| !t.trim().is_empty())
            .or(selected_template)
            .unwrap_or_default();
        Self::normalize(raw)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_canonical_variants() {
        assert_eq!(Theme::normalize("Standard"), Theme::Standard);
        assert_eq!(Theme::normalize("MODERN "), Theme::Modern);
        assert_eq!(Theme::normalize("epi"), Theme::Epic);
        assert_eq!(Theme::normalize(" epic"), Theme::Epic);
    }

    #[test]
    fn test_normalize_legacy_aliases() {
        assert_eq!(Theme::normalize("linkedin"), Theme::Modern);
        assert_eq!(Theme::normalize("Map"), Theme::Standard);
    }

    #[test]
    fn test_normalize_unknown_falls_back_to_standard() {
        for raw in ["", "   ", "classic", "epicc", "modern-2", "null"] {
            assert_eq!(Theme::normalize(raw), Theme::Standard, "input {raw:?}");
        }
    }

    #[test]
    fn test_from_record_prefers_theme_field() {
        assert_eq!(Theme::from_record(Some("modern"), Some("epic")), Theme::Modern);
    }

    #[test]
    fn test_from_record_falls_back_to_selected_template() {
        assert_eq!(Theme::from_record(None, Some("epi")), Theme::Epic);
        assert_eq!(Theme::from_record(Some("  "), Some("modern")), Theme::Modern);
        assert_eq!(Theme::from_record(None, None), Theme::Standard);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Epic).unwrap(), "\"epic\"");
    }
}
