//! Themed profile pages and vCard download.
//!
//! Each theme is mounted on its own path (`/standard/{id}`, `/modern/{id}`,
//! `/epic/{id}`). The handler resolves the account's theme first and hands
//! over to the matching path on mismatch, then resolves the profile through
//! the shared resolver and renders the theme's card partial.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use cardfolio_core::{ContactCard, Theme, UserId};

use super::{ErrorPage, PageChrome};
use crate::backend::Profile;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, RequestId, remember_profile};
use crate::models::SessionContext;
use crate::navigation::{Route, transition};
use crate::resolver::{ProfileResolver, RememberedProfile, ResolveError};
use crate::state::AppState;

// =============================================================================
// View model
// =============================================================================

/// A phone number as shown and dialled.
#[derive(Debug, Clone)]
pub struct PhoneView {
    pub display: String,
    pub dial: String,
}

/// A social network link.
#[derive(Debug, Clone)]
pub struct SocialView {
    pub platform: String,
    pub label: String,
    pub url: String,
}

/// Profile display data shared by all card partials.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub full_name: String,
    pub designation: Option<String>,
    pub company: Option<String>,
    pub about: Option<String>,
    pub picture: Option<String>,
    pub cover: Option<String>,
    pub logo: Option<String>,
    pub phones: Vec<PhoneView>,
    pub emails: Vec<String>,
    pub socials: Vec<SocialView>,
    pub address_lines: Vec<String>,
    pub map_link: Option<String>,
    /// vCard download path; absent in previews.
    pub vcard_path: Option<String>,
}

fn text(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Only absolute web links end up in `href`/`src` attributes.
fn web_url(value: Option<&String>) -> Option<String> {
    text(value).filter(|url| {
        url::Url::parse(url).is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https"))
    })
}

/// Image sources may also be inline `data:` images.
fn image_url(value: Option<&String>) -> Option<String> {
    text(value).filter(|url| url.starts_with("data:image/")).or_else(|| web_url(value))
}

fn platform_label(platform: &str) -> String {
    match platform.trim().to_lowercase().as_str() {
        "linkedin" => "LinkedIn".to_string(),
        "x" | "twitter" => "X".to_string(),
        "youtube" => "YouTube".to_string(),
        "tiktok" => "TikTok".to_string(),
        "whatsapp" => "WhatsApp".to_string(),
        other => {
            let mut chars = other.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        }
    }
}

impl ProfileView {
    /// Build the view; `vcard_path` links the download button.
    #[must_use]
    pub fn new(profile: &Profile, vcard_path: Option<String>) -> Self {
        let details = profile.contact_details.as_ref();
        let address_lines: Vec<String> = details
            .map(|d| {
                let region = [d.state.as_ref(), d.country.as_ref()]
                    .into_iter()
                    .filter_map(text)
                    .collect::<Vec<_>>()
                    .join(", ");
                [text(d.address.as_ref()), Some(region).filter(|r| !r.is_empty())]
                    .into_iter()
                    .flatten()
                    .collect()
            })
            .unwrap_or_default();

        Self {
            full_name: profile.display_name().to_string(),
            designation: text(profile.company_designation.as_ref()),
            company: text(profile.company_name.as_ref()),
            about: text(profile.about.as_ref()),
            picture: image_url(profile.profile_picture.as_ref()),
            cover: image_url(profile.cover_image.as_ref()),
            logo: image_url(profile.company_logo.as_ref()),
            phones: profile
                .phone_numbers
                .iter()
                .filter(|p| !p.number.trim().is_empty())
                .map(|p| PhoneView {
                    display: p.display(),
                    dial: p.dial_string(),
                })
                .collect(),
            emails: profile
                .emails
                .iter()
                .map(|e| e.email_address.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            socials: profile
                .social_media
                .iter()
                .filter_map(|s| {
                    Some(SocialView {
                        platform: s.platform.trim().to_lowercase(),
                        label: platform_label(&s.platform),
                        url: web_url(Some(&s.url))?,
                    })
                })
                .collect(),
            address_lines,
            map_link: details.and_then(|d| web_url(d.google_map_link.as_ref())),
            vcard_path,
        }
    }
}

// =============================================================================
// Card partials
// =============================================================================

/// Standard card layout.
#[derive(Template)]
#[template(path = "profile/card_standard.html")]
pub struct StandardCard<'a> {
    pub profile: &'a ProfileView,
}

/// Modern card layout.
#[derive(Template)]
#[template(path = "profile/card_modern.html")]
pub struct ModernCard<'a> {
    pub profile: &'a ProfileView,
}

/// Epic card layout.
#[derive(Template)]
#[template(path = "profile/card_epic.html")]
pub struct EpicCard<'a> {
    pub profile: &'a ProfileView,
}

/// Render `profile` with the card partial for `theme`.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_card(profile: &ProfileView, theme: Theme) -> askama::Result<String> {
    match theme {
        Theme::Standard => StandardCard { profile }.render(),
        Theme::Modern => ModernCard { profile }.render(),
        Theme::Epic => EpicCard { profile }.render(),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/show.html")]
pub struct ProfilePageTemplate {
    pub chrome: PageChrome,
    pub title: String,
    pub theme: Theme,
    pub card_html: String,
}

/// Themed profile page.
///
/// GET /{theme}/{id}
#[instrument(skip(state, mounted, session, context, nonce, request_id), fields(theme = %mounted))]
pub async fn show(
    State(state): State<AppState>,
    Extension(mounted): Extension<Theme>,
    Path(id): Path<String>,
    session: Session,
    context: SessionContext,
    CspNonce(nonce): CspNonce,
    RequestId(request_id): RequestId,
) -> Result<Response> {
    let chrome = PageChrome::new(&state, nonce, &context);
    let mut resolver = ProfileResolver::new(state.backend(), UserId::new(id.as_str()))
        .remembering(context.last_profile.clone())
        .with_cache(state.remembered());

    if let Some(resolved) = resolver.account_theme().await
        && let Some(route) = transition(mounted, resolved, &id)
    {
        tracing::debug!(to = %route.path(), "Theme mismatch, redirecting");
        return Ok(route.redirect().into_response());
    }

    let resolved = match resolver.resolve(&id).await {
        Ok(resolved) => resolved,
        Err(e) => return Ok(unavailable_page(chrome, &e, request_id)),
    };

    // Account lookup failed but the profile carries its own theme
    if let Some(route) = transition(mounted, resolved.theme, &id) {
        return Ok(route.redirect().into_response());
    }

    if let Some(remembered) = resolver.into_remembered()
        && should_remember(&context, &remembered)
    {
        remember_profile(&session, &remembered).await;
    }

    let vcard = Route::Vcard {
        theme: mounted,
        id: id.clone(),
    };
    let view = ProfileView::new(&resolved.profile, Some(vcard.path()));
    let card_html = render_card(&view, mounted)?;

    Ok(ProfilePageTemplate {
        chrome,
        title: if view.full_name.is_empty() {
            "Profile".to_string()
        } else {
            view.full_name.clone()
        },
        theme: mounted,
        card_html,
    }
    .into_response())
}

/// Inline panel for a profile that could not be shown.
fn unavailable_page(chrome: PageChrome, error: &ResolveError, request_id: String) -> Response {
    match error {
        ResolveError::NotFound(_) => ErrorPage {
            chrome,
            status: StatusCode::NOT_FOUND,
            heading: "Profile not found".to_string(),
            message: "This card does not exist or is no longer shared.".to_string(),
            reference: None,
        }
        .into_response(),
        ResolveError::Unavailable(e) => {
            tracing::error!(error = %e, "Profile unavailable");
            ErrorPage {
                chrome,
                status: StatusCode::BAD_GATEWAY,
                heading: "Unable to load profile".to_string(),
                message: "Please try again in a moment.".to_string(),
                reference: Some(request_id),
            }
            .into_response()
        }
    }
}

/// `Content-Disposition` for a download: an ASCII `filename` plus the exact
/// name as RFC 5987 `filename*`.
fn attachment_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}

/// Whether to write `remembered` into the visitor's session.
///
/// Anonymous visitors only go through the process-wide cache, so viewing a
/// card never creates a session record.
fn should_remember(context: &SessionContext, remembered: &RememberedProfile) -> bool {
    context.credentials().is_some() && context.last_profile.as_ref() != Some(remembered)
}

/// Download the profile as a vCard.
///
/// GET /{theme}/{id}/vcard
#[instrument(skip(state, context))]
pub async fn vcard(
    State(state): State<AppState>,
    Path(id): Path<String>,
    context: SessionContext,
) -> Result<Response> {
    let mut resolver = ProfileResolver::new(state.backend(), UserId::new(id.as_str()))
        .remembering(context.last_profile)
        .with_cache(state.remembered());

    let resolved = resolver.resolve(&id).await.map_err(|e| match e {
        ResolveError::NotFound(what) => AppError::NotFound(what),
        ResolveError::Unavailable(e) => AppError::Backend(e),
    })?;

    let card = ContactCard::from(&resolved.profile);
    let disposition = attachment_disposition(&card.file_name());

    Ok((
        [
            (header::CONTENT_TYPE, "text/vcard; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        card.to_vcard(),
    )
        .into_response())
}
