//! Resolve the theme of an account, the same way `/profile/{user_id}` does.

use std::io::Write;

use tracing::info;

use cardfolio_core::UserId;
use cardfolio_storefront::backend::{BackendClient, ProfileApi};
use cardfolio_storefront::config::BackendConfig;
use cardfolio_storefront::navigation::Route;
use cardfolio_storefront::resolver::resolve_theme;

/// Print the theme and the page the theme router would redirect to.
///
/// # Errors
///
/// Returns an error if `BACKEND_API_URL` is missing or the HTTP client
/// cannot be built. Lookup failures resolve to the standard theme.
pub async fn resolve(user_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = BackendConfig::from_process_env()?;
    let backend = BackendClient::new(&config)?;

    info!(user_id, backend = %config.api_url, "Resolving theme");
    let line = theme_line(&backend, user_id).await;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}")?;
    Ok(())
}

/// `{theme}\t{path}` for `user_id`.
pub async fn theme_line<B: ProfileApi>(backend: &B, user_id: &str) -> String {
    let theme = resolve_theme(backend, &UserId::new(user_id)).await;
    format!("{theme}\t{}", Route::profile(theme, user_id).path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::FakeBackend;

    #[tokio::test]
    async fn test_theme_line_uses_normalized_theme() {
        let backend = FakeBackend::default().with_account("u1", "epi", "p1");
        assert_eq!(theme_line(&backend, "u1").await, "epic\t/epic/u1");
    }

    #[tokio::test]
    async fn test_theme_line_falls_back_to_standard() {
        let backend = FakeBackend::default();
        assert_eq!(
            theme_line(&backend, "no body").await,
            "standard\t/standard/no%20body"
        );
    }
}
