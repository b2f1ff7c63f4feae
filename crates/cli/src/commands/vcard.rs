//! Export a profile as a vCard file.

use std::io::Write;
use std::path::Path;

use tracing::info;

use cardfolio_core::{ContactCard, UserId};
use cardfolio_storefront::backend::{BackendClient, ProfileApi};
use cardfolio_storefront::config::BackendConfig;
use cardfolio_storefront::resolver::{ProfileResolver, ResolveError};

/// Resolve `id` (account or profile id) and write its vCard.
///
/// Writes to `output` if given, otherwise to stdout.
///
/// # Errors
///
/// Returns an error if configuration is missing, the profile cannot be
/// resolved, or the output cannot be written.
pub async fn export(id: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = BackendConfig::from_process_env()?;
    let backend = BackendClient::new(&config)?;

    let text = render(&backend, id).await?;

    match output {
        Some(path) => {
            tokio::fs::write(path, text).await?;
            info!(path = %path.display(), "Wrote vCard");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
        }
    }
    Ok(())
}

/// Resolve `id` and render its vCard text.
///
/// # Errors
///
/// Returns the resolver's error if no strategy finds the profile.
pub async fn render<B: ProfileApi>(backend: &B, id: &str) -> Result<String, ResolveError> {
    let mut resolver = ProfileResolver::new(backend, UserId::new(id));
    let resolved = resolver.resolve(id).await?;
    info!(
        profile_id = %resolved.profile_id,
        strategy = resolved.strategy.as_str(),
        "Resolved profile"
    );

    Ok(ContactCard::from(&resolved.profile).to_vcard())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::tests::FakeBackend;

    #[tokio::test]
    async fn test_render_by_account_id() {
        let backend = FakeBackend::default()
            .with_account("u1", "modern", "p1")
            .with_profile("p1", "Jane Doe");

        let text = render(&backend, "u1").await.unwrap();
        assert!(text.starts_with("BEGIN:VCARD\r\nVERSION:3.0\r\n"));
        assert!(text.contains("FN:Jane Doe\r\n"));
        assert!(text.ends_with("END:VCARD\r\n"));
    }

    #[tokio::test]
    async fn test_render_unknown_id_is_not_found() {
        let backend = FakeBackend::default();
        let err = render(&backend, "ghost").await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
    }
}
