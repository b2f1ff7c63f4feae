//! Theme resolution and profile lookup.
//!
//! The backend's identifier space is inconsistent: a card link may carry an
//! account id or a profile id, and older links carry ids that only resolve
//! through a previously seen mapping. Every profile page, the order preview
//! and the CLI resolve through [`ProfileResolver`], which tries an ordered
//! list of [`LookupStrategy`] values until one yields a profile:
//!
//! 1. `Direct` - fetch the profile with the requested id
//! 2. `Account` - fetch the account record and retry with its `profileId`
//! 3. `Remembered` - retry with an id remembered from an earlier success
//!
//! Within one resolution the account record is fetched at most once (theme
//! resolution reuses it) and each distinct profile id is fetched at most once.

mod remembered;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use cardfolio_core::{ProfileId, Theme, UserId};

use crate::backend::{Account, BackendError, Profile, ProfileApi};

pub use remembered::{RememberedProfile, RememberedProfileIds};

/// One way of finding a profile document for a lookup id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    Direct,
    Account,
    Remembered,
}

impl LookupStrategy {
    /// Order used by every page.
    pub const DEFAULT_ORDER: [Self; 3] = [Self::Direct, Self::Account, Self::Remembered];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Account => "account",
            Self::Remembered => "remembered",
        }
    }
}

/// Why a single strategy produced no profile.
#[derive(Debug, Error)]
pub enum ProfileMiss {
    /// The strategy had no id to try.
    #[error("no candidate profile id")]
    NoCandidate,

    /// The candidate was already fetched earlier in this resolution.
    #[error("profile {0} already tried")]
    AlreadyTried(ProfileId),

    /// The fetch itself failed or came back empty.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Terminal outcome of a failed resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Every strategy missed and none of them hit a transport failure.
    #[error("Profile not found: {0}")]
    NotFound(String),

    /// At least one strategy failed to reach the backend.
    #[error("Unable to load profile: {0}")]
    Unavailable(#[source] BackendError),
}

/// A successfully resolved profile and the theme it renders with.
#[derive(Debug, Clone)]
pub struct ResolvedProfile {
    pub profile: Profile,
    pub profile_id: ProfileId,
    pub theme: Theme,
    pub strategy: LookupStrategy,
}

/// Resolve a user's canonical theme from their account record.
///
/// Any failure resolves to [`Theme::Standard`].
#[instrument(skip(backend), fields(user_id = %user_id))]
pub async fn resolve_theme<B: ProfileApi>(backend: &B, user_id: &UserId) -> Theme {
    match backend.get_account(user_id).await {
        Ok(account) => account.theme(),
        Err(e) => {
            warn!(error = %e, "Account lookup failed, using standard theme");
            Theme::Standard
        }
    }
}

/// Per-request profile resolver.
///
/// Holds the memoized account lookup and the ids already tried, so create one
/// per request and drop it afterwards.
pub struct ProfileResolver<'a, B> {
    backend: &'a B,
    account_id: UserId,
    strategies: &'a [LookupStrategy],
    remembered: Option<RememberedProfile>,
    cache: Option<&'a RememberedProfileIds>,
    /// `None` until fetched; `Some(None)` if the fetch failed.
    account: Option<Option<Account>>,
    tried: Vec<ProfileId>,
}

impl<'a, B: ProfileApi> ProfileResolver<'a, B> {
    /// Create a resolver whose `Account` strategy and theme lookups use
    /// `account_id`.
    pub fn new(backend: &'a B, account_id: UserId) -> Self {
        Self {
            backend,
            account_id,
            strategies: &LookupStrategy::DEFAULT_ORDER,
            remembered: None,
            cache: None,
            account: None,
            tried: Vec::new(),
        }
    }

    /// Override the strategy order.
    #[must_use]
    pub fn with_strategies(mut self, strategies: &'a [LookupStrategy]) -> Self {
        self.strategies = strategies;
        self
    }

    /// Profile the visitor's session remembers from a previous load.
    #[must_use]
    pub fn remembering(mut self, remembered: Option<RememberedProfile>) -> Self {
        self.remembered = remembered;
        self
    }

    /// Process-wide remembered ids, consulted after the session and updated
    /// on every success.
    #[must_use]
    pub fn with_cache(mut self, cache: &'a RememberedProfileIds) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Number of distinct profile ids fetched so far.
    #[must_use]
    pub fn profile_fetches(&self) -> usize {
        self.tried.len()
    }

    /// Canonical theme from the account record, if it could be fetched.
    pub async fn account_theme(&mut self) -> Option<Theme> {
        self.account().await.map(Account::theme)
    }

    /// Resolve `lookup_id` to a profile and its theme.
    ///
    /// The theme comes from the account record; if that is unavailable the
    /// profile document's own theme is used.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if every strategy missed and `Unavailable` if any
    /// of them failed to reach the backend.
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn resolve(&mut self, lookup_id: &str) -> Result<ResolvedProfile, ResolveError> {
        let lookup_id = lookup_id.trim();
        if lookup_id.is_empty() {
            return Err(ResolveError::NotFound("empty id".to_string()));
        }

        let mut unavailable = None;
        for &strategy in self.strategies {
            match self.attempt(strategy, lookup_id).await {
                Ok((profile_id, profile)) => {
                    debug!(strategy = strategy.as_str(), profile_id = %profile_id, "Profile resolved");
                    self.remember(lookup_id, &profile_id).await;

                    let theme = match self.account_theme().await {
                        Some(theme) => theme,
                        None => profile.own_theme(),
                    };
                    return Ok(ResolvedProfile {
                        profile,
                        profile_id,
                        theme,
                        strategy,
                    });
                }
                Err(ProfileMiss::Backend(e)) if !e.is_not_found() => {
                    warn!(strategy = strategy.as_str(), error = %e, "Profile lookup failed");
                    unavailable = Some(e);
                }
                Err(miss) => {
                    debug!(strategy = strategy.as_str(), miss = %miss, "Profile lookup missed");
                }
            }
        }

        Err(unavailable.map_or_else(
            || ResolveError::NotFound(lookup_id.to_string()),
            ResolveError::Unavailable,
        ))
    }

    async fn attempt(
        &mut self,
        strategy: LookupStrategy,
        lookup_id: &str,
    ) -> Result<(ProfileId, Profile), ProfileMiss> {
        let candidate = match strategy {
            LookupStrategy::Direct => ProfileId::new(lookup_id),
            LookupStrategy::Account => self
                .account()
                .await
                .and_then(|account| account.profile_id.clone())
                .ok_or(ProfileMiss::NoCandidate)?,
            LookupStrategy::Remembered => self.remembered_candidate(lookup_id).await?,
        };

        if self.tried.contains(&candidate) {
            return Err(ProfileMiss::AlreadyTried(candidate));
        }
        self.tried.push(candidate.clone());

        let profile = self.backend.get_profile(&candidate).await?;
        Ok((candidate, profile))
    }

    /// First remembered id not yet tried: session first, then the cache.
    async fn remembered_candidate(&self, lookup_id: &str) -> Result<ProfileId, ProfileMiss> {
        let from_session = self
            .remembered
            .as_ref()
            .and_then(|r| r.matching(lookup_id))
            .cloned();
        let from_cache = match self.cache {
            Some(cache) => cache.get(lookup_id).await,
            None => None,
        };

        let mut last_tried = None;
        for candidate in [from_session, from_cache].into_iter().flatten() {
            if self.tried.contains(&candidate) {
                last_tried = Some(candidate);
            } else {
                return Ok(candidate);
            }
        }
        Err(last_tried.map_or(ProfileMiss::NoCandidate, ProfileMiss::AlreadyTried))
    }

    async fn account(&mut self) -> Option<&Account> {
        if self.account.is_none() {
            let fetched = match self.backend.get_account(&self.account_id).await {
                Ok(account) => Some(account),
                Err(e) => {
                    debug!(error = %e, "Account lookup failed");
                    None
                }
            };
            self.account = Some(fetched);
        }
        self.account.as_ref().and_then(Option::as_ref)
    }

    async fn remember(&mut self, lookup_id: &str, profile_id: &ProfileId) {
        if let Some(cache) = self.cache {
            cache.remember(lookup_id, profile_id.clone()).await;
        }
        self.remembered = Some(RememberedProfile {
            lookup_id: lookup_id.to_string(),
            profile_id: profile_id.clone(),
        });
    }

    /// What the visitor's session should remember after this resolution.
    #[must_use]
    pub fn into_remembered(self) -> Option<RememberedProfile> {
        self.remembered
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// In-memory `ProfileApi` that counts calls.
    #[derive(Default)]
    pub(crate) struct FakeProfiles {
        pub accounts: HashMap<String, Account>,
        pub profiles: HashMap<String, Profile>,
        pub offline: bool,
        pub account_calls: AtomicUsize,
        pub profile_calls: AtomicUsize,
    }

    impl FakeProfiles {
        pub(crate) fn with_account(mut self, user_id: &str, theme: &str, profile_id: Option<&str>) -> Self {
            self.accounts.insert(
                user_id.to_string(),
                Account {
                    id: Some(UserId::new(user_id)),
                    theme: Some(theme.to_string()),
                    selected_template: None,
                    profile_id: profile_id.map(ProfileId::new),
                },
            );
            self
        }

        pub(crate) fn with_profile(mut self, profile_id: &str, name: &str) -> Self {
            self.profiles.insert(
                profile_id.to_string(),
                Profile {
                    id: Some(ProfileId::new(profile_id)),
                    full_name: Some(name.to_string()),
                    ..Profile::default()
                },
            );
            self
        }

        pub(crate) fn account_calls(&self) -> usize {
            self.account_calls.load(Ordering::SeqCst)
        }

        pub(crate) fn profile_calls(&self) -> usize {
            self.profile_calls.load(Ordering::SeqCst)
        }
    }

    impl ProfileApi for FakeProfiles {
        async fn get_account(&self, user_id: &UserId) -> Result<Account, BackendError> {
            self.account_calls.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(BackendError::Api {
                    status: 503,
                    message: "offline".to_string(),
                });
            }
            self.accounts
                .get(user_id.as_str())
                .cloned()
                .ok_or_else(|| BackendError::NotFound(format!("account {user_id}")))
        }

        async fn get_profile(&self, profile_id: &ProfileId) -> Result<Profile, BackendError> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(BackendError::Api {
                    status: 503,
                    message: "offline".to_string(),
                });
            }
            self.profiles
                .get(profile_id.as_str())
                .cloned()
                .ok_or_else(|| BackendError::NotFound(format!("profile {profile_id}")))
        }
    }

    #[tokio::test]
    async fn test_direct_hit_uses_account_theme() {
        let backend = FakeProfiles::default()
            .with_account("u1", "epi", None)
            .with_profile("u1", "Jane Doe");
        let mut resolver = ProfileResolver::new(&backend, UserId::new("u1"));

        let resolved = resolver.resolve("u1").await.unwrap();
        assert_eq!(resolved.strategy, LookupStrategy::Direct);
        assert_eq!(resolved.theme, Theme::Epic);
        assert_eq!(resolved.profile.display_name(), "Jane Doe");
        assert_eq!(backend.account_calls(), 1);
        assert_eq!(backend.profile_calls(), 1);
    }

    #[tokio::test]
    async fn test_account_strategy_after_direct_miss() {
        let backend = FakeProfiles::default()
            .with_account("u1", "modern", Some("p1"))
            .with_profile("p1", "Jane Doe");
        let mut resolver = ProfileResolver::new(&backend, UserId::new("u1"));

        let resolved = resolver.resolve("u1").await.unwrap();
        assert_eq!(resolved.strategy, LookupStrategy::Account);
        assert_eq!(resolved.profile_id, ProfileId::new("p1"));
        assert_eq!(resolved.theme, Theme::Modern);
        // Theme resolution reused the memoized account record
        assert_eq!(backend.account_calls(), 1);
        assert_eq!(backend.profile_calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_chain_bounds_backend_calls() {
        // Direct misses, the account points at a profile that also misses,
        // and the remembered id is the same one the account returned.
        let backend = FakeProfiles::default().with_account("u1", "standard", Some("p1"));
        let remembered = RememberedProfile {
            lookup_id: "u1".to_string(),
            profile_id: ProfileId::new("p1"),
        };
        let mut resolver =
            ProfileResolver::new(&backend, UserId::new("u1")).remembering(Some(remembered));

        let err = resolver.resolve("u1").await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
        assert_eq!(backend.account_calls(), 1);
        assert_eq!(backend.profile_calls(), 2);
        assert_eq!(resolver.profile_fetches(), 2);
    }

    #[tokio::test]
    async fn test_remembered_strategy_from_cache() {
        let backend = FakeProfiles::default().with_profile("p7", "Old Link");
        let cache = RememberedProfileIds::new();
        cache.remember("legacy", ProfileId::new("p7")).await;

        let mut resolver =
            ProfileResolver::new(&backend, UserId::new("legacy")).with_cache(&cache);
        let resolved = resolver.resolve("legacy").await.unwrap();

        assert_eq!(resolved.strategy, LookupStrategy::Remembered);
        // No account record: the profile's own theme (unset) applies
        assert_eq!(resolved.theme, Theme::Standard);
        assert_eq!(backend.account_calls(), 1);
    }

    #[tokio::test]
    async fn test_success_is_remembered() {
        let backend = FakeProfiles::default()
            .with_account("u1", "epic", Some("p1"))
            .with_profile("p1", "Jane Doe");
        let cache = RememberedProfileIds::new();

        let mut resolver = ProfileResolver::new(&backend, UserId::new("u1")).with_cache(&cache);
        resolver.resolve("u1").await.unwrap();

        assert_eq!(cache.get("u1").await, Some(ProfileId::new("p1")));
        let remembered = resolver.into_remembered().unwrap();
        assert_eq!(remembered.matching("u1"), Some(&ProfileId::new("p1")));
    }

    #[tokio::test]
    async fn test_transport_failure_is_unavailable() {
        let backend = FakeProfiles {
            offline: true,
            ..FakeProfiles::default()
        };
        let mut resolver = ProfileResolver::new(&backend, UserId::new("u1"));

        let err = resolver.resolve("u1").await.unwrap_err();
        assert!(matches!(err, ResolveError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_empty_id_makes_no_calls() {
        let backend = FakeProfiles::default();
        let mut resolver = ProfileResolver::new(&backend, UserId::new(""));

        assert!(matches!(
            resolver.resolve("  ").await,
            Err(ResolveError::NotFound(_))
        ));
        assert_eq!(backend.account_calls(), 0);
        assert_eq!(backend.profile_calls(), 0);
    }

    #[tokio::test]
    async fn test_custom_strategy_order() {
        let backend = FakeProfiles::default()
            .with_account("u1", "modern", Some("p1"))
            .with_profile("u1", "Direct")
            .with_profile("p1", "Via Account");
        let order = [LookupStrategy::Account, LookupStrategy::Direct];
        let mut resolver =
            ProfileResolver::new(&backend, UserId::new("u1")).with_strategies(&order);

        let resolved = resolver.resolve("u1").await.unwrap();
        assert_eq!(resolved.profile.display_name(), "Via Account");
    }

    #[tokio::test]
    async fn test_resolve_theme() {
        let backend = FakeProfiles::default().with_account("u1", "epi", None);
        assert_eq!(resolve_theme(&backend, &UserId::new("u1")).await, Theme::Epic);
        assert_eq!(
            resolve_theme(&backend, &UserId::new("missing")).await,
            Theme::Standard
        );
    }
}
