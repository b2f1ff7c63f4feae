//! Profile ids remembered from earlier successful loads.

use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};

use cardfolio_core::ProfileId;

/// Lookup id -> profile id it last resolved to, shared by all visitors.
///
/// Entries expire after a day so a re-linked account is eventually picked up.
#[derive(Clone)]
pub struct RememberedProfileIds {
    cache: Cache<String, ProfileId>,
}

impl RememberedProfileIds {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(24 * 60 * 60)) // 1 day
            .build();
        Self { cache }
    }

    pub async fn get(&self, lookup_id: &str) -> Option<ProfileId> {
        self.cache.get(lookup_id).await
    }

    pub async fn remember(&self, lookup_id: &str, profile_id: ProfileId) {
        self.cache.insert(lookup_id.to_string(), profile_id).await;
    }
}

impl Default for RememberedProfileIds {
    fn default() -> Self {
        Self::new()
    }
}

/// The last profile a visitor loaded, kept in their session.
///
/// Only consulted when the visitor asks for the same lookup id again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberedProfile {
    pub lookup_id: String,
    pub profile_id: ProfileId,
}

impl RememberedProfile {
    #[must_use]
    pub fn matching(&self, lookup_id: &str) -> Option<&ProfileId> {
        (self.lookup_id == lookup_id).then_some(&self.profile_id)
    }
}
