//! CLI command implementations.

pub mod theme;
pub mod vcard;

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use cardfolio_core::{ProfileId, UserId};
    use cardfolio_storefront::backend::{Account, BackendError, Profile, ProfileApi};

    /// In-memory `ProfileApi` for command tests.
    #[derive(Default)]
    pub(crate) struct FakeBackend {
        accounts: HashMap<String, Account>,
        profiles: HashMap<String, Profile>,
    }

    impl FakeBackend {
        pub(crate) fn with_account(mut self, user_id: &str, theme: &str, profile_id: &str) -> Self {
            self.accounts.insert(
                user_id.to_string(),
                Account {
                    id: Some(UserId::new(user_id)),
                    selected_template: Some(theme.to_string()),
                    profile_id: Some(ProfileId::new(profile_id)),
                    ..Account::default()
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
    }

    impl ProfileApi for FakeBackend {
        async fn get_account(&self, user_id: &UserId) -> Result<Account, BackendError> {
            self.accounts
                .get(user_id.as_str())
                .cloned()
                .ok_or_else(|| BackendError::NotFound(format!("account {user_id}")))
        }

        async fn get_profile(&self, profile_id: &ProfileId) -> Result<Profile, BackendError> {
            self.profiles
                .get(profile_id.as_str())
                .cloned()
                .ok_or_else(|| BackendError::NotFound(format!("profile {profile_id}")))
        }
    }
}
