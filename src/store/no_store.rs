use async_trait::async_trait;

use super::base::TokenStore;
use crate::models::token::AuthTokens;
use crate::models::user::UserProfile;

/// A no-op store for environments without durable per-origin storage.
/// Writes are dropped and reads are absent, so every token check fails
/// closed rather than erroring out.
pub struct NoStore;

impl NoStore {
    pub fn new() -> Self {
        NoStore
    }
}

impl Default for NoStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for NoStore {
    async fn save(&self, _tokens: &AuthTokens) {}

    async fn clear(&self) {}

    async fn access_token(&self) -> Option<String> {
        None
    }

    async fn refresh_token(&self) -> Option<String> {
        None
    }

    async fn is_expired(&self) -> bool {
        true
    }

    async fn save_user(&self, _user: &UserProfile) {}

    async fn cached_user(&self) -> Option<UserProfile> {
        None
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
