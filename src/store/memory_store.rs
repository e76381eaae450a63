use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::warn;

use super::base::{
    expires_at_ms, expiry_has_passed, TokenStore, KEY_ACCESS_TOKEN, KEY_EXPIRES_AT,
    KEY_REFRESH_TOKEN, KEY_USER,
};
use crate::models::token::AuthTokens;
use crate::models::user::UserProfile;

/// An in-memory token store. The default when no file path is configured,
/// and the fake the file-backed store is tested against.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn save(&self, tokens: &AuthTokens) {
        let expires_at = expires_at_ms(tokens);
        let mut entries = self.entries();
        entries.insert(KEY_ACCESS_TOKEN.to_string(), tokens.access_token.clone());
        entries.insert(KEY_REFRESH_TOKEN.to_string(), tokens.refresh_token.clone());
        match expires_at {
            Some(at) => {
                entries.insert(KEY_EXPIRES_AT.to_string(), at);
            }
            None => {
                entries.remove(KEY_EXPIRES_AT);
            }
        }
    }

    async fn clear(&self) {
        let mut entries = self.entries();
        entries.remove(KEY_ACCESS_TOKEN);
        entries.remove(KEY_REFRESH_TOKEN);
        entries.remove(KEY_EXPIRES_AT);
        entries.remove(KEY_USER);
    }

    async fn access_token(&self) -> Option<String> {
        self.entries().get(KEY_ACCESS_TOKEN).cloned()
    }

    async fn refresh_token(&self) -> Option<String> {
        self.entries().get(KEY_REFRESH_TOKEN).cloned()
    }

    async fn is_expired(&self) -> bool {
        expiry_has_passed(self.entries().get(KEY_EXPIRES_AT).cloned())
    }

    async fn save_user(&self, user: &UserProfile) {
        match serde_json::to_string(user) {
            Ok(raw) => {
                self.entries().insert(KEY_USER.to_string(), raw);
            }
            Err(e) => warn!("Failed to encode profile snapshot: {}", e),
        }
    }

    async fn cached_user(&self) -> Option<UserProfile> {
        let raw = self.entries().get(KEY_USER).cloned()?;
        serde_json::from_str(&raw).ok()
    }
}
