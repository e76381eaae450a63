use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::{file_store::FileStore, memory_store::MemoryStore, no_store::NoStore};
use crate::config::StoreConfig;
use crate::models::token::AuthTokens;
use crate::models::user::UserProfile;

/// Persisted keys. The expiry is epoch milliseconds, string-encoded; the
/// user slot is a JSON-encoded profile snapshot kept only as a cold-start
/// cache.
pub const KEY_ACCESS_TOKEN: &str = "access_token";
pub const KEY_REFRESH_TOKEN: &str = "refresh_token";
pub const KEY_EXPIRES_AT: &str = "access_token_expires_at";
pub const KEY_USER: &str = "user";

/// The TokenStore trait abstracts credential persistence (save, read, clear).
///
/// Writes never fail outward: a degraded-but-functional session is
/// preferable to a crashed caller, so backends log persistence failures and
/// swallow them. All three token keys are written together and read
/// together within one operation; per-key semantics are last writer wins.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist a credentials bundle, replacing any previous one. When the
    /// bundle carries a validity duration, an absolute expiry timestamp is
    /// recorded alongside it.
    async fn save(&self, tokens: &AuthTokens);

    /// Remove the tokens, the expiry and the cached profile snapshot.
    /// Idempotent.
    async fn clear(&self);

    async fn access_token(&self) -> Option<String>;

    async fn refresh_token(&self) -> Option<String>;

    /// True when the recorded expiry has passed, or when none is recorded.
    /// Absence is treated as expired so callers refresh instead of trusting
    /// a token of unknown age.
    async fn is_expired(&self) -> bool;

    /// Cache a profile snapshot for cold-start display. Advisory only.
    async fn save_user(&self, user: &UserProfile);

    async fn cached_user(&self) -> Option<UserProfile>;

    fn is_enabled(&self) -> bool {
        // Real stores persist, so the default is true. NoStore overrides
        // this so callers can warn that the session will not survive a
        // restart.
        true
    }
}

/// Creates a concrete store implementation based on the StoreConfig.
/// If `store.enabled = false`, returns NoStore. Otherwise a file-backed
/// store when a path is configured, an in-memory one when not.
pub async fn create_store(config: &StoreConfig) -> Arc<dyn TokenStore> {
    if !config.enabled {
        info!("Token store is disabled. Using NoStore.");
        return Arc::new(NoStore::new());
    }

    match &config.path {
        Some(path) => {
            info!("Using file token store at {}", path.display());
            Arc::new(FileStore::new(path.clone()))
        }
        None => {
            info!("No store path configured. Using in-memory token store.");
            Arc::new(MemoryStore::new())
        }
    }
}

/// Absolute expiry for a bundle, epoch milliseconds string-encoded, when
/// the bundle carries a validity duration.
pub(crate) fn expires_at_ms(tokens: &AuthTokens) -> Option<String> {
    tokens
        .expires_in
        .map(|secs| (Utc::now().timestamp_millis() + secs * 1000).to_string())
}

/// Fail-closed expiry check over the raw stored value: absent or
/// unparseable timestamps count as expired.
pub(crate) fn expiry_has_passed(raw: Option<String>) -> bool {
    match raw.and_then(|value| value.parse::<i64>().ok()) {
        Some(at) => Utc::now().timestamp_millis() > at,
        None => true,
    }
}
