use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::warn;

use super::base::{
    expires_at_ms, expiry_has_passed, TokenStore, KEY_ACCESS_TOKEN, KEY_EXPIRES_AT,
    KEY_REFRESH_TOKEN, KEY_USER,
};
use crate::models::token::AuthTokens;
use crate::models::user::UserProfile;

/// A token store backed by a JSON file on disk, surviving process restarts.
///
/// The file is re-read on every access so concurrent processes observe each
/// other's writes, and rewritten via a uniquely-named temp file + rename so
/// a reader sees either the old or the fully-new contents, never a partial
/// write.
pub struct FileStore {
    path: PathBuf,
}

static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        FileStore { path }
    }

    fn read_entries(&self) -> HashMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Token store file {} is not valid JSON ({}); treating as empty",
                    self.path.display(),
                    e
                );
                HashMap::new()
            }
        }
    }

    fn write_entries(&self, entries: &HashMap<String, String>) {
        let result = (|| -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let raw = serde_json::to_string_pretty(entries)?;
            // Unique per write (pid + counter): concurrent writers must
            // never share a temp file, or the rename could publish a torn
            // bundle. Each rename then atomically replaces the store with
            // one complete snapshot, last writer wins.
            let tmp = self.path.with_extension(format!(
                "tmp.{}.{}",
                process::id(),
                WRITE_SEQ.fetch_add(1, Ordering::Relaxed)
            ));
            fs::write(&tmp, raw)?;
            fs::rename(&tmp, &self.path)?;
            Ok(())
        })();
        if let Err(e) = result {
            warn!(
                "Failed to persist tokens to {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

#[async_trait]
impl TokenStore for FileStore {
    async fn save(&self, tokens: &AuthTokens) {
        let mut entries = self.read_entries();
        entries.insert(KEY_ACCESS_TOKEN.to_string(), tokens.access_token.clone());
        entries.insert(KEY_REFRESH_TOKEN.to_string(), tokens.refresh_token.clone());
        match expires_at_ms(tokens) {
            Some(at) => {
                entries.insert(KEY_EXPIRES_AT.to_string(), at);
            }
            None => {
                entries.remove(KEY_EXPIRES_AT);
            }
        }
        self.write_entries(&entries);
    }

    async fn clear(&self) {
        let mut entries = self.read_entries();
        entries.remove(KEY_ACCESS_TOKEN);
        entries.remove(KEY_REFRESH_TOKEN);
        entries.remove(KEY_EXPIRES_AT);
        entries.remove(KEY_USER);
        self.write_entries(&entries);
    }

    async fn access_token(&self) -> Option<String> {
        self.read_entries().remove(KEY_ACCESS_TOKEN)
    }

    async fn refresh_token(&self) -> Option<String> {
        self.read_entries().remove(KEY_REFRESH_TOKEN)
    }

    async fn is_expired(&self) -> bool {
        expiry_has_passed(self.read_entries().remove(KEY_EXPIRES_AT))
    }

    async fn save_user(&self, user: &UserProfile) {
        match serde_json::to_string(user) {
            Ok(raw) => {
                let mut entries = self.read_entries();
                entries.insert(KEY_USER.to_string(), raw);
                self.write_entries(&entries);
            }
            Err(e) => warn!("Failed to encode profile snapshot: {}", e),
        }
    }

    async fn cached_user(&self) -> Option<UserProfile> {
        let raw = self.read_entries().remove(KEY_USER)?;
        serde_json::from_str(&raw).ok()
    }
}
