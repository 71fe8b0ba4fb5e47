use catalog_api::{CredentialStore, CredentialStoreError};
use chrono::{serde::ts_seconds, DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

use crate::error::AuthError;

const APP_DIR: &str = "catalog";
const TOKEN_FILE: &str = "token.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    #[serde(with = "ts_seconds")]
    stored_at: DateTime<Utc>,
}

/// Bearer token persisted to a file so it survives restarts.
///
/// The file is read once when the store is created; after that the
/// in-memory copy is authoritative and every `set`/`clear` writes through
/// before returning.
pub struct TokenStore {
    token_path: PathBuf,
    current: RwLock<Option<String>>,
}

impl TokenStore {
    /// Store at the default location, `<cache dir>/catalog/token.json`.
    pub fn new() -> Result<Self, AuthError> {
        Self::init(Self::default_path()?)
    }

    pub fn init(token_path: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let token_path = token_path.into();

        // Create cache directory if it doesn't exist
        if let Some(dir) = token_path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    AuthError::TokenStorage(format!("Failed to create token directory: {}", e))
                })?;
            }
        }

        let current = Self::load(&token_path)?;
        debug!(path = %token_path.display(), has_token = current.is_some(), "Token store initialized");

        Ok(Self {
            token_path,
            current: RwLock::new(current),
        })
    }

    pub fn default_path() -> Result<PathBuf, AuthError> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| AuthError::Configuration("Could not find cache directory".to_string()))?;
        Ok(cache_dir.join(APP_DIR).join(TOKEN_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.token_path
    }

    fn load(token_path: &Path) -> Result<Option<String>, AuthError> {
        if !token_path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(token_path)
            .map_err(|e| AuthError::TokenStorage(format!("Failed to read token: {}", e)))?;

        // An unreadable file is no different from a missing one: the user
        // logs in again and it gets overwritten.
        match serde_json::from_str::<StoredToken>(&json) {
            Ok(stored) => Ok(Some(stored.token).filter(|t| !t.is_empty())),
            Err(e) => {
                warn!(path = %token_path.display(), error = %e, "Ignoring corrupt token file");
                Ok(None)
            }
        }
    }

    fn save(&self, token: &str) -> Result<(), AuthError> {
        let stored = StoredToken {
            token: token.to_string(),
            stored_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&stored)?;

        fs::write(&self.token_path, json)
            .map_err(|e| AuthError::TokenStorage(format!("Failed to save token: {}", e)))?;

        // Set permissions to 0600 (read/write for owner only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.token_path)
                .map_err(|e| {
                    AuthError::TokenStorage(format!("Failed to get file permissions: {}", e))
                })?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.token_path, perms).map_err(|e| {
                AuthError::TokenStorage(format!("Failed to set file permissions: {}", e))
            })?;
        }

        Ok(())
    }

    fn delete(&self) -> Result<(), AuthError> {
        if self.token_path.exists() {
            fs::remove_file(&self.token_path)
                .map_err(|e| AuthError::TokenStorage(format!("Failed to delete token: {}", e)))?;
        }
        Ok(())
    }
}

impl CredentialStore for TokenStore {
    fn get(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, token: &str) -> Result<(), CredentialStoreError> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        self.save(token)?;
        *current = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        // Forget the token even if the file cannot be removed.
        *current = None;
        self.delete()?;
        Ok(())
    }
}
