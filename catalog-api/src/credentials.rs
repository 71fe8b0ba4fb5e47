use crate::error::CredentialStoreError;
use std::sync::{PoisonError, RwLock};

/// Holder of the current bearer token.
///
/// At most one token is held at a time. Tokens are opaque: nothing here
/// checks their shape or validity.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<String>;

    /// Replace the current token. Must be persisted before returning.
    fn set(&self, token: &str) -> Result<(), CredentialStoreError>;

    fn clear(&self) -> Result<(), CredentialStoreError>;
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    token: RwLock<Option<String>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentials {
    fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, token: &str) -> Result<(), CredentialStoreError> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
