use crate::credentials::CredentialStore;
use crate::endpoints::Id;
use crate::error::CredentialStoreError;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Id,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserInfo {
    /// Name to greet the user with, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }
}

/// Point-in-time view of who is logged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<UserInfo>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Shared login state: the credential store plus the current user.
///
/// Clones share the same state, so a logout seen through one handle is
/// seen by all of them on their next read. The user starts absent on every
/// process start, even when the store still holds a token.
#[derive(Clone)]
pub struct SessionState {
    credentials: Arc<dyn CredentialStore>,
    user: Arc<RwLock<Option<UserInfo>>>,
}

impl SessionState {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            credentials,
            user: Arc::new(RwLock::new(None)),
        }
    }

    pub fn current(&self) -> Session {
        Session {
            user: self
                .user
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Token to send with the next request. Empty tokens count as absent.
    pub fn token(&self) -> Option<String> {
        self.credentials.get().filter(|t| !t.is_empty())
    }

    /// Record a successful login. The token is persisted first; if that
    /// fails the user stays unset.
    pub fn establish(&self, token: &str, user: UserInfo) -> Result<(), CredentialStoreError> {
        self.credentials.set(token)?;
        info!(user = %user.email, "Session established");
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
        Ok(())
    }

    /// End the session locally. Never fails: a store that cannot be cleared
    /// is logged and the user is dropped regardless.
    pub fn terminate(&self) {
        if let Err(e) = self.credentials.clear() {
            warn!(error = %e, "Failed to clear stored credential");
        }
        let previous = self
            .user
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(user) = previous {
            info!(user = %user.email, "Session ended");
        }
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("user", &self.current().user)
            .field("has_token", &self.token().is_some())
            .finish()
    }
}
