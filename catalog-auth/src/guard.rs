use catalog_api::SessionState;
use tracing::debug;

pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Outcome of a navigation attempt to a protected destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Admitted,
    /// Go to `to` (the login view); `from` is where the user was heading,
    /// so the login flow can send them back afterwards.
    Redirected { to: String, from: String },
}

impl Navigation {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Navigation::Admitted)
    }
}

/// Gate in front of protected views.
///
/// Holds no session state of its own; every check reads the session as it
/// is at that moment.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_PATH)
    }
}

impl RouteGuard {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn check(&self, session: &SessionState, destination: &str) -> Navigation {
        if session.is_authenticated() {
            return Navigation::Admitted;
        }

        debug!(%destination, "Not logged in, redirecting to login");
        Navigation::Redirected {
            to: self.login_path.clone(),
            from: destination.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_api::{Id, MemoryCredentials, UserInfo};
    use std::sync::Arc;

    fn session() -> SessionState {
        SessionState::new(Arc::new(MemoryCredentials::new()))
    }

    fn user() -> UserInfo {
        UserInfo {
            id: Id::from(1),
            email: "a@b.com".to_string(),
            name: None,
        }
    }

    #[test]
    fn redirects_when_logged_out() {
        let guard = RouteGuard::default();

        assert_eq!(
            guard.check(&session(), "/products/new"),
            Navigation::Redirected {
                to: "/login".to_string(),
                from: "/products/new".to_string(),
            }
        );
    }

    #[test]
    fn admits_when_logged_in() {
        let guard = RouteGuard::default();
        let session = session();
        session.establish("T1", user()).unwrap();

        assert!(guard.check(&session, "/products/edit/42").is_admitted());
    }

    #[test]
    fn a_stored_token_alone_is_not_enough() {
        let guard = RouteGuard::default();
        let session = SessionState::new(Arc::new(MemoryCredentials::with_token("T1")));

        assert!(!guard.check(&session, "/products/new").is_admitted());
    }

    #[test]
    fn decides_fresh_on_every_check() {
        let guard = RouteGuard::new("/signin");
        let session = session();

        session.establish("T1", user()).unwrap();
        assert!(guard.check(&session, "/products/new").is_admitted());

        session.terminate();
        assert_eq!(
            guard.check(&session, "/products/new"),
            Navigation::Redirected {
                to: "/signin".to_string(),
                from: "/products/new".to_string(),
            }
        );
    }
}
