use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::AuthError;
use crate::guard::{RouteGuard, DEFAULT_LOGIN_PATH};
use crate::token_storage::TokenStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Where the token is kept. Defaults to the user cache directory.
    #[serde(default)]
    pub token_path: Option<PathBuf>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Directory for log files. Defaults to the user config directory.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    catalog_api::DEFAULT_BASE_URL.to_string()
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_path: None,
            request_timeout_secs: None,
            login_path: default_login_path(),
            log_dir: None,
        }
    }
}

impl Settings {
    /// Load `config.toml` (or the file named by `CATALOG_CONFIG`) and then
    /// `CATALOG__*` environment overrides.
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CATALOG_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let settings = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            .add_source(Environment::with_prefix("CATALOG").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Load from one file only, ignoring the environment.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url is required".to_string());
        }
        if !self.base_url.starts_with("http") {
            return Err("base_url must be a valid HTTP(S) URL".to_string());
        }
        if !self.login_path.starts_with('/') {
            return Err("login_path must start with '/'".to_string());
        }
        if self.request_timeout_secs == Some(0) {
            return Err("request_timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn token_store(&self) -> Result<TokenStore, AuthError> {
        match self.token_path {
            Some(ref path) => TokenStore::init(path),
            None => TokenStore::new(),
        }
    }

    pub fn route_guard(&self) -> RouteGuard {
        RouteGuard::new(self.login_path.clone())
    }
}
