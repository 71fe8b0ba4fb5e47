mod error;
mod guard;
mod settings;
mod token_storage;

pub use error::AuthError;
pub use guard::{Navigation, RouteGuard, DEFAULT_LOGIN_PATH};
pub use settings::Settings;
pub use token_storage::TokenStore;
