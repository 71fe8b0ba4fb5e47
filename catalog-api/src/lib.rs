pub mod credentials;
pub mod endpoints;
pub mod envelope;
mod error;
mod macros;
pub mod repositories;
pub mod session;

pub use crate::credentials::{CredentialStore, MemoryCredentials};
pub use crate::endpoints::{
    Id, Numeric,
    auth::LoginCredentials,
    products::{Product, ProductFields},
};
pub use crate::error::{CatalogApiError, CredentialStoreError};
pub use crate::session::{Session, SessionState, UserInfo};

use endpoints::{Request as ApiRequest, RequestData};
use repositories::*;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
const JSON: &str = "application/json";

/// Catalog API client.
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    session: SessionState,
}

impl Client {
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, credentials)
    }

    /// Like [`Client::new`], with an overall per-request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialStore>,
        timeout: Duration,
    ) -> Result<Self, CatalogApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CatalogApiError::Transport)?;
        Ok(Self::with_http_client(http, base_url, credentials))
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            session: SessionState::new(credentials),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Issue a request and normalize its outcome.
    ///
    /// `Ok(None)` means the server answered successfully without a body.
    /// A 401/403 ends the session before the error is returned.
    pub async fn send<R>(&self, request: R) -> Result<Option<R::Response>, CatalogApiError>
    where
        R: ApiRequest,
    {
        let method = R::METHOD;
        let url = format!("{}{}", self.base_url, request.endpoint());
        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON);

        // Read at build time so a completed set/clear is always seen.
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        if let RequestData::Json(body) = request.data() {
            builder = builder.json(body);
        }

        debug!(method = %method, %url, "Sending request");
        let response = builder.send().await.map_err(|e| {
            warn!(method = %method, %url, error = %e, "Request failed without a response");
            CatalogApiError::Transport(e)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(CatalogApiError::Transport)?;
        debug!(method = %method, %url, status = status.as_u16(), bytes = body.len(), "Received response");

        if !status.is_success() {
            let error = CatalogApiError::from_status(status, &body);
            if error.is_unauthorized() {
                warn!(method = %method, %url, status = status.as_u16(), "Credential rejected, ending session");
                self.session.terminate();
            }
            return Err(error);
        }

        envelope::normalize(&body)
    }

    async fn fetch<R>(&self, request: R) -> Result<R::Response, CatalogApiError>
    where
        R: ApiRequest,
    {
        let endpoint = request.endpoint().into_owned();
        self.send(request).await?.ok_or_else(|| {
            CatalogApiError::MalformedResponse(format!("{} returned no body", endpoint))
        })
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogApiError> {
        self.fetch(Request::products().list()).await
    }

    pub async fn get_product(&self, id: &Id) -> Result<Product, CatalogApiError> {
        self.fetch(Request::products().get(id)).await
    }

    pub async fn create_product(&self, fields: ProductFields) -> Result<Product, CatalogApiError> {
        self.fetch(Request::products().create(fields)).await
    }

    pub async fn update_product(
        &self,
        id: &Id,
        fields: ProductFields,
    ) -> Result<Product, CatalogApiError> {
        self.fetch(Request::products().update(id, fields)).await
    }

    pub async fn delete_product(&self, id: &Id) -> Result<(), CatalogApiError> {
        self.send(Request::products().delete(id)).await.map(|_| ())
    }

    /// Log in and, on success, store the token and user in the session.
    /// On failure the session is left as it was (or cleared, for 401/403).
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<UserInfo, CatalogApiError> {
        let response = self.fetch(Request::auth().login(credentials)).await?;
        self.session.establish(&response.token, response.user.clone())?;
        Ok(response.user)
    }

    /// Log out remotely (best effort) and always end the local session.
    ///
    /// The returned result reports only the remote call; the session is
    /// cleared either way.
    pub async fn logout(&self) -> Result<(), CatalogApiError> {
        let remote = self.send(Request::auth().logout()).await.map(|_| ());
        if let Err(ref e) = remote {
            warn!(error = %e, "Remote logout failed, clearing local session anyway");
        }
        self.session.terminate();
        remote
    }
}

pub struct Request;

impl Request {
    pub fn auth() -> AuthRepository {
        AuthRepository::new()
    }

    pub fn products() -> ProductRepository {
        ProductRepository::new()
    }
}
