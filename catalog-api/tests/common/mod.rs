//! In-process fake catalog backend for exercising the client over real HTTP.

#![allow(dead_code)]

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use catalog_api::{Client, CredentialStore};

#[derive(Debug, Clone)]
pub enum Reply {
    Json(StatusCode, Value),
    Raw(StatusCode, &'static str),
    Empty(StatusCode),
}

/// What the backend saw for one request.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
struct Backend {
    replies: Arc<Mutex<HashMap<(Method, String), Reply>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct FakeBackend {
    pub base_url: String,
    backend: Backend,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let backend = Backend::default();
        let app = Router::new().fallback(handle).with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend stopped");
        });

        Self {
            base_url: format!("http://{}/api", addr),
            backend,
        }
    }

    /// Script the reply for `method path`, where path is relative to `/api`.
    pub fn on(&self, method: Method, path: &str, reply: Reply) {
        self.backend
            .replies
            .lock()
            .unwrap()
            .insert((method, path.to_string()), reply);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.backend.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request reached the backend")
    }

    pub fn client(&self, credentials: Arc<dyn CredentialStore>) -> Client {
        Client::with_http_client(http_client(), self.base_url.clone(), credentials)
    }
}

/// HTTP client that ignores proxy settings from the environment.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build http client")
}

async fn handle(
    State(backend): State<Backend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix("/api")
        .unwrap_or(uri.path())
        .to_string();
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    backend.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        accept: header_text(header::ACCEPT),
        body: serde_json::from_slice(&body).ok(),
    });

    let reply = backend
        .replies
        .lock()
        .unwrap()
        .get(&(method, path))
        .cloned()
        .unwrap_or(Reply::Json(
            StatusCode::NOT_FOUND,
            serde_json::json!({"message": "No route"}),
        ));

    match reply {
        Reply::Json(status, value) => (status, axum::Json(value)).into_response(),
        Reply::Raw(status, text) => (status, text).into_response(),
        Reply::Empty(status) => status.into_response(),
    }
}
