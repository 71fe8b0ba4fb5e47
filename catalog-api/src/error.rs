use reqwest::StatusCode;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Every way a catalog call can fail.
///
/// The set is closed: callers match on the kind instead of poking at
/// response bodies.
#[derive(Error, Debug)]
pub enum CatalogApiError {
    /// The server refused the input (any 4xx other than 401/403/404).
    #[error("Request rejected ({status}): {}", describe(.message))]
    ValidationRejected {
        status: StatusCode,
        message: Option<String>,
        /// Per-field messages, when the server reports them.
        errors: BTreeMap<String, Vec<String>>,
    },

    /// 401 or 403. The session has already been cleared when this is returned.
    #[error("Unauthorized ({status}): {}", describe(.message))]
    Unauthorized {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Not found: {}", describe(.message))]
    NotFound { message: Option<String> },

    #[error("Server error ({status}): {}", describe(.message))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    /// No response was received at all.
    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    CredentialStorage(#[from] CredentialStoreError),
}

fn describe(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("no details given")
}

impl CatalogApiError {
    /// Classify a non-success response from its status and raw body.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let detail = ErrorBody::parse(body);
        match status.as_u16() {
            401 | 403 => CatalogApiError::Unauthorized {
                status,
                message: detail.message,
            },
            404 => CatalogApiError::NotFound {
                message: detail.message,
            },
            400..=499 => CatalogApiError::ValidationRejected {
                status,
                message: detail.message,
                errors: detail.errors,
            },
            _ => CatalogApiError::Server {
                status,
                message: detail.message,
            },
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::ValidationRejected { status, .. }
            | Self::Unauthorized { status, .. }
            | Self::Server { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Self::Transport(e) => e.status(),
            Self::MalformedResponse(_) | Self::CredentialStorage(_) => None,
        }
    }

    /// Server-supplied message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::ValidationRejected { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::NotFound { message }
            | Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether repeating the same call unchanged might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Server { .. })
    }
}

/// Error body as sent by the backend: `{ "message": ..., "errors": { field: [..] } }`.
/// Some endpoints use `error` instead of `message`.
#[derive(Debug, Default)]
struct ErrorBody {
    message: Option<String>,
    errors: BTreeMap<String, Vec<String>>,
}

impl ErrorBody {
    fn parse(body: &[u8]) -> Self {
        let Ok(value) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };

        let message = ["message", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(ToString::to_string);

        let errors = value
            .get("errors")
            .and_then(Value::as_object)
            .map(|fields| {
                fields
                    .iter()
                    .map(|(field, messages)| (field.clone(), field_messages(messages)))
                    .collect()
            })
            .unwrap_or_default();

        Self { message, errors }
    }
}

fn field_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(ToString::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// A credential store could not persist or remove a token.
#[derive(Error, Debug)]
#[error("Credential storage error: {0}")]
pub struct CredentialStoreError(String);

impl CredentialStoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
