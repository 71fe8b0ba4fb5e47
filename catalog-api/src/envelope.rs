//! Response body normalization.
//!
//! The backend is inconsistent about envelopes: some endpoints return the
//! resource itself, others wrap it as `{ "data": <resource>, ... }`. Every
//! response goes through [`normalize`] so callers never see the difference.

use crate::error::CatalogApiError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    // Tried first, so a resource that carries its own `data` attribute is
    // never mistaken for an envelope.
    Bare(T),
    // Sibling keys (pagination `links`, `meta`) are ignored.
    Wrapped { data: T },
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Bare(data) | Envelope::Wrapped { data } => data,
        }
    }
}

/// Decode a success body. An empty body (or a bare `null`) is `None`.
pub fn normalize<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, CatalogApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| CatalogApiError::MalformedResponse(format!("body is not JSON: {}", e)))?;
    if value.is_null() {
        return Ok(None);
    }

    serde_json::from_value::<Envelope<T>>(value)
        .map(|envelope| Some(envelope.into_inner()))
        .map_err(|_| {
            CatalogApiError::MalformedResponse(format!(
                "expected {} or {{\"data\": ...}}",
                short_type_name::<T>()
            ))
        })
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
