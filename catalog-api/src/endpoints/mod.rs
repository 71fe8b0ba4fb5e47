pub mod auth;
pub mod products;

pub use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt::Display;
use std::str::FromStr;

/// A single catalog API call: where it goes, how, and what comes back.
pub trait Request {
    type Data: Serialize;
    type Response: DeserializeOwned;
    const METHOD: Method = Method::GET;

    /// Path relative to the API base URL, starting with `/`.
    fn endpoint(&self) -> Cow<'_, str>;

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Empty
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequestData<T> {
    Json(T),
    Empty,
}

/// Server-assigned identifier. Kept in whichever shape the server used,
/// numeric or textual, and never empty.
#[derive(Debug, Clone)]
pub enum Id {
    Number(u64),
    Text(String),
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => n.fmt(f),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// `42` and `"42"` name the same resource.
impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl Eq for Id {}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl FromStr for Id {
    type Err = EmptyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmptyIdError);
        }
        Ok(Self::Text(s.to_string()))
    }
}

impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Number(n) => serializer.serialize_u64(*n),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self::Number(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyIdError;

impl Display for EmptyIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("identifier must not be empty")
    }
}

impl std::error::Error for EmptyIdError {}

/// A numeric form value as the user supplied it.
///
/// Text that reads as a number goes on the wire as a JSON number; any other
/// text is sent as-is and left for the server to judge.
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    Number(serde_json::Number),
    Text(String),
}

impl Numeric {
    /// The JSON number this value is sent as, if it has one.
    pub fn as_number(&self) -> Option<serde_json::Number> {
        match self {
            Self::Number(n) => Some(n.clone()),
            Self::Text(text) => coerce(text),
        }
    }
}

fn coerce(text: &str) -> Option<serde_json::Number> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Some(n.into());
    }
    text.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
}

impl Serialize for Numeric {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match (self.as_number(), self) {
            (Some(n), _) => n.serialize(serializer),
            (None, Self::Text(text)) => serializer.serialize_str(text),
            (None, Self::Number(n)) => n.serialize(serializer),
        }
    }
}

impl Display for Numeric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => n.fmt(f),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for Numeric {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for Numeric {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(Self::Number)
            .unwrap_or_else(|| Self::Text(value.to_string()))
    }
}

impl From<&str> for Numeric {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Numeric {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
