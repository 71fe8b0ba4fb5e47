use super::{Method, Request, RequestData};
use crate::session::UserInfo;
use secrecy::{ExposeSecret, SecretString};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;

// Common

#[derive(Debug, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

fn expose<S>(password: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(password.expose_secret())
}

// Requests

#[derive(Debug)]
pub struct Login<'a> {
    credentials: &'a LoginCredentials,
}

impl<'a> Login<'a> {
    pub fn new(credentials: &'a LoginCredentials) -> Self {
        Self { credentials }
    }
}

impl Request for Login<'_> {
    type Data = LoginCredentials;
    type Response = LoginResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/login".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self.credentials)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Logout;

impl Request for Logout {
    type Data = ();
    type Response = IgnoredAny;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/logout".into()
    }
}

// Responses

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access_token")]
    pub token: String,
    pub user: UserInfo,
}
