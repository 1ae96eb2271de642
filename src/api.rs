//! API client seam.
//!
//! Views depend on [`AuthApi`] only; [`HttpApi`] is the reqwest-backed
//! implementation used by the browser bundle.
//!
//! | call               | endpoint                 | body                             |
//! |--------------------|--------------------------|----------------------------------|
//! | `login`            | `POST /auth/login`       | `{email, password}`              |
//! | `oauth_google`     | `POST /auth/google`      | `{idToken}`                      |
//! | `register`         | `POST /auth/register`    | `{email, displayName, password}` |
//! | `verify_login_2fa` | `POST /auth/login/2fa`   | `{email, code}`                  |

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::debug::{self, cat};
use crate::types::{AuthResponse, Credentials, GoogleToken, Registration, TwoFactorLogin};

/// A failed API call, carrying a message fit for the user.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The server wants a second factor before issuing a session.
    pub fn requires_second_factor(&self) -> bool {
        self.message.to_ascii_lowercase().contains("2fa")
    }
}

#[async_trait(?Send)]
pub trait AuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;
    async fn oauth_google(&self, id_token: &str) -> Result<AuthResponse, ApiError>;
    async fn register(&self, registration: &Registration) -> Result<(), ApiError>;
    async fn verify_login_2fa(&self, email: &str, code: &str) -> Result<AuthResponse, ApiError>;
}

/// Error bodies the backend sends: `{ "message": ... }` or `{ "error": ... }`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug::log(cat::API, format!("POST {url}"));
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::new(format!("Network error: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::new(format!("Network error: {e}")))?;
        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &text));
        }
        let body = if text.trim().is_empty() { "null" } else { &text };
        serde_json::from_str(body).map_err(|e| {
            log::warn!("[api] unexpected response from {url}: {e}");
            ApiError::new("Unexpected response from server")
        })
    }
}

/// Turn a non-2xx body into the message shown to the user.
pub fn error_from_body(status: u16, body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {status}"));
    ApiError::new(message)
}

#[async_trait(?Send)]
impl AuthApi for HttpApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.post("/auth/login", credentials).await
    }

    async fn oauth_google(&self, id_token: &str) -> Result<AuthResponse, ApiError> {
        self.post("/auth/google", &GoogleToken { id_token }).await
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post("/auth/register", registration).await?;
        Ok(())
    }

    async fn verify_login_2fa(&self, email: &str, code: &str) -> Result<AuthResponse, ApiError> {
        self.post("/auth/login/2fa", &TwoFactorLogin { email, code })
            .await
    }
}
