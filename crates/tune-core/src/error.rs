//! Failures of calls against the song backend.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    /// The body could not be decoded into the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
    /// An authorized call was attempted without an access token.
    #[error("no access token stored")]
    MissingCredential,
}

impl ApiError {
    /// Network failures, error statuses and undecodable bodies alike.
    pub fn is_network_or_server(&self) -> bool {
        !matches!(self, Self::MissingCredential)
    }

    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Status { status, .. } => {
                *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
            }
            Self::MissingCredential => true,
            _ => false,
        }
    }

    /// Build a `Status` error from an error body, preferring its JSON `message`.
    pub fn from_body(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());
        Self::Status { status, message }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
