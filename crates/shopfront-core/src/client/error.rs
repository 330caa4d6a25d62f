use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::auth::AuthError;

/// Errors returned by the API client and the typed services built on it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {status} body: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to deserialize response: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Error envelope the backend uses for failure bodies.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    /// Best human-readable message for display, preferring the backend's
    /// `message`/`error` fields when the failure body carries them.
    pub fn message(&self, fallback: &str) -> String {
        let body = match self {
            ApiError::Status { body, .. } => Some(body.as_str()),
            ApiError::Auth(AuthError::TokenEndpoint { body, .. }) => Some(body.as_str()),
            _ => None,
        };
        if let Some(body) = body {
            if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
                if let Some(message) = parsed.message.filter(|m| !m.trim().is_empty()) {
                    return message;
                }
                if let Some(error) = parsed.error.filter(|e| !e.trim().is_empty()) {
                    return error;
                }
            }
        }
        fallback.to_owned()
    }

    /// Status code of the failing response, when the error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Auth(AuthError::TokenEndpoint { status, .. }) => Some(*status),
            _ => None,
        }
    }
}
