use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API base URL is not configured")]
    MissingBaseUrl,

    #[error("Authentication required - no refresh token available")]
    AuthRequired,

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("{message}")]
    Request { message: String, status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

/// Default message when the error body carries none
const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

/// Error body shape the backend uses for non-2xx responses.
/// Parsed best-effort; anything unparseable falls back to the default.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Build a request error from a non-2xx response body.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        ApiError::Request {
            message: parsed
                .message
                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
            status: status.as_u16(),
        }
    }

    /// Status code for request errors, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}
