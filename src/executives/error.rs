//! Error types for fetching executives.

use thiserror::Error;

/// Errors that can occur while fetching the executive list.
///
/// Every variant is eligible for automatic retry. `Display` is meant for logs;
/// the error view shows [`FetchError::user_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("server responded with {status} {reason}")]
    Status { status: u16, reason: String },

    /// No response was received (connection refused, DNS failure, reset).
    #[error("no response received: {detail}")]
    NoResponse { detail: String },

    /// The request could not be constructed (e.g. invalid URL).
    #[error("failed to build request: {detail}")]
    Request { detail: String },

    /// The transport succeeded but the body did not contain an executive list.
    #[error("unexpected response structure")]
    UnexpectedShape,

    /// Anything else.
    #[error("unexpected error: {detail}")]
    Other { detail: String },
}

impl FetchError {
    /// Message shown to the user by the error view.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Timeout => {
                "Request timed out. Please check your connection and try again.".to_string()
            }
            FetchError::Status { status, reason } => {
                format!("Server error: {} {}", status, reason).trim_end().to_string()
            }
            FetchError::NoResponse { .. } => {
                "No response from server. Please check your internet connection.".to_string()
            }
            FetchError::Request { detail } => format!("Request setup failed: {}", detail),
            FetchError::UnexpectedShape => {
                "Unexpected response structure from server.".to_string()
            }
            FetchError::Other { .. } => {
                "An unexpected error occurred. Please try again.".to_string()
            }
        }
    }

    /// Short machine-readable kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout => "timeout",
            FetchError::Status { .. } => "status",
            FetchError::NoResponse { .. } => "no_response",
            FetchError::Request { .. } => "request",
            FetchError::UnexpectedShape => "unexpected_shape",
            FetchError::Other { .. } => "other",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            }
        } else if err.is_builder() {
            FetchError::Request {
                detail: err.to_string(),
            }
        } else if err.is_connect() || err.is_request() || err.is_body() {
            FetchError::NoResponse {
                detail: err.to_string(),
            }
        } else if err.is_decode() {
            FetchError::UnexpectedShape
        } else {
            FetchError::Other {
                detail: err.to_string(),
            }
        }
    }
}
