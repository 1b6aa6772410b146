//! Service client error types.

use thiserror::Error;

/// Errors from calls to external collaborators.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// HTTP transport error (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The service returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The response did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// An AWS SDK call failed (service error, transport, or a failed
    /// event-stream message).
    #[error("{service} error{}: {message}", code_suffix(.code.as_deref()))]
    Aws {
        service: &'static str,
        /// Modeled error code such as `ValidationException`, when known.
        code: Option<String>,
        message: String,
    },

    /// Credentials could not be resolved or the request could not be signed.
    #[error("request signing failed: {0}")]
    Signing(String),

    /// A client was used without the configuration it needs.
    #[error("{service} is not configured")]
    NotConfigured { service: &'static str },
}

fn code_suffix(code: Option<&str>) -> String {
    code.map(|c| format!(" ({c})")).unwrap_or_default()
}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}
