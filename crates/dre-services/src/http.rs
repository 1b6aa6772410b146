//! Shared HTTP helpers for the clients that do not go through an AWS SDK
//! (vector index and CDN).
//!
//! Centralizes status-code checks (429 rate limiting with `Retry-After`
//! parsing, non-success → [`ServiceError::Api`]) and client construction.

use std::time::Duration;

use crate::error::ServiceError;

/// Build the shared HTTP client with the configured request timeout.
pub fn build_client(timeout_secs: u64) -> Result<reqwest::Client, ServiceError> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("dre/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`ServiceError::RateLimited`] with
///   `Retry-After` header parsing (falls back to 60 s if absent or
///   unparseable).
/// - **Non-success status** → [`ServiceError::Api`] with status code and
///   response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    if resp.status() == 429 {
        return Err(ServiceError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        return Err(ServiceError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, retry_after: Option<&str>) -> reqwest::Response {
        let mut builder = ::http::Response::builder().status(status);
        if let Some(value) = retry_after {
            builder = builder.header("Retry-After", value);
        }
        reqwest::Response::from(builder.body("upstream said no").unwrap())
    }

    #[test]
    fn parse_retry_after_variants() {
        assert_eq!(parse_retry_after(&mock_response(429, Some("120"))), 120);
        assert_eq!(parse_retry_after(&mock_response(429, None)), 60);
        assert_eq!(parse_retry_after(&mock_response(429, Some("soon"))), 60);
    }

    #[tokio::test]
    async fn check_response_rate_limited() {
        let err = check_response(mock_response(429, Some("30")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::RateLimited {
                retry_after_secs: 30
            }
        ));
    }

    #[tokio::test]
    async fn check_response_api_error_keeps_body() {
        let err = check_response(mock_response(403, None)).await.unwrap_err();
        match err {
            ServiceError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "upstream said no");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn check_response_success() {
        assert!(check_response(mock_response(200, None)).await.is_ok());
    }
}
