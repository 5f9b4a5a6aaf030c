//! Shared error bodies and upstream-failure mapping.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use torrtv_core::UpstreamError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub torrserver_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Map an upstream failure to a 500 body, with a hint naming the target
/// when it was unreachable.
pub fn upstream_error(
    label: &str,
    target: &str,
    err: &UpstreamError,
) -> (StatusCode, Json<ErrorResponse>) {
    let hint = err.is_unreachable().then(|| {
        format!(
            "Cannot connect to TorrServer at {}. Is TorrServer running?",
            target
        )
    });

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: label.to_string(),
            message: Some(err.to_string()),
            torrserver_url: target.to_string(),
            hash: None,
            hint,
        }),
    )
}

/// 404 body naming the missing resource and hash.
pub fn not_found(label: &str, target: &str, hash: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: label.to_string(),
            message: None,
            torrserver_url: target.to_string(),
            hash: Some(hash.to_string()),
            hint: None,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_error_carries_hint() {
        let err = UpstreamError::Connection("connection refused".to_string());
        let (status, body) = upstream_error("Failed to fetch torrents", "http://ts:8090", &err);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let hint = body.0.hint.as_deref().unwrap();
        assert!(hint.contains("http://ts:8090"));
    }

    #[test]
    fn test_status_error_has_no_hint() {
        let err = UpstreamError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        let (_, body) = upstream_error("Failed to fetch torrents", "http://ts:8090", &err);
        assert!(body.0.hint.is_none());
    }

    #[test]
    fn test_not_found_body() {
        let (status, body) = not_found("Torrent not found", "http://ts:8090", "abc123");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.0.hash.as_deref(), Some("abc123"));
    }
}
