//! Unified error handling for the relay API.
//!
//! Handlers return [`ApiResult`] and use `?`; the error turns itself into a
//! JSON response. Upstream details are logged, never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::api::{ErrorResponse, RELAY_FAILURE_MESSAGE};
use thiserror::Error;

use crate::relay::RelayError;

/// Unified error type for API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Every upstream endpoint failed
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] RelayError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::UpstreamUnavailable(RelayError::Exhausted { attempts }) => {
                tracing::error!(
                    attempts = attempts.len(),
                    "Relay exhausted all upstream endpoints"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(RELAY_FAILURE_MESSAGE),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::{AttemptFailure, FailedAttempt};

    #[tokio::test]
    async fn test_exhausted_response_hides_upstream_details() {
        let err = ApiError::from(RelayError::Exhausted {
            attempts: vec![FailedAttempt {
                endpoint: "Admin API v2".to_string(),
                failure: AttemptFailure::Status {
                    code: 401,
                    message: Some("invalid token for internal-host".to_string()),
                },
            }],
        });

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, ErrorResponse::new(RELAY_FAILURE_MESSAGE));
        assert!(!String::from_utf8_lossy(&bytes).contains("internal-host"));
    }
}
