//! Application error type mapping to HTTP status codes.
//!
//! Validation errors are 400s; retrieval failures surface as 502s.
//! Generation failures never reach this type -- the orchestrator converts
//! them into a success-shaped fallback reply, and that asymmetry is part of
//! the service contract.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use symptomix_types::error::TurnError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The request body was absent or unparsable.
    MissingBody,
    /// A turn failed with a caller-visible error.
    Turn(TurnError),
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        AppError::Turn(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingBody => {
                (StatusCode::BAD_REQUEST, "Missing request data".to_string())
            }
            AppError::Turn(TurnError::BadRequest(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Turn(err @ TurnError::Retrieval(_)) => {
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symptomix_types::retrieval::RetrievalError;

    #[test]
    fn test_missing_body_is_bad_request() {
        let response = AppError::MissingBody.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        let response =
            AppError::Turn(TurnError::BadRequest("Missing chat_id or msg".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_retrieval_failure_is_bad_gateway() {
        let err = TurnError::Retrieval(RetrievalError::Index("upstream 500".to_string()));
        let response = AppError::Turn(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
