use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use gatepass_bot::BotError;
use gatepass_types::api::ErrorResponse;

/// Error taxonomy for the review service.
///
/// Store read/write failures are deliberately absent: the record store logs
/// and swallows them, so they never reach a handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required input is missing or empty. Nothing was mutated.
    #[error("{0}")]
    Validation(String),

    #[error("submission not found")]
    NotFound,

    #[error("invalid credentials")]
    Unauthorized,

    /// Another review action holds the per-id guard for this submission.
    #[error("submission is already under review")]
    ReviewInProgress,

    /// An outbound bot call failed.
    #[error(transparent)]
    Upstream(#[from] BotError),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Full detail goes to the log; the browser gets a generic body.
        let (status, message) = match &self {
            ApiError::Validation(msg) => {
                warn!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "submission not found".to_string()),
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "invalid credentials".to_string())
            }
            ApiError::ReviewInProgress => (
                StatusCode::CONFLICT,
                "submission is already under review".to_string(),
            ),
            ApiError::Upstream(e) => {
                error!("Upstream bot call failed: {}", e);
                (StatusCode::BAD_GATEWAY, "upstream service error".to_string())
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
