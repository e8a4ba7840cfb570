use crate::repositories::RepositoryError;
use crate::services::RegistrationServiceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

pub const INVALID_BODY_MESSAGE: &str = "Invalid request body.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl From<RegistrationServiceError> for AppError {
    fn from(err: RegistrationServiceError) -> Self {
        match err {
            RegistrationServiceError::Validation(e) => AppError::Validation(e.to_string()),
            RegistrationServiceError::RepositoryError(e) => AppError::Storage(e),
        }
    }
}

/// Failures render as `{ "success": false, "message": ... }`.
///
/// Storage detail is logged here and never sent to the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => {
                tracing::debug!("Rejected submission: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::MalformedBody(detail) => {
                tracing::debug!("Rejected request body: {}", detail);
                (StatusCode::BAD_REQUEST, INVALID_BODY_MESSAGE.to_string())
            }
            AppError::Storage(e) => {
                tracing::error!("DB insert error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}
