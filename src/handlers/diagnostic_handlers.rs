use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// `GET /test-db`: report the active backend and its clock.
pub async fn test_db(State(app_state): State<AppState>) -> Response {
    match app_state.registration_service.backend_status().await {
        Ok(status) => Json(status).into_response(),
        Err(e) => {
            tracing::error!("Database check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Database unavailable" })),
            )
                .into_response()
        }
    }
}
