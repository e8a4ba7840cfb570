use crate::error::{AppError, Result};
use crate::models::SubmissionRequest;
use crate::AppState;
use axum::{
    extract::{FromRequest, Request, State},
    http::{header, HeaderMap},
    response::Json,
    Form,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Form submitted successfully!";

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

/// `POST /submit`: validate and store one registration.
///
/// Accepts a JSON object or an urlencoded form post. Client-side checks are
/// never trusted; every required field and the consent flag are checked
/// again here before anything is written.
pub async fn submit_registration(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    request: Request,
) -> Result<Json<SubmitResponse>> {
    let is_form = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);

    let fields = if is_form {
        let Form(form) = Form::<HashMap<String, String>>::from_request(request, &())
            .await
            .map_err(|rejection| AppError::MalformedBody(rejection.body_text()))?;
        form.into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect()
    } else {
        // Arrays and scalars are refused here, before field mapping
        let Json(object) = Json::<Map<String, Value>>::from_request(request, &())
            .await
            .map_err(|rejection| AppError::MalformedBody(rejection.body_text()))?;
        object
    };

    let submission: SubmissionRequest = serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::MalformedBody(e.to_string()))?;

    let id = app_state.registration_service.submit(submission).await?;

    Ok(Json(SubmitResponse {
        success: true,
        message: SUBMIT_SUCCESS_MESSAGE.to_string(),
        id: Some(id),
    }))
}
