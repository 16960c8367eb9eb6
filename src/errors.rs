use axum::{
    extract::multipart::MultipartError,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};

use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("request to the commerce service failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("commerce service answered with status {0}")]
    UpstreamStatus(StatusCode),

    #[error("could not decode a commerce service response: {0}")]
    UpstreamDecode(String),

    #[error("resource not found")]
    NotFound,

    #[error("invalid input: {0}")]
    UnprocessableEntity(String),

    #[error("internal server error: {0}")]
    InternalServerError(String),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Upstream(err) => {
                tracing::error!("Upstream request error: {:?}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    "The commerce service could not be reached.".to_string(),
                )
            }
            AppError::UpstreamStatus(upstream_status) => {
                tracing::error!("Upstream returned status {}", upstream_status);
                (
                    StatusCode::BAD_GATEWAY,
                    format!("The commerce service answered with {}.", upstream_status),
                )
            }
            AppError::UpstreamDecode(message) => {
                tracing::error!("Upstream decode error: {}", message);
                (
                    StatusCode::BAD_GATEWAY,
                    "The commerce service sent an unreadable response.".to_string(),
                )
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "Resource not found.".to_string()),
            AppError::UnprocessableEntity(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::InternalServerError(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        // Errors reach the browser as a toast; the swap is suppressed so the
        // fragment that triggered the request stays on screen.
        let mut headers = HeaderMap::new();
        headers.insert("HX-Reswap", HeaderValue::from_static("none"));
        let trigger_payload = json!({
            "showMessage": { "message": error_message, "type": "error" }
        });
        if let Ok(val) = HeaderValue::from_str(&trigger_payload.to_string()) {
            headers.insert("HX-Trigger", val);
        }

        let body = Json(json!({ "error": error_message }));
        (status, headers, body).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        tracing::error!("Multipart processing error: {:?}", err);
        AppError::UnprocessableEntity(format!("Error processing form data: {}", err))
    }
}
