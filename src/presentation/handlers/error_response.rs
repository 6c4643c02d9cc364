use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Maps a multipart read failure onto the status axum assigns it, so an
/// oversized upload answers 413 rather than 400.
pub fn multipart_error_response(e: &MultipartError) -> Response {
    let status = e.status();
    if status.is_client_error() {
        tracing::warn!(error = %e, status = %status, "Failed to read multipart");
    } else {
        tracing::error!(error = %e, status = %status, "Failed to read multipart");
    }
    error_response(status, format!("Failed to read multipart: {}", e.body_text()))
}
