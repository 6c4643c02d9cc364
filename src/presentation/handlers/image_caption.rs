//! `POST /api/image-caption`.
//!
//! Failures are reported with an error status instead of the older
//! behaviour of answering 200 with the error text as the caption: an
//! undecodable upload is 400 and a captioner failure is 500. Both bodies
//! still carry the `Error generating caption: ...` message.

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::services::CaptionError;
use crate::domain::ImagePayload;
use crate::presentation::state::AppState;

use super::error_response::{error_response, multipart_error_response};
use super::multipart_form::MultipartForm;

pub const NO_IMAGE_MESSAGE: &str = "No image file provided";

#[derive(Serialize)]
pub struct CaptionResponse {
    pub caption: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn image_caption_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> impl IntoResponse {
    let mut form = match MultipartForm::collect(multipart).await {
        Ok(form) => form,
        Err(e) => return multipart_error_response(&e),
    };

    let Some(file) = form.take_file("image") else {
        return error_response(StatusCode::BAD_REQUEST, NO_IMAGE_MESSAGE);
    };

    let image = ImagePayload::new(file.bytes, file.content_type);

    match state.caption_service.caption(&image).await {
        Ok(caption) => {
            tracing::info!(chars = caption.len(), "Caption generated");
            (StatusCode::OK, Json(CaptionResponse { caption })).into_response()
        }
        Err(e @ CaptionError::Decode(_)) => {
            tracing::warn!(error = %e, filename = %file.filename, "Uploaded image rejected");
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e @ CaptionError::Inference(_)) => {
            tracing::error!(error = %e, "Captioning failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
