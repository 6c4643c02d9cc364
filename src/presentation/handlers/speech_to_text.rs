use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::domain::AudioPayload;
use crate::presentation::state::AppState;

use super::error_response::{error_response, multipart_error_response};
use super::multipart_form::MultipartForm;

pub const NO_AUDIO_MESSAGE: &str = "No audio file provided";
pub const NO_SELECTED_FILE_MESSAGE: &str = "No selected file";

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub text: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn speech_to_text_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> impl IntoResponse {
    let mut form = match MultipartForm::collect(multipart).await {
        Ok(form) => form,
        Err(e) => return multipart_error_response(&e),
    };

    let Some(file) = form.take_file("audio") else {
        return error_response(StatusCode::BAD_REQUEST, NO_AUDIO_MESSAGE);
    };

    if file.filename.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, NO_SELECTED_FILE_MESSAGE);
    }

    tracing::debug!(
        filename = %file.filename,
        content_type = ?file.content_type,
        bytes = file.bytes.len(),
        "Transcribing upload"
    );

    let audio = AudioPayload::new(file.bytes, Some(file.filename));

    match state.transcription_service.transcribe(&audio).await {
        Ok(text) => {
            tracing::info!(chars = text.len(), "Transcription completed");
            (StatusCode::OK, Json(TranscriptResponse { text })).into_response()
        }
        Err(e) if e.is_soft_failure() => {
            tracing::warn!(error = %e, "Transcription unsuccessful");
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Transcription failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
