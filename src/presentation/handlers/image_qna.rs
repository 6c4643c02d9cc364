use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::domain::{ImagePayload, Question};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::error_response::{error_response, multipart_error_response};
use super::multipart_form::MultipartForm;

pub const IMAGE_AND_QUESTION_MESSAGE: &str = "Image and question required";

#[derive(Serialize)]
pub struct ImageQnaResponse {
    pub caption: String,
    pub answer: String,
}

/// Captions the image, then answers the question with the caption as
/// context. A failed caption still becomes the context, error text and all.
#[tracing::instrument(skip(state, multipart))]
pub async fn image_qna_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> impl IntoResponse {
    let mut form = match MultipartForm::collect(multipart).await {
        Ok(form) => form,
        Err(e) => return multipart_error_response(&e),
    };

    let (Some(file), Some(question)) = (form.take_file("image"), form.take_field("question"))
    else {
        return error_response(StatusCode::BAD_REQUEST, IMAGE_AND_QUESTION_MESSAGE);
    };

    tracing::debug!(question = %sanitize_prompt(&question), "Answering question about image");

    let image = ImagePayload::new(file.bytes, file.content_type);
    let caption = match state.caption_service.caption(&image).await {
        Ok(caption) => caption,
        Err(e) => {
            tracing::warn!(error = %e, "Captioning failed, passing error through as context");
            e.to_string()
        }
    };

    let question = Question::new(question).with_context(caption.clone());

    match state.answer_service.answer(&question).await {
        Ok(answer) => (StatusCode::OK, Json(ImageQnaResponse { caption, answer })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Image question answering failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
