use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::domain::Question;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::error_response::error_response;

pub const NO_QUESTION_MESSAGE: &str = "No question provided";

#[derive(Debug, Deserialize)]
pub struct QnaRequest {
    pub question: Option<String>,
    pub context: Option<String>,
}

#[derive(Serialize)]
pub struct QnaResponse {
    pub answer: String,
}

#[tracing::instrument(skip(state, payload))]
pub async fn qna_handler(
    State(state): State<AppState>,
    payload: Result<Json<QnaRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected question body");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let text = match request.question.filter(|q| !q.is_empty()) {
        Some(text) => text,
        None => return error_response(StatusCode::BAD_REQUEST, NO_QUESTION_MESSAGE),
    };

    tracing::debug!(question = %sanitize_prompt(&text), "Answering question");

    let mut question = Question::new(text);
    if let Some(context) = request.context {
        question = question.with_context(context);
    }

    match state.answer_service.answer(&question).await {
        Ok(answer) => (StatusCode::OK, Json(QnaResponse { answer })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Question answering failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
