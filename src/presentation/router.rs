use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    health_handler, image_caption_handler, image_qna_handler, qna_handler,
    speech_to_text_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let index = ServeFile::new(state.frontend_dir.join("index.html"));
    let assets = ServeDir::new(state.frontend_dir.join("static"));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/qna", post(qna_handler))
        .route("/api/image-caption", post(image_caption_handler))
        .route("/api/image-qna", post(image_qna_handler))
        .route("/api/speech-to-text", post(speech_to_text_handler))
        .route_service("/", index)
        .nest_service("/static", assets)
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
