use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::tts::{TtsService, TtsServiceApi};

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready once the backend has offered at least one voice
pub async fn health_ready(State(tts_service): State<Arc<TtsService>>) -> impl IntoResponse {
    let voice_count = tts_service.available_voices().len();
    let backend = tts_service.backend_kind();

    if voice_count > 0 {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "backend": backend,
                "voices": voice_count
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "backend": backend,
                "voices": 0
            })),
        )
    }
}
