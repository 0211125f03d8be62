use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::controllers::{health, tts::TtsController};
use crate::domain::tts::TtsService;
use crate::infrastructure::config::Config;
use crate::infrastructure::request_id::request_id_middleware;

/// Build the application router
pub fn router(tts_service: Arc<TtsService>) -> Router {
    let tts_controller = Arc::new(TtsController::new(tts_service.clone()));

    let tts_routes = Router::new()
        .route("/api/tts/synthesize", post(TtsController::synthesize))
        .route("/api/tts/voices", get(TtsController::list_voices))
        .route("/api/tts/locales", get(TtsController::list_locales))
        .route(
            "/api/tts/locales/:locale/voices",
            get(TtsController::list_voices_for_locale),
        )
        .route("/api/tts/formats", get(TtsController::list_formats))
        .route("/api/tts/cache/purge", post(TtsController::purge_cache))
        .route("/api/tts/reload", post(TtsController::reload))
        .with_state(tts_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(tts_service)
        .merge(tts_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    tts_service: Arc<TtsService>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(tts_service);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
