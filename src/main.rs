use coqui_tts_service::domain::tts::TtsService;
use coqui_tts_service::infrastructure::config::{Config, LogFormat};
use coqui_tts_service::infrastructure::http::start_http_server;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Coqui TTS service on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        backend = config.tts.backend.kind(),
        cache_dir = %config.tts.cache_dir.display(),
        "TTS configuration loaded"
    );

    let tts_service = Arc::new(TtsService::new(config.tts.clone()).await?);
    let config = Arc::new(config);

    start_http_server(config, tts_service)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "coqui_tts_service=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "coqui_tts_service=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
