use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::tts::{
        dto::{PurgeResponse, ReloadResponse, SynthesizeRequest, VoiceResponse},
        Locale, SupportedFormat, TtsService, TtsServiceApi,
    },
    error::{AppError, AppResult},
    infrastructure::config::TtsConfig,
};

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    /// POST /api/tts/synthesize - Convert text to speech
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        Json(request): Json<SynthesizeRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let result = controller
            .tts_service
            .synthesize(&request.text, &request.voice, &request.codec)
            .await?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/wav"));
        headers.insert("X-Sample-Rate", HeaderValue::from(result.format.sample_rate));
        headers.insert("X-Bit-Depth", HeaderValue::from(result.format.bits_per_sample));
        headers.insert("X-Channels", HeaderValue::from(result.format.channels));
        headers.insert("X-Frame-Count", HeaderValue::from(result.frames));

        Ok((StatusCode::OK, headers, Body::from(result.audio_data)))
    }

    /// GET /api/tts/voices - Voices currently offered by the backend
    pub async fn list_voices(State(controller): State<Arc<TtsController>>) -> Json<Vec<VoiceResponse>> {
        let voices = controller.tts_service.available_voices();
        Json(voices.iter().map(VoiceResponse::from).collect())
    }

    /// GET /api/tts/locales - Locales covered by at least one voice
    pub async fn list_locales(State(controller): State<Arc<TtsController>>) -> Json<Vec<String>> {
        let locales = controller.tts_service.locales();
        Json(locales.iter().map(|l| l.to_string()).collect())
    }

    /// GET /api/tts/locales/:locale/voices
    pub async fn list_voices_for_locale(
        State(controller): State<Arc<TtsController>>,
        Path(locale): Path<String>,
    ) -> Json<Vec<VoiceResponse>> {
        let voices = controller
            .tts_service
            .voices_for_locale(&Locale::parse(&locale));
        Json(voices.iter().map(VoiceResponse::from).collect())
    }

    /// GET /api/tts/formats
    pub async fn list_formats(State(controller): State<Arc<TtsController>>) -> Json<Vec<SupportedFormat>> {
        Json(controller.tts_service.supported_formats())
    }

    /// POST /api/tts/cache/purge - Drop every cached audio file
    pub async fn purge_cache(State(controller): State<Arc<TtsController>>) -> AppResult<Json<PurgeResponse>> {
        let removed = controller.tts_service.purge_cache().await?;
        Ok(Json(PurgeResponse { removed }))
    }

    /// POST /api/tts/reload - Re-read configuration from the environment and apply it
    pub async fn reload(State(controller): State<Arc<TtsController>>) -> AppResult<Json<ReloadResponse>> {
        let config = TtsConfig::from_env()
            .map_err(|e| AppError::BadRequest(format!("Invalid configuration: {}", e)))?;

        controller.tts_service.reconfigure(config).await?;

        Ok(Json(ReloadResponse {
            backend: controller.tts_service.backend_kind().to_string(),
            voice_count: controller.tts_service.available_voices().len(),
        }))
    }
}
