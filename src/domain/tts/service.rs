use super::audio::{AudioClip, AudioFormat, CODEC_PCM_SIGNED, CONTAINER_WAVE};
use super::cache::ContentCache;
use super::catalog::VoiceCatalog;
use super::chunker::TextChunker;
use super::error::TtsServiceError;
use super::orchestrator::SynthesisOrchestrator;
use super::voice::{Locale, Voice};
use crate::infrastructure::backends::{build_backend, SynthesisBackend};
use crate::infrastructure::config::TtsConfig;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct TtsSynthesisResult {
    pub audio_data: Vec<u8>,
    pub format: AudioFormat,
    pub frames: u64,
    pub voice: Voice,
}

/// Output format offered to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportedFormat {
    pub container: &'static str,
    pub codec: &'static str,
    pub bit_depth: u16,
    pub frequency: u32,
}

/// Engine built from one configuration
struct Engine {
    config: TtsConfig,
    orchestrator: SynthesisOrchestrator,
}

pub struct TtsService {
    engine: ArcSwap<Engine>,
    catalog: VoiceCatalog,
    reconfigure_lock: Mutex<()>,
}

impl TtsService {
    pub async fn new(config: TtsConfig) -> Result<Self, TtsServiceError> {
        let backend = build_backend(&config.backend, config.request_timeout)?;
        Self::with_backend(config, backend).await
    }

    pub async fn with_backend(
        config: TtsConfig,
        backend: Arc<dyn SynthesisBackend>,
    ) -> Result<Self, TtsServiceError> {
        let engine = build_engine(config, backend).await?;
        let service = Self {
            engine: ArcSwap::from_pointee(engine),
            catalog: VoiceCatalog::new(),
            reconfigure_lock: Mutex::new(()),
        };
        service.activate().await;
        Ok(service)
    }

    /// Replace the engine with one built for `config` using the given backend
    pub async fn reconfigure_with_backend(
        &self,
        config: TtsConfig,
        backend: Arc<dyn SynthesisBackend>,
    ) -> Result<(), TtsServiceError> {
        let _guard = self.reconfigure_lock.lock().await;

        let engine = build_engine(config, backend).await?;
        self.engine.store(Arc::new(engine));
        self.activate().await;
        Ok(())
    }

    /// Refresh the catalog for the current engine and purge if configured to
    async fn activate(&self) {
        let engine = self.engine.load_full();

        // an unreachable backend leaves the catalog empty; the service still starts
        if let Err(e) = self.catalog.refresh(engine.orchestrator.backend().as_ref()).await {
            tracing::warn!(error = %e, "Starting with an empty voice catalog");
        }

        if engine.config.purge_cache {
            if let Err(e) = engine.orchestrator.cache().purge().await {
                tracing::warn!(error = %e, "Cache purge failed");
            }
        }
    }

    pub fn backend_kind(&self) -> &'static str {
        self.engine.load().config.backend.kind()
    }

    pub fn locales(&self) -> BTreeSet<Locale> {
        self.catalog.locales()
    }

    pub fn voices_for_locale(&self, locale: &Locale) -> Vec<Voice> {
        self.catalog.voices_for_locale(locale)
    }
}

async fn build_engine(
    config: TtsConfig,
    backend: Arc<dyn SynthesisBackend>,
) -> Result<Engine, TtsServiceError> {
    let fingerprint = config
        .fingerprint()
        .map_err(|e| TtsServiceError::Configuration(e.to_string()))?;
    let cache = ContentCache::open(config.cache_dir.clone())
        .await
        .map_err(|e| {
            TtsServiceError::Configuration(format!(
                "Cache directory {} unusable: {}",
                config.cache_dir.display(),
                e
            ))
        })?;

    tracing::info!(
        fingerprint = %fingerprint,
        cache_dir = %config.cache_dir.display(),
        chunk_max_len = config.chunk_max_len,
        max_concurrent_chunks = config.max_concurrent_chunks,
        "TTS engine configured"
    );

    let orchestrator = SynthesisOrchestrator::new(
        backend,
        Arc::new(cache),
        TextChunker::new(config.chunk_max_len),
        fingerprint,
    )
    .with_max_concurrent_chunks(config.max_concurrent_chunks);

    Ok(Engine { config, orchestrator })
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize text with a catalog voice
    ///
    /// This operation:
    /// - Rejects blank text and voices the catalog does not offer
    /// - Serves the audio from the disk cache when present
    /// - Otherwise chunks, synthesizes and stitches, then caches the result
    ///
    /// Returns WAV bytes along with the format actually produced
    async fn synthesize(
        &self,
        text: &str,
        voice_uid: &str,
        codec: &str,
    ) -> Result<TtsSynthesisResult, TtsServiceError>;

    fn available_voices(&self) -> Vec<Voice>;

    fn supported_formats(&self) -> Vec<SupportedFormat>;

    /// Delete every cached file, returning how many were removed
    async fn purge_cache(&self) -> Result<usize, TtsServiceError>;

    /// Apply a new configuration: new backend, cache location and catalog
    async fn reconfigure(&self, config: TtsConfig) -> Result<(), TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(
        &self,
        text: &str,
        voice_uid: &str,
        codec: &str,
    ) -> Result<TtsSynthesisResult, TtsServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TtsServiceError::Invalid("Text cannot be empty".to_string()));
        }

        let voice = self
            .catalog
            .find(voice_uid)
            .ok_or_else(|| TtsServiceError::UnsupportedVoice(voice_uid.to_string()))?;

        let engine = self.engine.load_full();
        let audio_data = engine.orchestrator.synthesize(text, &voice, codec).await?;
        let (format, frames) = AudioClip::probe_wav(&audio_data)?;

        Ok(TtsSynthesisResult {
            audio_data,
            format,
            frames,
            voice,
        })
    }

    fn available_voices(&self) -> Vec<Voice> {
        self.catalog.voices()
    }

    fn supported_formats(&self) -> Vec<SupportedFormat> {
        vec![SupportedFormat {
            container: CONTAINER_WAVE,
            codec: CODEC_PCM_SIGNED,
            bit_depth: 16,
            frequency: 44100,
        }]
    }

    async fn purge_cache(&self) -> Result<usize, TtsServiceError> {
        let engine = self.engine.load_full();
        engine
            .orchestrator
            .cache()
            .purge()
            .await
            .map_err(|e| TtsServiceError::Configuration(format!("Cache purge failed: {}", e)))
    }

    async fn reconfigure(&self, config: TtsConfig) -> Result<(), TtsServiceError> {
        let backend = build_backend(&config.backend, config.request_timeout)?;
        self.reconfigure_with_backend(config, backend).await
    }
}
