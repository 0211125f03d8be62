use super::audio::{AudioClip, AudioEncoding, AudioStitcher};
use super::cache::{CacheEntry, ContentCache};
use super::chunker::{TextChunk, TextChunker};
use super::error::SynthesisError;
use super::voice::Voice;
use crate::infrastructure::backends::SynthesisBackend;
use futures::{StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Instant;

/// Runs one synthesis request: cache lookup, then chunk, synthesize, stitch.
pub struct SynthesisOrchestrator {
    backend: Arc<dyn SynthesisBackend>,
    cache: Arc<ContentCache>,
    chunker: TextChunker,
    fingerprint: String,
    max_concurrent_chunks: usize,
}

impl SynthesisOrchestrator {
    pub fn new(
        backend: Arc<dyn SynthesisBackend>,
        cache: Arc<ContentCache>,
        chunker: TextChunker,
        fingerprint: String,
    ) -> Self {
        Self {
            backend,
            cache,
            chunker,
            fingerprint,
            max_concurrent_chunks: 1,
        }
    }

    /// Allow up to `limit` chunk requests in flight; output order is unaffected
    pub fn with_max_concurrent_chunks(mut self, limit: usize) -> Self {
        self.max_concurrent_chunks = limit.max(1);
        self
    }

    pub fn backend(&self) -> &Arc<dyn SynthesisBackend> {
        &self.backend
    }

    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }

    pub async fn synthesize(
        &self,
        text: &str,
        voice: &Voice,
        codec: &str,
    ) -> Result<Vec<u8>, SynthesisError> {
        let encoding = AudioEncoding::for_codec(codec)?;
        let text = text.trim();
        let entry = CacheEntry::new(&self.fingerprint, voice, text, encoding.extension());

        tracing::info!(
            voice = %voice.technical_name(),
            text_length = text.chars().count(),
            cache_key = %entry.key(),
            "TTS synthesis request"
        );

        self.cache
            .get_or_compute(&entry, || self.synthesize_uncached(text, voice))
            .await
    }

    async fn synthesize_uncached(&self, text: &str, voice: &Voice) -> Result<Vec<u8>, SynthesisError> {
        let start_time = Instant::now();
        let chunks = self.chunker.chunk(text)?;
        let chunk_count = chunks.len();

        let clips: Vec<AudioClip> = futures::stream::iter(chunks)
            .map(|chunk| self.synthesize_chunk(chunk, voice))
            .buffered(self.max_concurrent_chunks)
            .try_collect()
            .await?;

        let audio = AudioStitcher::stitch(&clips)?.to_wav()?;

        let duration = start_time.elapsed();
        tracing::info!(
            provider = self.backend.name(),
            latency_ms = duration.as_millis(),
            characters_count = text.chars().count(),
            chunk_count,
            audio_size_bytes = audio.len(),
            "TTS synthesis completed"
        );

        Ok(audio)
    }

    async fn synthesize_chunk(&self, chunk: TextChunk, voice: &Voice) -> Result<AudioClip, SynthesisError> {
        tracing::info!(
            chunk_index = chunk.index,
            chunk_size = chunk.text.chars().count(),
            "Synthesizing chunk"
        );

        let clip = self
            .backend
            .synthesize_chunk(&chunk.text, voice)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, chunk_index = chunk.index, "Chunk synthesis failed");
                e
            })?;

        tracing::debug!(
            chunk_index = chunk.index,
            frames = clip.frames(),
            "Chunk synthesized"
        );
        Ok(clip)
    }
}
