pub mod audio;
pub mod cache;
pub mod catalog;
pub mod chunker;
pub mod dto;
pub mod error;
pub mod orchestrator;
pub mod service;
pub mod voice;

pub use audio::{AudioClip, AudioEncoding, AudioFormat, AudioStitcher, SampleKind, CODEC_PCM_SIGNED, CONTAINER_WAVE};
pub use cache::{CacheEntry, CacheKey, ContentCache};
pub use catalog::{CatalogSnapshot, VoiceCatalog};
pub use chunker::{PunctuationBoundary, SentenceBoundary, TextChunk, TextChunker, DEFAULT_CHUNK_MAX_LEN};
pub use error::{SynthesisError, TtsServiceError};
pub use orchestrator::SynthesisOrchestrator;
pub use service::{SupportedFormat, TtsService, TtsServiceApi, TtsSynthesisResult};
pub use voice::{Locale, Speaker, Voice, DEFAULT_LANGUAGE_ID, DEFAULT_SPEAKER_ID, VOICE_UID_PREFIX};
