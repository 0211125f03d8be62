use super::error::SynthesisError;
use super::voice::{Locale, Voice};
use crate::infrastructure::backends::SynthesisBackend;
use arc_swap::ArcSwap;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Complete set of voices discovered from one backend
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    voices: Vec<Voice>,
}

impl CatalogSnapshot {
    pub fn new(voices: Vec<Voice>) -> Self {
        Self { voices }
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn find(&self, uid: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.uid() == uid)
    }

    pub fn locales(&self) -> BTreeSet<Locale> {
        self.voices.iter().map(|v| v.locale().clone()).collect()
    }

    pub fn voices_for_locale(&self, locale: &Locale) -> Vec<&Voice> {
        self.voices.iter().filter(|v| v.locale() == locale).collect()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

/// Voices offered to callers. Readers always see a whole snapshot; a refresh
/// builds the next one off to the side and swaps it in.
pub struct VoiceCatalog {
    snapshot: ArcSwap<CatalogSnapshot>,
}

impl VoiceCatalog {
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(CatalogSnapshot::default()),
        }
    }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.snapshot.load_full()
    }

    /// Rediscover voices. On failure the catalog is emptied so stale voices
    /// are not offered.
    pub async fn refresh(&self, backend: &dyn SynthesisBackend) -> Result<usize, SynthesisError> {
        match discover(backend).await {
            Ok(voices) => {
                let count = voices.len();
                self.snapshot.store(Arc::new(CatalogSnapshot::new(voices)));
                tracing::info!(provider = backend.name(), voice_count = count, "Voice catalog refreshed");
                Ok(count)
            }
            Err(e) => {
                self.clear();
                tracing::warn!(provider = backend.name(), error = %e, "Voice catalog refresh failed, catalog cleared");
                Err(e)
            }
        }
    }

    pub fn clear(&self) {
        self.snapshot.store(Arc::new(CatalogSnapshot::default()));
    }

    pub fn find(&self, uid: &str) -> Option<Voice> {
        self.snapshot.load().find(uid).cloned()
    }

    pub fn voices(&self) -> Vec<Voice> {
        self.snapshot.load().voices().to_vec()
    }

    pub fn locales(&self) -> BTreeSet<Locale> {
        self.snapshot.load().locales()
    }

    pub fn voices_for_locale(&self, locale: &Locale) -> Vec<Voice> {
        self.snapshot
            .load()
            .voices_for_locale(locale)
            .into_iter()
            .cloned()
            .collect()
    }
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// One voice per (language, speaker) pair, or the backend default voice when
/// the backend names neither.
async fn discover(backend: &dyn SynthesisBackend) -> Result<Vec<Voice>, SynthesisError> {
    let languages = backend.list_languages().await?;
    let speakers = backend.list_speakers().await?;

    let mut voices: Vec<Voice> = languages
        .iter()
        .flat_map(|language| {
            speakers.iter().map(move |speaker| {
                Voice::new(
                    Locale::parse(language),
                    speaker.label.clone(),
                    language.clone(),
                    speaker.speaker_id.clone(),
                )
            })
        })
        .collect();

    if voices.is_empty() {
        voices.push(Voice::backend_default());
    }

    Ok(voices)
}
