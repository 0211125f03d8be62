use super::error::SynthesisError;
use super::voice::Voice;
use moka::future::Cache;
use sha2::{Digest, Sha256};
use std::fmt;
use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

/// Upper bound of distinct cache entries being computed at the same time
const MAX_IN_FLIGHT: u64 = 1024;

/// 128-bit content address: the first 16 bytes of SHA-256 over the
/// configuration fingerprint, the voice technical name and the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 16]);

impl CacheKey {
    pub fn derive(fingerprint: &str, technical_name: &str, text: &str) -> Self {
        let mut hasher = Sha256::new();
        for part in [fingerprint, technical_name, text] {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        let digest = hasher.finalize();

        let mut key = [0u8; 16];
        key.copy_from_slice(&digest[..16]);
        Self(key)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Addressing and sidecar metadata for one synthesized text
#[derive(Debug, Clone)]
pub struct CacheEntry {
    key: CacheKey,
    fingerprint: String,
    voice_name: String,
    text: String,
    extension: &'static str,
}

impl CacheEntry {
    pub fn new(fingerprint: &str, voice: &Voice, text: &str, extension: &'static str) -> Self {
        Self {
            key: CacheKey::derive(fingerprint, voice.technical_name(), text),
            fingerprint: fingerprint.to_string(),
            voice_name: voice.technical_name().to_string(),
            text: text.to_string(),
            extension,
        }
    }

    pub fn key(&self) -> CacheKey {
        self.key
    }

    /// `<technicalName>_<keyHex>`
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.voice_name, self.key)
    }

    pub fn audio_file_name(&self) -> String {
        format!("{}.{}", self.file_stem(), self.extension)
    }

    pub fn sidecar_file_name(&self) -> String {
        format!("{}.txt", self.file_stem())
    }

    fn sidecar_contents(&self) -> String {
        format!(
            "Config: {},voice={}\nText: {}\n",
            self.fingerprint, self.voice_name, self.text
        )
    }
}

/// Content-addressed audio store on disk.
///
/// Concurrent requests for the same entry are coalesced: the first caller runs
/// the computation and the others wait for its outcome.
pub struct ContentCache {
    dir: PathBuf,
    in_flight: Cache<String, Arc<Vec<u8>>>,
}

impl ContentCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            in_flight: Cache::builder().max_capacity(MAX_IN_FLIGHT).build(),
        }
    }

    /// Create the cache directory if it does not exist yet
    pub async fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let cache = Self::new(dir);
        tokio::fs::create_dir_all(&cache.dir).await?;
        tracing::debug!(cache_dir = %cache.dir.display(), "Using cache folder");
        Ok(cache)
    }

    pub async fn get_or_compute<F, Fut>(
        &self,
        entry: &CacheEntry,
        compute: F,
    ) -> Result<Vec<u8>, SynthesisError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>, SynthesisError>>,
    {
        let stem = entry.file_stem();
        let result = self
            .in_flight
            .try_get_with(stem.clone(), async {
                self.load_or_compute(entry, compute).await.map(Arc::new)
            })
            .await;
        // the disk copy is authoritative, memory only bridges concurrent waiters
        self.in_flight.invalidate(&stem).await;

        result
            .map(|audio| audio.as_ref().clone())
            .map_err(|e| e.as_ref().clone())
    }

    async fn load_or_compute<F, Fut>(
        &self,
        entry: &CacheEntry,
        compute: F,
    ) -> Result<Vec<u8>, SynthesisError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>, SynthesisError>>,
    {
        let audio_path = self.dir.join(entry.audio_file_name());

        match tokio::fs::read(&audio_path).await {
            Ok(audio) => {
                tracing::debug!(
                    file = %entry.audio_file_name(),
                    audio_size = audio.len(),
                    "Audio file was found in cache"
                );
                return Ok(audio);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(file = %entry.audio_file_name(), "Cache miss");
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    file = %entry.audio_file_name(),
                    "Could not read cached audio, synthesizing again"
                );
            }
        }

        let audio = compute().await?;

        if let Err(e) = self.persist(entry, &audio).await {
            tracing::warn!(
                error = %e,
                file = %entry.audio_file_name(),
                "Could not write audio to cache"
            );
        }

        Ok(audio)
    }

    async fn persist(&self, entry: &CacheEntry, audio: &[u8]) -> std::io::Result<()> {
        let audio_path = self.dir.join(entry.audio_file_name());
        let partial_path = self.dir.join(format!("{}.part", entry.audio_file_name()));

        tracing::debug!(file = %entry.audio_file_name(), "Caching audio file");
        tokio::fs::write(&partial_path, audio).await?;
        tokio::fs::rename(&partial_path, &audio_path).await?;

        tracing::debug!(file = %entry.sidecar_file_name(), "Caching text file");
        tokio::fs::write(
            self.dir.join(entry.sidecar_file_name()),
            entry.sidecar_contents(),
        )
        .await
    }

    /// Delete every file in the cache directory, returning how many were removed
    pub async fn purge(&self) -> std::io::Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut removed = 0;
        while let Some(dir_entry) = entries.next_entry().await? {
            if dir_entry.file_type().await?.is_file() {
                tokio::fs::remove_file(dir_entry.path()).await?;
                removed += 1;
            }
        }
        self.in_flight.invalidate_all();

        tracing::info!(cache_dir = %self.dir.display(), removed, "Cache purged");
        Ok(removed)
    }
}
