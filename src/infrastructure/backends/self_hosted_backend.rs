use super::synthesis_backend::{check_status, read_bounded, transport_error, SynthesisBackend, MAX_AUDIO_BYTES};
use crate::domain::tts::{AudioClip, Speaker, SynthesisError, Voice, DEFAULT_LANGUAGE_ID, DEFAULT_SPEAKER_ID};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Coqui TTS server (`tts-server`) reachable on the local network
pub struct SelfHostedBackend {
    base_url: String,
    http_client: reqwest::Client,
}

impl SelfHostedBackend {
    pub fn new(scheme: &str, hostname: &str, port: u16, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()?;
        let base_url = format!("{}://{}:{}", scheme, hostname, port);

        tracing::debug!(base_url = %base_url, "Initializing self-hosted Coqui backend");

        Ok(Self { base_url, http_client })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, SynthesisError> {
        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, endpoint))
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response)
            .await?
            .json::<T>()
            .await
            .map_err(|e| SynthesisError::BackendProtocol(format!("Failed to parse {}: {}", endpoint, e)))
    }

    fn tts_url(&self, text: &str, voice: &Voice) -> String {
        // sentinels ask the server for its own default
        let speaker_id = match voice.speaker_id() {
            DEFAULT_SPEAKER_ID => "",
            id => id,
        };
        let language_id = match voice.language_id() {
            DEFAULT_LANGUAGE_ID => "",
            id => id,
        };

        format!(
            "{}/api/tts?speaker_id={}&language_id={}&text={}",
            self.base_url,
            urlencoding::encode(speaker_id),
            urlencoding::encode(language_id),
            urlencoding::encode(text)
        )
    }
}

#[async_trait]
impl SynthesisBackend for SelfHostedBackend {
    fn name(&self) -> &'static str {
        "coqui-self-hosted"
    }

    async fn list_speakers(&self) -> Result<Vec<Speaker>, SynthesisError> {
        let names: Vec<String> = self.get_json("/api/speakers").await?;
        Ok(names.into_iter().map(|n| Speaker::new(n.clone(), n)).collect())
    }

    async fn list_languages(&self) -> Result<Vec<String>, SynthesisError> {
        self.get_json("/api/languages").await
    }

    async fn synthesize_chunk(&self, text: &str, voice: &Voice) -> Result<AudioClip, SynthesisError> {
        let response = self
            .http_client
            .get(self.tts_url(text, voice))
            .send()
            .await
            .map_err(transport_error)?;
        let bytes = read_bounded(check_status(response).await?, MAX_AUDIO_BYTES).await?;

        AudioClip::from_wav(&bytes)
    }
}
