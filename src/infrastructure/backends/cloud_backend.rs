use super::dto::{CreateSampleRequest, ListVoicesResponse, SampleResponse};
use super::synthesis_backend::{check_status, read_bounded, transport_error, SynthesisBackend, MAX_AUDIO_BYTES};
use crate::domain::tts::{AudioClip, Speaker, SynthesisError, Voice};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_CLOUD_BASE_URL: &str = "https://app.coqui.ai";

// Custom voices created by the account owner
const VOICES_ENDPOINT: &str = "/api/v2/voices";
// Built-in voices
const SPEAKERS_ENDPOINT: &str = "/api/v2/speakers";
const SAMPLES_ENDPOINT: &str = "/api/v2/samples";

const PAGE_SIZE: u32 = 100;
const MAX_PAGES: u32 = 10;
const SAMPLE_NAME: &str = "Created by coqui-tts-service";
const NEUTRAL_EMOTION: &str = "Neutral";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Coqui Studio cloud API: create a sample, then download its audio
pub struct CloudBackend {
    base_url: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl CloudBackend {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()?;

        tracing::debug!(base_url = %base_url, "Initializing Coqui cloud backend");

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http_client,
        })
    }

    async fn fetch_page(&self, endpoint: &str, page: u32) -> Result<ListVoicesResponse, SynthesisError> {
        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, endpoint))
            .query(&[("page", page), ("per_page", PAGE_SIZE)])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response)
            .await?
            .json::<ListVoicesResponse>()
            .await
            .map_err(|e| SynthesisError::BackendProtocol(format!("Failed to parse voice page: {}", e)))
    }

    /// Walk the pages of one listing. Any page failure ends the walk with what
    /// was collected so far.
    async fn list_paged(&self, endpoint: &str, label_suffix: &str) -> Vec<Speaker> {
        let mut speakers = Vec::new();

        for page in 1..=MAX_PAGES {
            let response = match self.fetch_page(endpoint, page).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(endpoint, page, error = %e, "Voice listing stopped early");
                    break;
                }
            };

            speakers.extend(
                response
                    .result
                    .into_iter()
                    .map(|v| Speaker::new(format!("{}{}", v.name, label_suffix), v.id)),
            );

            if !response.has_next {
                break;
            }
        }

        speakers
    }

    async fn create_sample(&self, text: &str, voice: &Voice) -> Result<SampleResponse, SynthesisError> {
        let request = CreateSampleRequest {
            voice_id: voice.speaker_id(),
            emotion: NEUTRAL_EMOTION,
            name: SAMPLE_NAME,
            text,
            speed: 1.0,
        };

        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, SAMPLES_ENDPOINT))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response)
            .await?
            .json::<SampleResponse>()
            .await
            .map_err(|e| SynthesisError::BackendProtocol(format!("Failed to parse sample response: {}", e)))
    }
}

#[async_trait]
impl SynthesisBackend for CloudBackend {
    fn name(&self) -> &'static str {
        "coqui-cloud"
    }

    async fn list_speakers(&self) -> Result<Vec<Speaker>, SynthesisError> {
        let mut speakers = self.list_paged(VOICES_ENDPOINT, " (Custom)").await;
        speakers.extend(self.list_paged(SPEAKERS_ENDPOINT, "").await);

        tracing::debug!(count = speakers.len(), "Cloud speakers listed");
        Ok(speakers)
    }

    async fn list_languages(&self) -> Result<Vec<String>, SynthesisError> {
        Ok(vec!["en".to_string()])
    }

    async fn synthesize_chunk(&self, text: &str, voice: &Voice) -> Result<AudioClip, SynthesisError> {
        let sample = self.create_sample(text, voice).await?;

        tracing::debug!(sample_id = %sample.id, audio_url = %sample.audio_url, "Downloading sample audio");

        let response = self
            .http_client
            .get(&sample.audio_url)
            .send()
            .await
            .map_err(transport_error)?;
        let bytes = read_bounded(check_status(response).await?, MAX_AUDIO_BYTES).await?;

        AudioClip::from_wav(&bytes)
    }
}
