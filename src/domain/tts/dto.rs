use super::audio::CODEC_PCM_SIGNED;
use super::voice::Voice;
use serde::{Deserialize, Serialize};

/// Request for POST /api/tts/synthesize
#[derive(Debug, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    /// Voice UID as listed by GET /api/tts/voices
    pub voice: String,
    #[serde(default = "default_codec")]
    pub codec: String,
}

fn default_codec() -> String {
    CODEC_PCM_SIGNED.to_string()
}

/// One entry of GET /api/tts/voices
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct VoiceResponse {
    pub uid: String,
    pub label: String,
    pub locale: String,
    pub language_id: String,
    pub speaker_id: String,
}

impl From<&Voice> for VoiceResponse {
    fn from(voice: &Voice) -> Self {
        Self {
            uid: voice.uid(),
            label: voice.label(),
            locale: voice.locale().to_string(),
            language_id: voice.language_id().to_string(),
            speaker_id: voice.speaker_id().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PurgeResponse {
    pub removed: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub backend: String,
    pub voice_count: usize,
}
