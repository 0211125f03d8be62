use crate::domain::tts::{AudioClip, Speaker, SynthesisError, Voice};
use async_trait::async_trait;
use reqwest::{Response, StatusCode};

/// Largest audio body accepted from a backend
pub const MAX_AUDIO_BYTES: usize = 20 * 1024 * 1024;

/// Remote service turning text into speech.
/// Abstracts the underlying provider (Coqui cloud, self-hosted Coqui server)
///
/// Implementations are responsible for:
/// - Provider-specific request shapes and authentication
/// - Bounding the size of downloaded audio
/// - Mapping transport and HTTP failures onto `SynthesisError`
///
/// Text is expected to already fit the provider's length limit.
#[async_trait]
pub trait SynthesisBackend: Send + Sync {
    /// Short provider name used in logs
    fn name(&self) -> &'static str;

    /// Speakers offered by the backend, best effort
    async fn list_speakers(&self) -> Result<Vec<Speaker>, SynthesisError>;

    /// Language tags offered by the backend
    async fn list_languages(&self) -> Result<Vec<String>, SynthesisError>;

    /// Synthesize one chunk of text with the given voice
    ///
    /// # Errors
    /// `BackendUnavailable` on connection problems, `Authentication` when
    /// credentials are rejected, `BackendProtocol` on unexpected responses
    async fn synthesize_chunk(&self, text: &str, voice: &Voice) -> Result<AudioClip, SynthesisError>;
}

pub(crate) fn transport_error(err: reqwest::Error) -> SynthesisError {
    if err.is_decode() || err.is_body() {
        SynthesisError::BackendProtocol(err.to_string())
    } else {
        SynthesisError::BackendUnavailable(err.to_string())
    }
}

/// Turn a non-success status into the matching error kind
pub(crate) async fn check_status(response: Response) -> Result<Response, SynthesisError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let message = format!("{} returned {}: {}", url, status, body);

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SynthesisError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS | StatusCode::REQUEST_TIMEOUT => {
            SynthesisError::BackendUnavailable(message)
        }
        s if s.is_server_error() => SynthesisError::BackendUnavailable(message),
        _ => SynthesisError::BackendProtocol(message),
    })
}

/// Read a response body, refusing anything larger than `limit` bytes
pub(crate) async fn read_bounded(mut response: Response, limit: usize) -> Result<Vec<u8>, SynthesisError> {
    if let Some(length) = response.content_length() {
        if length > limit as u64 {
            return Err(SynthesisError::BackendProtocol(format!(
                "audio of {} bytes exceeds the {} byte limit",
                length, limit
            )));
        }
    }
    let expected = response.content_length();

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(transport_error)? {
        if body.len() + chunk.len() > limit {
            return Err(SynthesisError::BackendProtocol(format!(
                "audio exceeds the {} byte limit",
                limit
            )));
        }
        body.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected {
        if (body.len() as u64) < expected {
            return Err(SynthesisError::BackendProtocol(format!(
                "audio truncated: received {} of {} bytes",
                body.len(),
                expected
            )));
        }
    }

    Ok(body)
}
