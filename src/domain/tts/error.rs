use crate::error::AppError;

/// Failure kinds of the synthesis pipeline.
///
/// `Clone` so that concurrent waiters on one cache entry can each receive
/// the error produced by the request that did the work.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    #[error("sentence of {length} characters does not fit the chunk limit of {limit}")]
    ChunkTooLong { length: usize, limit: usize },
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("backend rejected credentials: {0}")]
    Authentication(String),
    #[error("unexpected backend response: {0}")]
    BackendProtocol(String),
    #[error("audio format mismatch: {0}")]
    FormatMismatch(String),
    #[error("audio codec {0} is not supported")]
    UnsupportedCodec(String),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TtsServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("voice {0} is unsupported or the service is not initialized")]
    UnsupportedVoice(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TtsServiceError::UnsupportedVoice(_) => AppError::BadRequest(err.to_string()),
            TtsServiceError::Configuration(msg) => AppError::Internal(msg),
            TtsServiceError::Synthesis(e) => match e {
                SynthesisError::ChunkTooLong { .. } => AppError::PayloadTooLarge(e.to_string()),
                SynthesisError::UnsupportedCodec(_) => AppError::UnsupportedMediaType(e.to_string()),
                SynthesisError::BackendUnavailable(_) => AppError::ServiceUnavailable(e.to_string()),
                SynthesisError::Authentication(_) | SynthesisError::BackendProtocol(_) => {
                    AppError::ExternalService(e.to_string())
                }
                SynthesisError::FormatMismatch(_) => AppError::Internal(e.to_string()),
            },
        }
    }
}
