pub mod cloud_backend;
pub mod dto;
pub mod self_hosted_backend;
pub mod synthesis_backend;

pub use cloud_backend::{CloudBackend, DEFAULT_CLOUD_BASE_URL};
pub use self_hosted_backend::SelfHostedBackend;
pub use synthesis_backend::{SynthesisBackend, MAX_AUDIO_BYTES};

use crate::domain::tts::TtsServiceError;
use crate::infrastructure::config::BackendConfig;
use std::sync::Arc;
use std::time::Duration;

/// Build the backend selected by configuration
pub fn build_backend(
    config: &BackendConfig,
    timeout: Duration,
) -> Result<Arc<dyn SynthesisBackend>, TtsServiceError> {
    let backend: Arc<dyn SynthesisBackend> = match config {
        BackendConfig::Cloud { base_url, api_key } => Arc::new(
            CloudBackend::new(base_url, api_key.clone(), timeout)
                .map_err(|e| TtsServiceError::Configuration(format!("HTTP client: {}", e)))?,
        ),
        BackendConfig::SelfHosted {
            scheme,
            hostname,
            port,
        } => Arc::new(
            SelfHostedBackend::new(scheme, hostname, *port, timeout)
                .map_err(|e| TtsServiceError::Configuration(format!("HTTP client: {}", e)))?,
        ),
    };

    tracing::info!(provider = backend.name(), "Synthesis backend configured");
    Ok(backend)
}
