use anyhow::Result;
use coqui_tts_service::domain::tts::{TtsService, TtsServiceApi};
use coqui_tts_service::infrastructure::config::{BackendConfig, TtsConfig};
use coqui_tts_service::infrastructure::http::router;
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub mod api_client;
pub mod wav;

pub use api_client::TestClient;
pub use wav::wav_bytes;

pub const SPEAKER: &str = "p225";

pub struct TestContext {
    pub client: TestClient,
    pub service: Arc<TtsService>,
    pub backend: ServerGuard,
    pub cache_dir: TempDir,
    _catalog_mocks: Vec<Mock>,
}

impl TestContext {
    /// Service backed by a self-hosted server offering one English speaker
    pub async fn new() -> Result<Self> {
        Self::start(500, true).await
    }

    pub async fn with_chunk_max_len(chunk_max_len: usize) -> Result<Self> {
        Self::start(chunk_max_len, true).await
    }

    /// Service whose backend fails catalog discovery
    pub async fn with_failing_catalog() -> Result<Self> {
        Self::start(500, false).await
    }

    async fn start(chunk_max_len: usize, catalog_ok: bool) -> Result<Self> {
        let mut backend = Server::new_async().await;

        let catalog_mocks = if catalog_ok {
            vec![
                backend
                    .mock("GET", "/api/speakers")
                    .with_status(200)
                    .with_header("content-type", "application/json")
                    .with_body(format!(r#"["{}"]"#, SPEAKER))
                    .create_async()
                    .await,
                backend
                    .mock("GET", "/api/languages")
                    .with_status(200)
                    .with_header("content-type", "application/json")
                    .with_body(r#"["en"]"#)
                    .create_async()
                    .await,
            ]
        } else {
            vec![backend
                .mock("GET", "/api/languages")
                .with_status(500)
                .with_body("boom")
                .create_async()
                .await]
        };

        let cache_dir = tempfile::tempdir()?;
        let config = self_hosted_config(&backend, cache_dir.path(), chunk_max_len);
        let service = Arc::new(TtsService::new(config).await?);
        let client = TestClient::new(router(service.clone()));

        Ok(Self {
            client,
            service,
            backend,
            cache_dir,
            _catalog_mocks: catalog_mocks,
        })
    }

    pub fn voice_uid(&self) -> String {
        self.service.available_voices()[0].uid()
    }

    /// Expect exactly one synthesis request for `text`, answered with `audio`
    pub async fn mock_tts(&mut self, text: &str, audio: Vec<u8>) -> Mock {
        self.mock_tts_times(text, audio, 1).await
    }

    pub async fn mock_tts_times(&mut self, text: &str, audio: Vec<u8>, hits: usize) -> Mock {
        self.backend
            .mock("GET", "/api/tts")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("speaker_id".into(), SPEAKER.into()),
                Matcher::UrlEncoded("language_id".into(), "en".into()),
                Matcher::UrlEncoded("text".into(), text.into()),
            ]))
            .with_status(200)
            .with_header("content-type", "audio/wav")
            .with_body(audio)
            .expect(hits)
            .create_async()
            .await
    }

    /// Answer every synthesis request with an error status
    pub async fn mock_tts_failure(&mut self, status: usize, body: &str, hits: usize) -> Mock {
        self.backend
            .mock("GET", "/api/tts")
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    pub fn cached_files(&self) -> usize {
        std::fs::read_dir(self.cache_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

fn self_hosted_config(server: &ServerGuard, cache_dir: &Path, chunk_max_len: usize) -> TtsConfig {
    let address = server.socket_address();

    TtsConfig {
        backend: BackendConfig::SelfHosted {
            scheme: "http".to_string(),
            hostname: address.ip().to_string(),
            port: address.port(),
        },
        purge_cache: false,
        cache_dir: cache_dir.to_path_buf(),
        chunk_max_len,
        max_concurrent_chunks: 1,
        request_timeout: Duration::from_secs(5),
    }
}
