use crate::domain::tts::DEFAULT_CHUNK_MAX_LEN;
use crate::infrastructure::backends::DEFAULT_CLOUD_BASE_URL;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

type ConfigResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub tts: TtsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Everything the synthesis engine is built from
#[derive(Debug, Clone, PartialEq)]
pub struct TtsConfig {
    pub backend: BackendConfig,
    pub purge_cache: bool,
    pub cache_dir: PathBuf,
    pub chunk_max_len: usize,
    pub max_concurrent_chunks: usize,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfig {
    Cloud { base_url: String, api_key: String },
    SelfHosted { scheme: String, hostname: String, port: u16 },
}

impl BackendConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            BackendConfig::Cloud { .. } => "cloud",
            BackendConfig::SelfHosted { .. } => "self-hosted",
        }
    }
}

impl Config {
    pub fn from_env() -> ConfigResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let config = Config {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()?,
            log_format: match lookup("LOG_FORMAT").unwrap_or_default().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            tts: TtsConfig::from_lookup(lookup)?,
        };

        Ok(config)
    }
}

impl TtsConfig {
    /// Re-read the engine settings, used when configuration changes at runtime
    pub fn from_env() -> ConfigResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let backend = if flag(&lookup, "TTS_CLOUD_ACCOUNT", true) {
            BackendConfig::Cloud {
                base_url: lookup("TTS_CLOUD_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_CLOUD_BASE_URL.to_string()),
                api_key: required(&lookup, "TTS_API_KEY")?,
            }
        } else {
            BackendConfig::SelfHosted {
                scheme: lookup("TTS_SCHEME").unwrap_or_else(|| "http".to_string()),
                hostname: required(&lookup, "TTS_HOSTNAME")?,
                port: required(&lookup, "TTS_PORT")?.parse()?,
            }
        };

        let config = TtsConfig {
            backend,
            purge_cache: flag(&lookup, "TTS_PURGE_CACHE", false),
            cache_dir: lookup("TTS_CACHE_DIR")
                .unwrap_or_else(|| "cache/coquitts".to_string())
                .into(),
            chunk_max_len: lookup("TTS_CHUNK_MAX_LEN")
                .unwrap_or_else(|| DEFAULT_CHUNK_MAX_LEN.to_string())
                .parse()?,
            max_concurrent_chunks: lookup("TTS_MAX_CONCURRENT_CHUNKS")
                .unwrap_or_else(|| "1".to_string())
                .parse()?,
            request_timeout: Duration::from_secs(
                lookup("TTS_REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|| "60".to_string())
                    .parse()?,
            ),
        };

        if config.chunk_max_len < 2 {
            return Err("TTS_CHUNK_MAX_LEN must be at least 2".into());
        }
        if config.max_concurrent_chunks == 0 {
            return Err("TTS_MAX_CONCURRENT_CHUNKS must be at least 1".into());
        }

        Ok(config)
    }

    /// Identity of the backend that produced an audio file; part of every cache key
    pub fn fingerprint(&self) -> ConfigResult<String> {
        let (hostname, port) = match &self.backend {
            BackendConfig::Cloud { base_url, .. } => {
                let url = reqwest::Url::parse(base_url)?;
                let hostname = url
                    .host_str()
                    .ok_or_else(|| format!("TTS_CLOUD_BASE_URL has no host: {}", base_url))?
                    .to_string();
                let port = url.port_or_known_default().unwrap_or_default();
                (hostname, port)
            }
            BackendConfig::SelfHosted { hostname, port, .. } => (hostname.clone(), *port),
        };

        Ok(format!(
            "backend={},hostname={},port={}",
            self.backend.kind(),
            hostname,
            port
        ))
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> ConfigResult<String> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("{} must be set", key).into())
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    lookup(key)
        .map(|s| s.trim().to_lowercase() == "true")
        .unwrap_or(default)
}
