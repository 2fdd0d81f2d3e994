use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CardexConfig {
    pub service: ServiceConfig,
    pub source: SourceConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// The enrichment/upload service endpoint shared by both clients.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourceConfig {
    /// Path to the bulk card JSON dump.
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of concurrent workers draining the record queue.
    pub workers: usize,
    pub upload_mode: UploadMode,
    /// Documents per batch write in chunked mode.
    pub chunk_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

/// How composed documents reach the vector store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadMode {
    /// One write per record, issued inside the worker that produced it.
    Single,
    /// Workers only enrich and compose; documents are collected and written
    /// in fixed-size chunks after the barrier, in input order.
    Chunked,
}

impl Default for CardexConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            source: SourceConfig::default(),
            pipeline: PipelineConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8787".into(),
            timeout_secs: 30,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        let path = default_cardex_dir()
            .join("oracle-cards.json")
            .to_string_lossy()
            .into_owned();
        Self { path }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 30,
            upload_mode: UploadMode::Single,
            chunk_size: 100,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

/// Returns `~/.cardex/`
pub fn default_cardex_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".cardex")
}

/// Returns the default config file path: `~/.cardex/config.toml`
pub fn default_config_path() -> PathBuf {
    default_cardex_dir().join("config.toml")
}

impl CardexConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            CardexConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides (CARDEX_SERVICE_URL,
    /// CARDEX_SOURCE, CARDEX_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CARDEX_SERVICE_URL") {
            self.service.base_url = val;
        }
        if let Ok(val) = std::env::var("CARDEX_SOURCE") {
            self.source.path = val;
        }
        if let Ok(val) = std::env::var("CARDEX_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.service.base_url.starts_with("http://")
                || self.service.base_url.starts_with("https://"),
            "service base_url must be an http(s) URL"
        );
        anyhow::ensure!(self.pipeline.workers >= 1, "pipeline workers must be >= 1");
        anyhow::ensure!(
            self.pipeline.chunk_size >= 1,
            "pipeline chunk_size must be >= 1"
        );
        Ok(())
    }

    /// Request timeout applied to every outbound call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs)
    }

    /// Resolve the source path, expanding `~` if needed.
    pub fn resolved_source_path(&self) -> PathBuf {
        expand_tilde(&self.source.path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
