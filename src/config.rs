// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub provider: ProviderConfig,
    pub retrieval: RetrievalConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub records_path: PathBuf,
    pub max_upload_size_mb: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI-compatible HTTP API.
    OpenAi,
    /// Offline hashing embedder and extractive completer.
    Local,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub embedding_model: String,
    pub completion_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
    pub local_embedding_dim: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// End chunks on paragraph, sentence, line or word boundaries when possible.
    Boundary,
    /// Always cut at exactly `chunk_size` characters.
    Fixed,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub split_mode: SplitMode,
    pub embedding_batch_size: usize,
    pub parallel_requests: usize,
    #[serde(default)]
    pub show_progress: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionConfig {
    pub normalize_whitespace: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: crate::index::DEFAULT_TOP_K,
            split_mode: SplitMode::Boundary,
            embedding_batch_size: 64,
            parallel_requests: 4,
            show_progress: false,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PDF_QA")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.apply_env_fallbacks();
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        let mut config = Self {
            storage: StorageConfig {
                upload_dir: PathBuf::from("uploads"),
                records_path: PathBuf::from("data/records.json"),
                max_upload_size_mb: 25,
            },
            provider: ProviderConfig {
                kind: ProviderKind::OpenAi,
                api_key: None,
                base_url: "https://api.openai.com/v1".to_string(),
                embedding_model: "text-embedding-3-small".to_string(),
                completion_model: "gpt-3.5-turbo".to_string(),
                temperature: 0.0,
                max_tokens: 500,
                request_timeout_secs: 60,
                local_embedding_dim: 256,
            },
            retrieval: RetrievalConfig::default(),
            extraction: ExtractionConfig {
                normalize_whitespace: true,
            },
        };
        config.apply_env_fallbacks();
        config
    }

    // OPENAI_API_KEY is honoured when no key was configured explicitly.
    fn apply_env_fallbacks(&mut self) {
        if self.provider.api_key.as_deref().is_none_or(str::is_empty) {
            self.provider.api_key = std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
    }

    pub fn validate(&self) -> Result<()> {
        let retrieval = &self.retrieval;

        if retrieval.chunk_size == 0 {
            return Err(PipelineError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if retrieval.chunk_overlap >= retrieval.chunk_size {
            return Err(PipelineError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                retrieval.chunk_overlap, retrieval.chunk_size
            )));
        }

        if retrieval.top_k == 0 {
            return Err(PipelineError::Config(
                "top_k must be greater than 0".to_string(),
            ));
        }

        if retrieval.embedding_batch_size == 0 || retrieval.parallel_requests == 0 {
            return Err(PipelineError::Config(
                "embedding_batch_size and parallel_requests must be greater than 0".to_string(),
            ));
        }

        if self.provider.local_embedding_dim == 0 {
            return Err(PipelineError::Config(
                "local_embedding_dim must be greater than 0".to_string(),
            ));
        }

        if self.storage.max_upload_size_mb == 0 {
            return Err(PipelineError::Config(
                "max_upload_size_mb must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
