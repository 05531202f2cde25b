// file: src/providers/mod.rs
// description: embedding and completion provider traits and construction
// reference: https://docs.rs/async-trait

pub mod classify;
pub mod local;
pub mod openai;

pub use classify::{ProviderFailure, classify_failure};
pub use local::{ExtractiveCompleter, HashingEmbedder};
pub use openai::OpenAiClient;

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::{CompletionServiceError, EmbeddingServiceError, PipelineError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Maps text to a fixed-dimensionality vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingServiceError>;

    /// Embeds `texts` preserving order. One attempt, no retries.
    async fn embed_batch(
        &self,
        texts: &[String],
    ) -> std::result::Result<Vec<Vec<f32>>, EmbeddingServiceError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}

/// Prompt parts handed to a completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub instructions: String,
    pub context: String,
    pub question: String,
}

impl CompletionRequest {
    /// User message sent after the instructions.
    pub fn user_prompt(&self) -> String {
        format!(
            "Context:\n{}\n\nQuestion: {}\nAnswer:",
            self.context, self.question
        )
    }
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<String, CompletionServiceError>;
}

/// Provider clients constructed once at startup and shared by reference.
#[derive(Clone)]
pub struct Providers {
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub completer: Arc<dyn CompletionProvider>,
}

pub fn build_providers(config: &ProviderConfig) -> Result<Providers> {
    match config.kind {
        ProviderKind::OpenAi => {
            let api_key = config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| {
                    PipelineError::Config(
                        "API key not found; set PDF_QA__PROVIDER__API_KEY or OPENAI_API_KEY"
                            .to_string(),
                    )
                })?;

            let client = Arc::new(OpenAiClient::new(config, api_key)?);
            info!(
                "Using OpenAI-compatible provider at {} ({} / {})",
                config.base_url, config.embedding_model, config.completion_model
            );

            Ok(Providers {
                embedder: client.clone(),
                completer: client,
            })
        }
        ProviderKind::Local => {
            info!(
                "Using local hashing embeddings ({} dims) and extractive answers",
                config.local_embedding_dim
            );

            Ok(Providers {
                embedder: Arc::new(HashingEmbedder::new(config.local_embedding_dim)),
                completer: Arc::new(ExtractiveCompleter::new()),
            })
        }
    }
}
