// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Classification shared by every provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// Missing, invalid or revoked credentials.
    Auth,
    /// Usage quota, billing or rate limit rejection.
    Quota,
    /// Network failures, timeouts, malformed responses and anything else.
    Transient,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderErrorKind::Auth => "authentication",
            ProviderErrorKind::Quota => "quota",
            ProviderErrorKind::Transient => "transient",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Cannot read PDF {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("Invalid PDF {path}: {message}")]
    InvalidPdf { path: PathBuf, message: String },

    #[error("No extractable text in {0}")]
    EmptyText(PathBuf),
}

#[derive(Error, Debug, Clone)]
#[error("Embedding service {kind} error: {message}")]
pub struct EmbeddingServiceError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl EmbeddingServiceError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone)]
#[error("Completion service {kind} error: {message}")]
pub struct CompletionServiceError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl CompletionServiceError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingServiceError),

    #[error(transparent)]
    Completion(#[from] CompletionServiceError),

    #[error("Vector index error: {0}")]
    Index(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PipelineError {
    /// Provider classification when the error came from an embedding or completion call.
    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self {
            PipelineError::Embedding(e) => Some(e.kind),
            PipelineError::Completion(e) => Some(e.kind),
            _ => None,
        }
    }

    pub fn is_quota(&self) -> bool {
        self.provider_kind() == Some(ProviderErrorKind::Quota)
    }

    pub fn is_auth(&self) -> bool {
        self.provider_kind() == Some(ProviderErrorKind::Auth)
    }

    /// HTTP-style status a boundary layer should report for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::Embedding(_) | PipelineError::Completion(_) => {
                match self.provider_kind() {
                    Some(ProviderErrorKind::Quota) => 402,
                    Some(ProviderErrorKind::Auth) => 401,
                    _ => 502,
                }
            }
            PipelineError::Extraction(_) | PipelineError::Validation(_) => 400,
            PipelineError::NotFound(_) => 404,
            _ => 500,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Embedding(_) | PipelineError::Completion(_) => {
                match self.provider_kind() {
                    Some(ProviderErrorKind::Quota) => {
                        "Provider API quota exceeded. Please add billing credit to your account."
                            .to_string()
                    }
                    Some(ProviderErrorKind::Auth) => {
                        "Invalid provider API key. Please check your credentials.".to_string()
                    }
                    _ => format!("Error answering question: {}", self),
                }
            }
            PipelineError::Extraction(_) => "Could not extract text from PDF".to_string(),
            _ => self.to_string(),
        }
    }
}
