// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod index;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod providers;
pub mod service;
pub mod storage;
pub mod utils;

pub use config::{Config, ExtractionConfig, ProviderConfig, RetrievalConfig, SplitMode, StorageConfig};
pub use error::{
    CompletionServiceError, EmbeddingServiceError, ExtractionError, PipelineError,
    ProviderErrorKind, Result,
};
pub use exporter::{ExportManifest, JsonExporter};
pub use extractor::{ExtractedText, PdfTextExtractor};
pub use index::VectorIndex;
pub use models::{Chunk, Document, QuestionRecord, ScoredChunk};
pub use parser::{TextNormalizer, TextSplitter};
pub use pipeline::{Answer, AnswerOutcome, AnswerStats, PdfProcessor};
pub use providers::{
    CompletionProvider, EmbeddingProvider, Providers, build_providers,
};
pub use service::{AnsweredQuestion, QaService};
pub use storage::{FileStorage, JsonRecordStore, LocalFileStorage, RecordStore};
pub use utils::{Component, HealthCheck, HealthReport, HealthStatus, StageTimer, Validator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        let splitter = TextSplitter::from_config(&config.retrieval).unwrap();
        assert_eq!(splitter.chunk_size(), 1000);
    }
}
