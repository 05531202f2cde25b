// file: src/pipeline/processor.rs
// description: turns a pdf into text and answers questions against that text
// reference: splits, embeds, indexes and retrieves before asking the completion provider

use super::answerer::{Answerer, NO_RELEVANT_INFORMATION};
use super::progress::{AnswerStats, ProgressTracker};
use crate::config::{Config, ExtractionConfig, RetrievalConfig};
use crate::error::{EmbeddingServiceError, ExtractionError, PipelineError, ProviderErrorKind, Result};
use crate::extractor::{ExtractedText, PdfTextExtractor};
use crate::index::VectorIndex;
use crate::models::{Chunk, ScoredChunk};
use crate::parser::{TextNormalizer, TextSplitter};
use crate::providers::{EmbeddingProvider, Providers};
use crate::utils::telemetry::StageTimer;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub const NO_CONTENT: &str = "No content found in the document to answer the question.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Answered,
    /// The document text produced no chunks.
    NoContent,
    /// Retrieval returned nothing to put in the context.
    NoRelevantInformation,
}

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub outcome: AnswerOutcome,
    pub sources: Vec<ScoredChunk>,
    pub stats: AnswerStats,
}

impl Answer {
    fn without_sources(text: &str, outcome: AnswerOutcome, stats: AnswerStats) -> Self {
        Self {
            text: text.to_string(),
            outcome,
            sources: Vec::new(),
            stats,
        }
    }
}

pub struct PdfProcessor {
    splitter: TextSplitter,
    embedder: Arc<dyn EmbeddingProvider>,
    answerer: Answerer,
    normalize_whitespace: bool,
    top_k: usize,
    embedding_batch_size: usize,
    parallel_requests: usize,
    show_progress: bool,
}

impl PdfProcessor {
    pub fn new(
        providers: &Providers,
        retrieval: &RetrievalConfig,
        extraction: &ExtractionConfig,
    ) -> Result<Self> {
        if retrieval.top_k == 0 {
            return Err(PipelineError::Config(
                "top_k must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            splitter: TextSplitter::from_config(retrieval)?,
            embedder: Arc::clone(&providers.embedder),
            answerer: Answerer::new(Arc::clone(&providers.completer)),
            normalize_whitespace: extraction.normalize_whitespace,
            top_k: retrieval.top_k,
            embedding_batch_size: retrieval.embedding_batch_size.max(1),
            parallel_requests: retrieval.parallel_requests.max(1),
            show_progress: retrieval.show_progress,
        })
    }

    pub fn from_config(config: &Config, providers: &Providers) -> Result<Self> {
        Self::new(providers, &config.retrieval, &config.extraction)
    }

    /// Extracts and normalizes the text of the PDF at `path`.
    pub async fn extract(&self, path: &Path) -> Result<ExtractedText> {
        let owned_path = path.to_path_buf();
        let normalize = self.normalize_whitespace;

        let extracted = tokio::task::spawn_blocking(move || -> Result<ExtractedText> {
            let mut extracted = PdfTextExtractor::new().extract(&owned_path)?;

            if normalize {
                extracted.text = TextNormalizer::new().normalize(&extracted.text)?;
            }

            if extracted.text.is_empty() {
                return Err(ExtractionError::EmptyText(owned_path).into());
            }

            Ok(extracted)
        })
        .await
        .map_err(|e| ExtractionError::Unreadable {
            path: path.to_path_buf(),
            message: format!("extraction task failed: {}", e),
        })??;

        Ok(extracted)
    }

    /// Answers `question` using only the chunks of `document_text` most similar to it.
    pub async fn answer(&self, document_text: &str, question: &str) -> Result<Answer> {
        let mut timer = StageTimer::start();

        let chunks = self.splitter.split(document_text);
        let tracker = ProgressTracker::new(chunks.len(), self.show_progress);

        if chunks.is_empty() {
            info!("Document has no content to search");
            timer.finish(0);
            return Ok(Answer::without_sources(
                NO_CONTENT,
                AnswerOutcome::NoContent,
                tracker.get_stats(0),
            ));
        }

        let embeddings = self.embed_chunks(&chunks, &tracker).await?;
        tracker.finish();
        timer.lap("embed");

        let question_embedding = self.embedder.embed(question).await?;

        let index = VectorIndex::build(chunks.into_iter().zip(embeddings).collect())?;
        let sources = index.search(&question_embedding, self.top_k)?;
        debug!(
            "Retrieved {} of {} chunks for question",
            sources.len(),
            index.len()
        );
        timer.lap("retrieve");

        if sources.is_empty() {
            timer.finish(index.len());
            return Ok(Answer::without_sources(
                NO_RELEVANT_INFORMATION,
                AnswerOutcome::NoRelevantInformation,
                tracker.get_stats(0),
            ));
        }

        let text = self.answerer.answer(question, &sources).await?;
        timer.lap("generate");
        let stats = tracker.get_stats(sources.len());
        timer.finish(stats.chunks_total);

        Ok(Answer {
            text,
            outcome: AnswerOutcome::Answered,
            sources,
            stats,
        })
    }

    /// Embeds chunk texts in batches, keeping results in chunk order.
    async fn embed_chunks(
        &self,
        chunks: &[Chunk],
        tracker: &ProgressTracker,
    ) -> Result<Vec<Vec<f32>>> {
        let batches: Vec<Vec<String>> = chunks
            .chunks(self.embedding_batch_size)
            .map(|batch| batch.iter().map(|chunk| chunk.text.clone()).collect())
            .collect();

        debug!(
            "Embedding {} chunks in {} batches with {}",
            chunks.len(),
            batches.len(),
            self.embedder.name()
        );

        let embedder = &self.embedder;
        let batch_results: Vec<Vec<Vec<f32>>> = stream::iter(batches)
            .map(|batch| async move {
                let embeddings = embedder.embed_batch(&batch).await?;
                if embeddings.len() != batch.len() {
                    return Err(EmbeddingServiceError::new(
                        ProviderErrorKind::Transient,
                        format!(
                            "expected {} embeddings, received {}",
                            batch.len(),
                            embeddings.len()
                        ),
                    ));
                }
                tracker.inc_embedded(embeddings.len());
                Ok(embeddings)
            })
            .buffered(self.parallel_requests)
            .try_collect()
            .await?;

        Ok(batch_results.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SplitMode;
    use crate::extractor::fixtures::write_pdf;
    use crate::pipeline::testing::{FakeCompleter, FakeEmbedder};

    fn retrieval(chunk_size: usize, chunk_overlap: usize) -> RetrievalConfig {
        RetrievalConfig {
            chunk_size,
            chunk_overlap,
            split_mode: SplitMode::Boundary,
            ..RetrievalConfig::default()
        }
    }

    fn extraction() -> ExtractionConfig {
        ExtractionConfig {
            normalize_whitespace: true,
        }
    }

    fn processor(
        embedder: Arc<FakeEmbedder>,
        completer: Arc<FakeCompleter>,
        retrieval: RetrievalConfig,
    ) -> PdfProcessor {
        let providers = Providers {
            embedder,
            completer,
        };
        PdfProcessor::new(&providers, &retrieval, &extraction()).unwrap()
    }

    #[tokio::test]
    async fn test_capital_of_france() {
        let embedder = Arc::new(FakeEmbedder::working());
        let completer = Arc::new(FakeCompleter::extractive());
        let processor = processor(embedder.clone(), completer.clone(), retrieval(1000, 200));

        let answer = processor
            .answer("Paris is the capital of France.", "What is the capital of France?")
            .await
            .unwrap();

        assert_eq!(answer.outcome, AnswerOutcome::Answered);
        assert_eq!(answer.sources.len(), 1);
        assert!(answer.text.contains("Paris"));
        assert_eq!(answer.stats.chunks_total, 1);
        assert_eq!(answer.stats.chunks_retrieved, 1);
        assert_eq!(completer.calls(), 1);
        // one chunk plus the question
        assert_eq!(embedder.texts_embedded(), 2);
    }

    #[tokio::test]
    async fn test_empty_text_skips_providers() {
        let embedder = Arc::new(FakeEmbedder::working());
        let completer = Arc::new(FakeCompleter::replying("unused"));
        let processor = processor(embedder.clone(), completer.clone(), retrieval(1000, 200));

        for text in ["", "   \n\t  "] {
            let answer = processor.answer(text, "Anything?").await.unwrap();
            assert_eq!(answer.outcome, AnswerOutcome::NoContent);
            assert_eq!(answer.text, NO_CONTENT);
            assert!(answer.sources.is_empty());
        }

        assert_eq!(embedder.texts_embedded(), 0);
        assert_eq!(embedder.batch_calls(), 0);
        assert_eq!(completer.calls(), 0);
    }

    #[tokio::test]
    async fn test_top_k_limits_context() {
        let embedder = Arc::new(FakeEmbedder::working());
        let completer = Arc::new(FakeCompleter::replying("answer"));
        let processor = processor(embedder, completer.clone(), retrieval(60, 10));

        let text = (0..20)
            .map(|i| format!("Sentence number {} talks about topic {}.", i, i))
            .collect::<Vec<_>>()
            .join(" ");

        let answer = processor.answer(&text, "Which topic is 7?").await.unwrap();
        assert_eq!(answer.sources.len(), 3);
        assert!(answer.stats.chunks_total > 3);

        let context = completer.last_request().unwrap().context;
        assert_eq!(context.split("\n\n").count(), 3);
    }

    #[tokio::test]
    async fn test_batches_keep_chunk_order() {
        let embedder = Arc::new(FakeEmbedder::working());
        let completer = Arc::new(FakeCompleter::replying("answer"));
        let mut config = retrieval(40, 0);
        config.split_mode = SplitMode::Fixed;
        config.embedding_batch_size = 2;
        config.parallel_requests = 3;
        let processor = processor(embedder.clone(), completer, config);

        let text = "alpha bravo charlie delta echo foxtrot. golf hotel india juliet kilo lima. \
                    mike november oscar papa quebec romeo. sierra tango uniform victor whiskey.";
        let chunks = TextSplitter::new(40, 0, SplitMode::Fixed).unwrap().split(text);
        let target = chunks[2].text.clone();

        let answer = processor.answer(text, &target).await.unwrap();
        assert_eq!(answer.sources[0].chunk.index, 2);
        assert_eq!(embedder.batch_calls(), chunks.len().div_ceil(2));
        assert_eq!(answer.stats.chunks_embedded, chunks.len());
    }

    #[tokio::test]
    async fn test_quota_failure_from_embedder() {
        let embedder = Arc::new(FakeEmbedder::failing(ProviderErrorKind::Quota));
        let completer = Arc::new(FakeCompleter::replying("unused"));
        let processor = processor(embedder, completer.clone(), retrieval(1000, 200));

        let err = processor
            .answer("Paris is the capital of France.", "Capital?")
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Embedding(_)));
        assert!(err.is_quota());
        assert_eq!(completer.calls(), 0);
    }

    #[tokio::test]
    async fn test_auth_failure_from_completer() {
        let embedder = Arc::new(FakeEmbedder::working());
        let completer = Arc::new(FakeCompleter::failing(ProviderErrorKind::Auth));
        let processor = processor(embedder, completer, retrieval(1000, 200));

        let err = processor
            .answer("Paris is the capital of France.", "Capital?")
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Completion(_)));
        assert!(err.is_auth());
        assert!(!err.is_quota());
    }

    #[tokio::test]
    async fn test_extract_reads_pdf_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir, "paris.pdf", &["Paris is the capital of France."]);
        let processor = processor(
            Arc::new(FakeEmbedder::working()),
            Arc::new(FakeCompleter::replying("unused")),
            retrieval(1000, 200),
        );

        let extracted = processor.extract(&path).await.unwrap();
        assert!(extracted.text.contains("Paris is the capital of France."));
        assert_eq!(extracted.page_count, 1);
    }

    #[tokio::test]
    async fn test_extract_blank_pdf_is_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir, "blank.pdf", &[""]);
        let processor = processor(
            Arc::new(FakeEmbedder::working()),
            Arc::new(FakeCompleter::replying("unused")),
            retrieval(1000, 200),
        );

        let err = processor.extract(&path).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Extraction(ExtractionError::EmptyText(_))
        ));
    }
}
