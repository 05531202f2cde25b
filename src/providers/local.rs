// file: src/providers/local.rs
// description: offline embedding and extractive answering providers
// reference: feature hashing for text vectors

use crate::error::{CompletionServiceError, EmbeddingServiceError};
use crate::parser::patterns::{SENTENCE, tokenize};
use crate::providers::{CompletionProvider, CompletionRequest, EmbeddingProvider};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::debug;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "do", "does", "for", "from", "how", "in",
    "is", "it", "of", "on", "or", "that", "the", "this", "to", "was", "were", "what", "when",
    "where", "which", "who", "why", "with",
];

/// Answer returned when no context sentence shares a content word with the question.
pub const NOT_IN_CONTEXT: &str =
    "I don't know. The answer is not contained in the provided context.";

fn content_terms(text: &str) -> HashSet<String> {
    tokenize(text)
        .into_iter()
        .filter(|token| !STOPWORDS.contains(&token.as_str()))
        .collect()
}

/// Deterministic bag-of-words embedder using signed feature hashing.
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in tokenize(text) {
            let digest = Sha256::digest(token.as_bytes());
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&digest[..8]);
            let hash = u64::from_le_bytes(bytes);

            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }

        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingServiceError> {
        Ok(self.embed_text(text))
    }
}

/// Answers with the context sentences that share the most content words with the question.
pub struct ExtractiveCompleter {
    max_sentences: usize,
}

impl ExtractiveCompleter {
    pub fn new() -> Self {
        Self { max_sentences: 2 }
    }

    pub fn with_max_sentences(max_sentences: usize) -> Self {
        Self {
            max_sentences: max_sentences.max(1),
        }
    }

    fn best_sentences(&self, context: &str, question: &str) -> Vec<String> {
        let question_terms = content_terms(question);

        let mut scored: Vec<(usize, usize, &str)> = SENTENCE
            .find_iter(context)
            .map(|m| m.as_str().trim())
            .filter(|sentence| !sentence.is_empty())
            .enumerate()
            .map(|(position, sentence)| {
                let overlap = content_terms(sentence)
                    .intersection(&question_terms)
                    .count();
                (position, overlap, sentence)
            })
            .filter(|(_, overlap, _)| *overlap > 0)
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(self.max_sentences);
        scored.sort_by_key(|(position, _, _)| *position);

        let mut seen = HashSet::new();
        scored
            .into_iter()
            .filter(|(_, _, sentence)| seen.insert(*sentence))
            .map(|(_, _, sentence)| sentence.to_string())
            .collect()
    }
}

impl Default for ExtractiveCompleter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for ExtractiveCompleter {
    fn name(&self) -> &str {
        "extractive"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionServiceError> {
        let sentences = self.best_sentences(&request.context, &request.question);
        debug!("Extractive answer from {} sentences", sentences.len());

        if sentences.is_empty() {
            return Ok(NOT_IN_CONTEXT.to_string());
        }

        Ok(sentences.join(" "))
    }
}
