// file: src/pipeline/answerer.rs
// description: builds the grounded prompt and asks the completion provider
// reference: stuff-documents question answering

use crate::error::CompletionServiceError;
use crate::models::ScoredChunk;
use crate::providers::{CompletionProvider, CompletionRequest};
use std::sync::Arc;
use tracing::debug;

pub const ANSWER_INSTRUCTIONS: &str = "Use only the pieces of context supplied with the question to answer it. \
If the answer is not contained in the context, state explicitly that the context does not contain the answer instead of making one up. \
Keep the answer concise and relevant to the question.";

pub const NO_RELEVANT_INFORMATION: &str =
    "No relevant information found in the document to answer your question.";

pub const NO_ANSWER_GENERATED: &str = "No answer generated";

pub struct Answerer {
    completer: Arc<dyn CompletionProvider>,
}

impl Answerer {
    pub fn new(completer: Arc<dyn CompletionProvider>) -> Self {
        Self { completer }
    }

    pub fn build_request(question: &str, chunks: &[ScoredChunk]) -> CompletionRequest {
        let context = chunks
            .iter()
            .map(|scored| scored.text().trim())
            .collect::<Vec<_>>()
            .join("\n\n");

        CompletionRequest {
            instructions: ANSWER_INSTRUCTIONS.to_string(),
            context,
            question: question.trim().to_string(),
        }
    }

    pub async fn answer(
        &self,
        question: &str,
        chunks: &[ScoredChunk],
    ) -> Result<String, CompletionServiceError> {
        if chunks.is_empty() {
            return Ok(NO_RELEVANT_INFORMATION.to_string());
        }

        let request = Self::build_request(question, chunks);
        debug!(
            "Asking {} with {} context chunks",
            self.completer.name(),
            chunks.len()
        );

        let answer = self.completer.complete(&request).await?;
        let answer = answer.trim();

        if answer.is_empty() {
            Ok(NO_ANSWER_GENERATED.to_string())
        } else {
            Ok(answer.to_string())
        }
    }
}
