// file: src/models/search_result.rs
// description: Retrieved chunk with its similarity score
// reference: Used for vector similarity search results

use crate::models::Chunk;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,

    /// Cosine similarity to the query (higher is more similar, -1.0 to 1.0)
    pub score: f32,
}

impl ScoredChunk {
    pub fn new(chunk: Chunk, score: f32) -> Self {
        Self { chunk, score }
    }

    pub fn text(&self) -> &str {
        &self.chunk.text
    }

    /// Format as a summary string for display
    pub fn format_summary(&self, max_content_len: usize) -> String {
        let content_preview = if self.chunk.text.chars().count() > max_content_len {
            let truncated: String = self.chunk.text.chars().take(max_content_len).collect();
            format!("{}...", truncated)
        } else {
            self.chunk.text.clone()
        };

        format!(
            "Score: {:.4} | chunk #{} (chars {}-{})\n{}\n",
            self.score, self.chunk.index, self.chunk.start, self.chunk.end, content_preview
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_summary() {
        let result = ScoredChunk::new(
            Chunk::new(
                2,
                "This is a very long content that will be truncated".to_string(),
                40,
                91,
            ),
            0.87,
        );

        let summary = result.format_summary(20);
        assert!(summary.contains("0.8700"));
        assert!(summary.contains("chunk #2"));
        assert!(summary.contains("..."));
    }
}
