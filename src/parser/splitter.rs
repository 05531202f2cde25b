// file: src/parser/splitter.rs
// description: overlapping fixed-size text chunking with boundary preference
// reference: recursive character splitting used by RAG pipelines

use crate::config::{RetrievalConfig, SplitMode};
use crate::error::{PipelineError, Result};
use crate::models::Chunk;
use crate::parser::patterns::{LINE_BREAK, PARAGRAPH_BREAK, SENTENCE_END, WHITESPACE};
use regex::Regex;
use tracing::debug;

/// Splits text into chunks of at most `chunk_size` characters where each
/// chunk after the first repeats the last `chunk_overlap` characters of its
/// predecessor.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    mode: SplitMode,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize, mode: SplitMode) -> Result<Self> {
        if chunk_size == 0 {
            return Err(PipelineError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(PipelineError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            mode,
        })
    }

    pub fn from_config(config: &RetrievalConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap, config.split_mode)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split(&self, text: &str) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        // offsets[i] is the byte offset of character i; the last entry is text.len()
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = offsets.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let hard_end = (start + self.chunk_size).min(total);
            let end = if hard_end == total {
                total
            } else {
                match self.mode {
                    SplitMode::Fixed => hard_end,
                    SplitMode::Boundary => self
                        .find_boundary(&text[offsets[start]..offsets[hard_end]])
                        .map(|len| start + len)
                        .unwrap_or(hard_end),
                }
            };

            chunks.push(Chunk::new(
                chunks.len(),
                text[offsets[start]..offsets[end]].to_string(),
                start,
                end,
            ));

            if end == total {
                break;
            }

            start = end - self.chunk_overlap;
        }

        debug!(
            "Split {} chars into {} chunks (size {}, overlap {})",
            total,
            chunks.len(),
            self.chunk_size,
            self.chunk_overlap
        );

        chunks
    }

    /// Character length of the preferred cut inside `window`.
    ///
    /// Only cuts in the second half of the window (and past the overlap) are
    /// accepted so every step makes progress.
    fn find_boundary(&self, window: &str) -> Option<usize> {
        let min_len = (self.chunk_overlap + 1).max(self.chunk_size / 2);
        let boundaries: [&Regex; 4] = [
            &*PARAGRAPH_BREAK,
            &*SENTENCE_END,
            &*LINE_BREAK,
            &*WHITESPACE,
        ];

        for pattern in boundaries {
            if let Some(found) = pattern.find_iter(window).last() {
                let len = window[..found.end()].chars().count();
                if len >= min_len {
                    return Some(len);
                }
            }
        }

        None
    }

    /// Rebuilds the source text by dropping each chunk's overlap with its predecessor.
    pub fn reconstruct(chunks: &[Chunk]) -> String {
        let mut text = String::new();
        let mut covered = 0usize;

        for chunk in chunks {
            let skip = covered.saturating_sub(chunk.start);
            text.extend(chunk.text.chars().skip(skip));
            covered = chunk.end;
        }

        text
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        let config = RetrievalConfig::default();
        Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            mode: config.split_mode,
        }
    }
}
