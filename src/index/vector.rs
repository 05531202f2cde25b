// file: src/index/vector.rs
// description: per-request cosine similarity index over chunk embeddings
// reference: brute-force nearest neighbour search

use crate::error::{PipelineError, Result};
use crate::models::{Chunk, ScoredChunk};
use tracing::debug;

pub const DEFAULT_TOP_K: usize = 3;

/// Cosine similarity of two equal-length vectors; 0.0 when either has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Chunks and their vectors, kept in insertion order. Never persisted.
#[derive(Debug, Default)]
pub struct VectorIndex {
    entries: Vec<(Chunk, Vec<f32>)>,
    dimension: Option<usize>,
}

impl VectorIndex {
    pub fn build(entries: Vec<(Chunk, Vec<f32>)>) -> Result<Self> {
        let dimension = entries.first().map(|(_, vector)| vector.len());

        if let Some(dim) = dimension
            && let Some((chunk, vector)) = entries.iter().find(|(_, v)| v.len() != dim)
        {
            return Err(PipelineError::Index(format!(
                "Chunk {} has dimension {}, expected {}",
                chunk.index,
                vector.len(),
                dim
            )));
        }

        debug!(
            "Built vector index over {} chunks (dimension {:?})",
            entries.len(),
            dimension
        );

        Ok(Self { entries, dimension })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Top `k` chunks by descending similarity. Equal scores keep chunk order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        if let Some(dim) = self.dimension
            && query.len() != dim
        {
            return Err(PipelineError::Index(format!(
                "Query has dimension {}, expected {}",
                query.len(),
                dim
            )));
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|(chunk, vector)| {
                let score = cosine_similarity(query, vector);
                let score = if score.is_nan() { f32::NEG_INFINITY } else { score };
                ScoredChunk::new(chunk.clone(), score)
            })
            .collect();

        // stable sort keeps earlier chunks first on ties
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);

        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, text: &str) -> Chunk {
        Chunk::new(index, text.to_string(), index * 10, index * 10 + text.len())
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let index = VectorIndex::build(vec![
            (chunk(0, "far"), vec![0.0, 1.0]),
            (chunk(1, "near"), vec![1.0, 0.1]),
            (chunk(2, "middle"), vec![1.0, 1.0]),
        ])
        .unwrap();

        let results = index.search(&[1.0, 0.0], 2).unwrap();
        let texts: Vec<&str> = results.iter().map(|r| r.text()).collect();
        assert_eq!(texts, vec!["near", "middle"]);
    }

    #[test]
    fn test_k_larger_than_index_returns_all() {
        let index = VectorIndex::build(vec![
            (chunk(0, "a"), vec![0.2, 1.0]),
            (chunk(1, "b"), vec![1.0, 0.0]),
        ])
        .unwrap();

        let results = index.search(&[1.0, 0.0], 10).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text(), "b");
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let index = VectorIndex::build(vec![
            (chunk(0, "first"), vec![1.0, 0.0]),
            (chunk(1, "second"), vec![2.0, 0.0]),
            (chunk(2, "third"), vec![3.0, 0.0]),
        ])
        .unwrap();

        let results = index.search(&[1.0, 0.0], DEFAULT_TOP_K).unwrap();
        let indices: Vec<usize> = results.iter().map(|r| r.chunk.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_index_returns_empty() {
        let index = VectorIndex::build(Vec::new()).unwrap();
        assert!(index.search(&[1.0, 0.0], 3).unwrap().is_empty());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let result = VectorIndex::build(vec![
            (chunk(0, "a"), vec![1.0, 0.0]),
            (chunk(1, "b"), vec![1.0]),
        ]);
        assert!(matches!(result, Err(PipelineError::Index(_))));

        let index = VectorIndex::build(vec![(chunk(0, "a"), vec![1.0, 0.0])]).unwrap();
        assert!(index.search(&[1.0, 0.0, 0.0], 1).is_err());
    }
}
