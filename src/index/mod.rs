// file: src/index/mod.rs
// description: in-memory similarity index module exports
// reference: internal module structure

pub mod vector;

pub use vector::{DEFAULT_TOP_K, VectorIndex, cosine_similarity};
