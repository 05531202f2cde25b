// file: src/parser/mod.rs
// description: text normalization and chunking module exports
// reference: internal module structure

pub mod normalizer;
pub mod patterns;
pub mod splitter;

pub use normalizer::TextNormalizer;
pub use splitter::TextSplitter;
