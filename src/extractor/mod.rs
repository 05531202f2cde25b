// file: src/extractor/mod.rs
// description: document text extraction module exports
// reference: internal module structure

#[cfg(test)]
pub(crate) mod fixtures;
pub mod pdf;

pub use pdf::{ExtractedText, PdfTextExtractor};
