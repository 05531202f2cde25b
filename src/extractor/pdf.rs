// file: src/extractor/pdf.rs
// description: page-ordered text extraction from PDF files
// reference: https://docs.rs/lopdf

use crate::error::ExtractionError;
use lopdf::Document;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
}

pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Reads `path` and returns the text of every page in page order, trimmed.
    ///
    /// Image-only documents have no text layer and yield `EmptyText`.
    pub fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        let bytes = fs::read(path).map_err(|e| ExtractionError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        self.extract_from_bytes(path, &bytes)
    }

    pub fn extract_from_bytes(
        &self,
        path: &Path,
        bytes: &[u8],
    ) -> Result<ExtractedText, ExtractionError> {
        let document = Document::load_mem(bytes).map_err(|e| ExtractionError::InvalidPdf {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if document.is_encrypted() {
            return Err(ExtractionError::InvalidPdf {
                path: path.to_path_buf(),
                message: "encrypted documents are not supported".to_string(),
            });
        }

        let pages = document.get_pages();
        let mut page_texts = Vec::with_capacity(pages.len());

        for page_number in pages.keys() {
            match document.extract_text(&[*page_number]) {
                Ok(text) => {
                    debug!("Page {}: {} chars", page_number, text.len());
                    page_texts.push(text);
                }
                Err(e) => {
                    warn!(
                        "Skipping page {} of {}: {}",
                        page_number,
                        path.display(),
                        e
                    );
                }
            }
        }

        let text = page_texts.join("\n").trim().to_string();

        if text.is_empty() {
            return Err(ExtractionError::EmptyText(path.to_path_buf()));
        }

        info!(
            "Extracted {} chars from {} pages of {}",
            text.chars().count(),
            pages.len(),
            path.display()
        );

        Ok(ExtractedText {
            text,
            page_count: pages.len(),
        })
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}
