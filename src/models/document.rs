// file: src/models/document.rs
// description: uploaded PDF document with its extracted text
// reference: internal data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub filename: String,
    pub file_path: String,
    pub extracted_text: String,
    pub content_hash: String,
    pub page_count: usize,
    pub upload_date: DateTime<Utc>,
}

impl Document {
    pub fn new(
        filename: String,
        file_path: String,
        extracted_text: String,
        page_count: usize,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4().to_string(),
            filename,
            file_path,
            extracted_text,
            page_count,
        )
    }

    pub fn with_id(
        id: String,
        filename: String,
        file_path: String,
        extracted_text: String,
        page_count: usize,
    ) -> Self {
        let content_hash = Self::compute_hash(&extracted_text);

        Self {
            id,
            filename,
            file_path,
            extracted_text,
            content_hash,
            page_count,
            upload_date: Utc::now(),
        }
    }

    fn compute_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Character count of the extracted text.
    pub fn text_len(&self) -> usize {
        self.extracted_text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = Document::new(
            "report.pdf".to_string(),
            "uploads/abc.pdf".to_string(),
            "Paris is the capital of France.".to_string(),
            1,
        );

        assert_eq!(doc.filename, "report.pdf");
        assert_eq!(doc.content_hash.len(), 64);
        assert_eq!(doc.text_len(), 31);
        assert!(Uuid::parse_str(&doc.id).is_ok());
    }

    #[test]
    fn test_hash_consistency() {
        let content = "Test content";
        let hash1 = Document::compute_hash(content);
        let hash2 = Document::compute_hash(content);
        assert_eq!(hash1, hash2);
    }
}
