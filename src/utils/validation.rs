// file: src/utils/validation.rs
// description: upload and question validation helpers
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            PipelineError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(PipelineError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    /// Accepts names ending in `.pdf`, case-insensitively.
    pub fn validate_pdf_filename(filename: &str) -> Result<()> {
        let is_pdf = Path::new(filename.trim())
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        if !is_pdf {
            return Err(PipelineError::Validation(
                "Only PDF files are allowed".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_upload_size(size: usize, max_size_mb: usize) -> Result<()> {
        if size == 0 {
            return Err(PipelineError::Validation("Uploaded file is empty".to_string()));
        }

        let max_bytes = max_size_mb.saturating_mul(1_048_576);
        if size > max_bytes {
            return Err(PipelineError::Validation(format!(
                "Uploaded file is too large ({} bytes, max {} MB)",
                size, max_size_mb
            )));
        }

        Ok(())
    }

    pub fn validate_question(question: &str) -> Result<()> {
        if question.trim().is_empty() {
            return Err(PipelineError::Validation("Question is empty".to_string()));
        }
        Ok(())
    }

    /// Display name for an upload: the final path component, separators normalised.
    pub fn sanitize_filename(name: &str) -> String {
        let normalized = name.replace('\\', "/");
        normalized
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_file_path() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("test.pdf");
        fs::write(&file_path, "test").unwrap();

        assert!(Validator::validate_file_path(&file_path).is_ok());
        assert!(Validator::validate_file_path(temp.path()).is_err());
        assert!(Validator::validate_file_path(Path::new("/nonexistent")).is_err());
    }

    #[test]
    fn test_validate_pdf_filename() {
        assert!(Validator::validate_pdf_filename("report.pdf").is_ok());
        assert!(Validator::validate_pdf_filename("REPORT.PDF").is_ok());
        assert!(Validator::validate_pdf_filename("report.txt").is_err());
        assert!(Validator::validate_pdf_filename("pdf").is_err());
        assert!(Validator::validate_pdf_filename("").is_err());
    }

    #[test]
    fn test_validate_upload_size() {
        assert!(Validator::validate_upload_size(10, 1).is_ok());
        assert!(Validator::validate_upload_size(0, 1).is_err());
        assert!(Validator::validate_upload_size(1_048_577, 1).is_err());
    }

    #[test]
    fn test_validate_question() {
        assert!(Validator::validate_question("What?").is_ok());
        assert!(Validator::validate_question("  \n ").is_err());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(Validator::sanitize_filename("dir\\sub\\file.pdf"), "file.pdf");
        assert_eq!(Validator::sanitize_filename("/tmp/a/b.pdf"), "b.pdf");
        assert_eq!(Validator::sanitize_filename("  plain.pdf "), "plain.pdf");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a ..."
        );
        assert_eq!(Validator::truncate_text("héllo wörld", 5), "héllo...");
    }
}
