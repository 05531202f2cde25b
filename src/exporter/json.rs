// file: src/exporter/json.rs
// description: json export of documents and their question history

use crate::error::{PipelineError, Result};
use crate::models::{Document, QuestionRecord};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportedDocument<'a> {
    pub exported_at: String,
    #[serde(flatten)]
    pub document: &'a Document,
    pub questions: &'a [QuestionRecord],
}

#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub total_documents: usize,
    pub total_questions: usize,
    pub files: Vec<String>,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Writes `<document id>.json` and returns its path.
    pub fn export_document(
        &self,
        document: &Document,
        questions: &[QuestionRecord],
        pretty: bool,
    ) -> Result<PathBuf> {
        let exported = ExportedDocument {
            exported_at: Utc::now().to_rfc3339(),
            document,
            questions,
        };

        let path = self.output_dir.join(format!("{}.json", document.id));
        fs::write(&path, to_json(&exported, pretty)?)?;

        info!(
            "Exported {} with {} questions to {}",
            document.filename,
            questions.len(),
            path.display()
        );
        Ok(path)
    }

    /// Exports every document and writes `manifest.json` alongside.
    pub fn export_all(
        &self,
        entries: &[(Document, Vec<QuestionRecord>)],
        pretty: bool,
    ) -> Result<ExportManifest> {
        info!("Starting JSON export to {:?}", self.output_dir);

        let mut files = Vec::with_capacity(entries.len());
        for (document, questions) in entries {
            let path = self.export_document(document, questions, pretty)?;
            if let Some(name) = path.file_name() {
                files.push(name.to_string_lossy().into_owned());
            }
        }

        let manifest = ExportManifest {
            exported_at: Utc::now().to_rfc3339(),
            total_documents: entries.len(),
            total_questions: entries.iter().map(|(_, questions)| questions.len()).sum(),
            files,
        };

        fs::write(
            self.output_dir.join("manifest.json"),
            to_json(&manifest, true)?,
        )?;

        info!(
            "Export complete: {} documents exported",
            manifest.total_documents
        );
        Ok(manifest)
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.map_err(|e| PipelineError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn document() -> Document {
        Document::new(
            "paris.pdf".to_string(),
            "uploads/x.pdf".to_string(),
            "Paris is the capital of France.".to_string(),
            1,
        )
    }

    #[test]
    fn test_export_document_includes_history() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path().join("out")).unwrap();
        let doc = document();
        let questions = vec![QuestionRecord::new(
            doc.id.clone(),
            "What is the capital of France?".to_string(),
            "Paris".to_string(),
        )];

        let path = exporter.export_document(&doc, &questions, true).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(value["id"], doc.id.as_str());
        assert_eq!(value["filename"], "paris.pdf");
        assert_eq!(value["questions"][0]["answer"], "Paris");
        assert!(value["exported_at"].is_string());
    }

    #[test]
    fn test_export_all_writes_manifest() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path()).unwrap();
        let entries = vec![(document(), Vec::new()), (document(), Vec::new())];

        let manifest = exporter.export_all(&entries, false).unwrap();

        assert_eq!(manifest.total_documents, 2);
        assert_eq!(manifest.total_questions, 0);
        assert_eq!(manifest.files.len(), 2);
        assert!(dir.path().join("manifest.json").exists());
    }
}
