// file: src/storage/records.rs
// description: persistent storage for document and question records
// reference: json file persistence with atomic rewrites

use crate::error::{PipelineError, Result};
use crate::models::{Document, QuestionRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_document(&self, document: Document) -> Result<Document>;

    async fn get_document(&self, id: &str) -> Result<Option<Document>>;

    async fn list_documents(&self) -> Result<Vec<Document>>;

    async fn create_question(&self, record: QuestionRecord) -> Result<QuestionRecord>;

    /// Questions for `document_id`, oldest first.
    async fn list_questions(&self, document_id: &str) -> Result<Vec<QuestionRecord>>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RecordSet {
    documents: Vec<Document>,
    questions: Vec<QuestionRecord>,
}

pub struct JsonRecordStore {
    storage_path: PathBuf,
    records: Mutex<RecordSet>,
}

impl JsonRecordStore {
    pub async fn open(storage_path: impl Into<PathBuf>) -> Result<Self> {
        let storage_path = storage_path.into();

        if let Some(parent) = storage_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                PipelineError::Storage(format!("Failed to create records directory: {}", e))
            })?;
        }

        let records = Self::load(&storage_path).await?;
        info!(
            "Loaded {} documents and {} questions from {}",
            records.documents.len(),
            records.questions.len(),
            storage_path.display()
        );

        Ok(Self {
            storage_path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    async fn load(path: &Path) -> Result<RecordSet> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            debug!("No existing records file at {}", path.display());
            return Ok(RecordSet::default());
        }

        let contents = fs::read_to_string(path).await.map_err(|e| {
            PipelineError::Storage(format!("Failed to read records file: {}", e))
        })?;

        if contents.trim().is_empty() {
            return Ok(RecordSet::default());
        }

        serde_json::from_str(&contents)
            .map_err(|e| PipelineError::Serialization(format!("Failed to parse records: {}", e)))
    }

    // Replaces the file through a sibling temp file and a rename.
    async fn persist(&self, records: &RecordSet) -> Result<()> {
        let contents = serde_json::to_string_pretty(records).map_err(|e| {
            PipelineError::Serialization(format!("Failed to serialize records: {}", e))
        })?;

        let temp_path = self.storage_path.with_extension("json.tmp");
        fs::write(&temp_path, contents).await.map_err(|e| {
            PipelineError::Storage(format!("Failed to write records file: {}", e))
        })?;
        fs::rename(&temp_path, &self.storage_path)
            .await
            .map_err(|e| {
                PipelineError::Storage(format!("Failed to replace records file: {}", e))
            })?;

        debug!(
            "Saved {} documents and {} questions",
            records.documents.len(),
            records.questions.len()
        );
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonRecordStore {
    async fn create_document(&self, document: Document) -> Result<Document> {
        let mut records = self.records.lock().await;
        records.documents.push(document.clone());

        if let Err(e) = self.persist(&records).await {
            records.documents.pop();
            return Err(e);
        }

        Ok(document)
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>> {
        let records = self.records.lock().await;
        Ok(records.documents.iter().find(|doc| doc.id == id).cloned())
    }

    async fn list_documents(&self) -> Result<Vec<Document>> {
        let records = self.records.lock().await;
        Ok(records.documents.clone())
    }

    async fn create_question(&self, record: QuestionRecord) -> Result<QuestionRecord> {
        let mut records = self.records.lock().await;

        if !records.documents.iter().any(|doc| doc.id == record.document_id) {
            return Err(PipelineError::NotFound(format!(
                "document {}",
                record.document_id
            )));
        }

        records.questions.push(record.clone());

        if let Err(e) = self.persist(&records).await {
            records.questions.pop();
            return Err(e);
        }

        Ok(record)
    }

    async fn list_questions(&self, document_id: &str) -> Result<Vec<QuestionRecord>> {
        let records = self.records.lock().await;
        let mut questions: Vec<QuestionRecord> = records
            .questions
            .iter()
            .filter(|record| record.document_id == document_id)
            .cloned()
            .collect();
        questions.sort_by_key(|record| record.timestamp);
        Ok(questions)
    }
}
