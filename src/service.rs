// file: src/service.rs
// description: upload and question answering operations over stored documents
// reference: application service layer

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::models::{Document, QuestionRecord};
use crate::pipeline::{Answer, PdfProcessor};
use crate::providers::build_providers;
use crate::storage::{FileStorage, JsonRecordStore, LocalFileStorage, RecordStore};
use crate::utils::Validator;
use std::sync::Arc;
use tracing::{info, warn};

/// A persisted question together with the retrieval details behind its answer.
#[derive(Debug, Clone)]
pub struct AnsweredQuestion {
    pub record: QuestionRecord,
    pub answer: Answer,
}

pub struct QaService {
    processor: Arc<PdfProcessor>,
    files: Arc<dyn FileStorage>,
    records: Arc<dyn RecordStore>,
    max_upload_size_mb: usize,
}

impl QaService {
    pub fn new(
        processor: Arc<PdfProcessor>,
        files: Arc<dyn FileStorage>,
        records: Arc<dyn RecordStore>,
        max_upload_size_mb: usize,
    ) -> Self {
        Self {
            processor,
            files,
            records,
            max_upload_size_mb,
        }
    }

    /// Wires providers, local file storage and the JSON record store from `config`.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let providers = build_providers(&config.provider)?;
        let processor = PdfProcessor::from_config(config, &providers)?;
        let records = JsonRecordStore::open(&config.storage.records_path).await?;

        Ok(Self::new(
            Arc::new(processor),
            Arc::new(LocalFileStorage::new(&config.storage.upload_dir)),
            Arc::new(records),
            config.storage.max_upload_size_mb,
        ))
    }

    pub async fn upload_pdf(&self, filename: &str, bytes: &[u8]) -> Result<Document> {
        let filename = Validator::sanitize_filename(filename);

        if let Err(e) = Validator::validate_pdf_filename(&filename)
            .and_then(|_| Validator::validate_upload_size(bytes.len(), self.max_upload_size_mb))
        {
            warn!("Rejected upload {}: {}", filename, e);
            return Err(e);
        }

        let stored_path = self.files.save(&filename, bytes).await?;

        let extracted = match self.processor.extract(&stored_path).await {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!("Rejected upload {}: {}", filename, e);
                self.discard(&stored_path).await;
                return Err(e);
            }
        };

        let document = Document::new(
            filename,
            stored_path.display().to_string(),
            extracted.text,
            extracted.page_count,
        );

        match self.records.create_document(document).await {
            Ok(document) => {
                info!(
                    "Uploaded {} as {} ({} pages, {} chars)",
                    document.filename,
                    document.id,
                    document.page_count,
                    document.text_len()
                );
                Ok(document)
            }
            Err(e) => {
                self.discard(&stored_path).await;
                Err(e)
            }
        }
    }

    /// Answers and records a question; nothing is recorded when answering fails.
    pub async fn ask(&self, document_id: &str, question: &str) -> Result<AnsweredQuestion> {
        let document = self.get_document(document_id).await?;
        Validator::validate_question(question)?;

        let answer = match self
            .processor
            .answer(&document.extracted_text, question)
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Failed to answer question for {}: {}", document.id, e);
                return Err(e);
            }
        };

        let record = self
            .records
            .create_question(QuestionRecord::new(
                document.id,
                question.trim().to_string(),
                answer.text.clone(),
            ))
            .await?;

        Ok(AnsweredQuestion { record, answer })
    }

    pub async fn ask_question(&self, document_id: &str, question: &str) -> Result<QuestionRecord> {
        Ok(self.ask(document_id, question).await?.record)
    }

    pub async fn get_document(&self, document_id: &str) -> Result<Document> {
        self.records
            .get_document(document_id)
            .await?
            .ok_or_else(|| PipelineError::NotFound(format!("document {}", document_id)))
    }

    pub async fn list_documents(&self) -> Result<Vec<Document>> {
        self.records.list_documents().await
    }

    pub async fn list_questions(&self, document_id: &str) -> Result<Vec<QuestionRecord>> {
        self.get_document(document_id).await?;
        self.records.list_questions(document_id).await
    }

    async fn discard(&self, path: &std::path::Path) {
        if let Err(e) = self.files.delete(path).await {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}
