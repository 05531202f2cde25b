// file: src/models/question.rs
// description: persisted question and answer exchange for a document
// reference: internal data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub document_id: String,
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

impl QuestionRecord {
    pub fn new(document_id: String, question: String, answer: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            document_id,
            question,
            answer,
            timestamp: Utc::now(),
        }
    }
}
