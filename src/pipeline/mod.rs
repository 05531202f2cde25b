// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod answerer;
mod processor;
mod progress;
#[cfg(test)]
pub(crate) mod testing;

pub use answerer::{ANSWER_INSTRUCTIONS, Answerer, NO_ANSWER_GENERATED, NO_RELEVANT_INFORMATION};
pub use processor::{Answer, AnswerOutcome, NO_CONTENT, PdfProcessor};
pub use progress::{AnswerStats, ProgressTracker};
