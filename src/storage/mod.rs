// file: src/storage/mod.rs
// description: uploaded file and record persistence exports
// reference: internal module structure

pub mod files;
pub mod records;

pub use files::{FileStorage, LocalFileStorage};
pub use records::{JsonRecordStore, RecordStore};
