// file: src/exporter/mod.rs
// description: question history export

pub mod json;

pub use json::{ExportManifest, ExportedDocument, JsonExporter};
