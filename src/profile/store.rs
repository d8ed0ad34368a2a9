//! Reading and writing profile documents.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::profile::document::ConfigDocument;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Parse a document from JSON text.
///
/// An empty object, or one carrying none of the known blocks, yields the
/// default profile.
pub fn parse_document(content: &str) -> Result<ConfigDocument, DocumentError> {
    serde_json::from_str(content).map_err(DocumentError::Parse)
}

/// Load a document from a JSON file.
pub fn load_document(path: &Path) -> Result<ConfigDocument, DocumentError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let document = serde_json::from_reader(reader).map_err(DocumentError::Parse)?;
    tracing::debug!(path = ?path, "Loaded profile document");
    Ok(document)
}

/// Write a document as pretty-printed JSON.
pub fn save_document(path: &Path, document: &ConfigDocument) -> Result<(), DocumentError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document).map_err(DocumentError::Serialize)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    tracing::debug!(path = ?path, "Saved profile document");
    Ok(())
}
