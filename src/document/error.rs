//! Document error types

use thiserror::Error;

/// Failure to turn input bytes into a document
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The bytes are not a decodable PDF
    #[error("Invalid PDF document: {0}")]
    InvalidDocument(#[from] lopdf::Error),

    /// Failed to read the document from disk
    #[error("Failed to read document {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
