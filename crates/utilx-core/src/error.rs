//! Error types for the utilx-core library.

use thiserror::Error;

/// Main error type for the utilx library.
#[derive(Error, Debug)]
pub enum UtilxError {
    /// Bill extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Document-level extraction failures.
///
/// Only these abort a document. Missing sections, unparseable fields and
/// pattern timeouts degrade to partially populated records instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The document text is blank or exceeds the configured size.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No provider's keyword set is fully present in the text.
    #[error("bill provider not detected")]
    ProviderNotDetected,

    /// A provider name could not be resolved.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

/// Result type for the utilx library.
pub type Result<T> = std::result::Result<T, UtilxError>;

impl From<serde_json::Error> for UtilxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
