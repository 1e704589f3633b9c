//! Domain error types
//!
//! This module defines the error hierarchy for Folio.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Folio error type
///
/// This is the primary error type used throughout the library.
/// Run-level failures travel as `FolioError`; per-note failures are
/// recorded in the export summary instead.
#[derive(Debug, Error)]
pub enum FolioError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Rejected requests and invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Note source errors
    #[error("Note source error: {0}")]
    Source(#[from] SourceError),

    /// A single note could not be turned into a document
    #[error("Note error: {0}")]
    Note(String),

    /// A source-supplied date string could not be parsed
    #[error("Date parse error: {0}")]
    DateParse(String),

    /// Content rendering errors
    #[error("Render error: {0}")]
    Render(String),

    /// Working tree or destination directory errors
    #[error("Filesystem error: {0}")]
    Filesystem(String),

    /// Archive assembly or placement errors
    #[error("Archive error: {0}")]
    Archive(String),

    /// The run observed a cancellation request
    #[error("Export cancelled")]
    Cancelled,

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Note source errors
///
/// Errors raised while reading the raw note batch from an external source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing store (file, database, bridge) does not exist
    #[error("Source not found: {0}")]
    NotFound(String),

    /// The requested account is not known to the source
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// The source returned data that could not be decoded as a note batch
    #[error("Malformed source data: {0}")]
    Malformed(String),

    /// The source could not be reached
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for FolioError {
    fn from(err: std::io::Error) -> Self {
        FolioError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        FolioError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for FolioError {
    fn from(err: toml::de::Error) -> Self {
        FolioError::Configuration(format!("TOML parse error: {err}"))
    }
}
