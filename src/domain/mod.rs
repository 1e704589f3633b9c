//! Domain models and types for Folio.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`NoteId`], [`AccountName`])
//! - **Domain models** ([`Note`], [`RawNoteRecord`], [`Attachment`])
//! - **Date normalisation** ([`DateParser`])
//! - **Error types** ([`FolioError`], [`SourceError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, FolioError>`]:
//!
//! ```rust
//! use folio::domain::{DateParser, Note, RawNoteRecord, Result};
//!
//! fn example(record: RawNoteRecord) -> Result<Note> {
//!     // Date parse failures surface as FolioError::DateParse
//!     Note::from_record(record, &DateParser::default())
//! }
//! ```

pub mod dates;
pub mod errors;
pub mod ids;
pub mod note;
pub mod result;

// Re-export commonly used types for convenience
pub use dates::{DateParser, DEFAULT_DATE_FORMATS};
pub use errors::{FolioError, SourceError};
pub use ids::{AccountName, NoteId};
pub use note::{Attachment, Note, RawNoteRecord};
pub use result::Result;
