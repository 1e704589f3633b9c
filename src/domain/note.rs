//! Note domain model
//!
//! A [`RawNoteRecord`] is what a note source hands over: every field still
//! a string. [`Note`] is the canonical, validated form the rest of the
//! pipeline works with. Notes are built once per record and never mutated.

use crate::domain::dates::DateParser;
use crate::domain::errors::FolioError;
use crate::domain::ids::NoteId;
use crate::domain::result::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw note record as returned by a note source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNoteRecord {
    /// Opaque source identifier
    pub id: String,

    /// User-authored title
    #[serde(default)]
    pub title: String,

    /// Rich content markup (HTML fragment)
    #[serde(default)]
    pub content: String,

    /// Locale-formatted creation date
    pub creation_date: String,

    /// Locale-formatted modification date
    pub modification_date: String,

    /// Folder names, root first
    #[serde(default)]
    pub path: Vec<String>,
}

/// One exported note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Source identifier, for traceability
    pub id: NoteId,

    /// User-authored title, unsanitized
    pub title: String,

    /// Canonical rich content (HTML fragment)
    pub content: String,

    /// Creation instant
    pub created_at: DateTime<Utc>,

    /// Last modification instant
    pub modified_at: DateTime<Utc>,

    /// Folder names, root first, unsanitized
    pub path: Vec<String>,
}

impl Note {
    /// Build a note from a raw record, parsing both dates
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Note`] for a blank id and
    /// [`FolioError::DateParse`] when either date cannot be read.
    pub fn from_record(record: RawNoteRecord, dates: &DateParser) -> Result<Self> {
        let id = NoteId::new(record.id).map_err(FolioError::Note)?;

        let created_at = dates.parse(&record.creation_date).map_err(|e| {
            FolioError::DateParse(format!("creation date of note {id}: {e}"))
        })?;
        let modified_at = dates.parse(&record.modification_date).map_err(|e| {
            FolioError::DateParse(format!("modification date of note {id}: {e}"))
        })?;

        Ok(Self {
            id,
            title: record.title,
            content: record.content,
            created_at,
            modified_at,
            path: record.path,
        })
    }
}

/// Binary blob extracted from a note's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// MIME type declared by the embedding tag (e.g. `image/png`)
    pub mime_type: String,

    /// Decoded bytes
    pub data: Vec<u8>,
}

impl Attachment {
    /// Create a new attachment
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// File extension for this attachment's MIME type
    pub fn extension(&self) -> String {
        let mime = self.mime_type.to_ascii_lowercase();
        match mime.as_str() {
            "image/png" => "png".to_string(),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg".to_string(),
            "image/gif" => "gif".to_string(),
            "image/heic" => "heic".to_string(),
            "image/tiff" => "tiff".to_string(),
            "image/webp" => "webp".to_string(),
            "image/svg+xml" => "svg".to_string(),
            other => mime_guess::get_mime_extensions_str(other)
                .and_then(|exts| exts.first())
                .map(|ext| ext.to_string())
                .unwrap_or_else(|| "bin".to_string()),
        }
    }
}
