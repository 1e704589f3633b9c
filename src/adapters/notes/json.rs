//! JSON file note source
//!
//! Reads an export fixture of the form
//!
//! ```json
//! { "accounts": [ { "name": "iCloud", "notes": [ { "id": "...", "title": "...",
//!   "content": "<div>...</div>", "creation_date": "...",
//!   "modification_date": "...", "path": ["Cooking"] } ] } ] }
//! ```
//!
//! The file is re-read on every call, so edits show up without a restart.

use super::traits::NoteSource;
use crate::domain::errors::SourceError;
use crate::domain::note::RawNoteRecord;
use crate::domain::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// On-disk layout of a note fixture
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteFile {
    #[serde(default)]
    pub accounts: Vec<AccountNotes>,
}

/// One account and its notes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountNotes {
    pub name: String,
    #[serde(default)]
    pub notes: Vec<RawNoteRecord>,
}

/// Note source backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonNoteSource {
    path: PathBuf,
}

impl JsonNoteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<NoteFile> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound(self.path.display().to_string()),
            _ => SourceError::Unavailable(format!("{}: {}", self.path.display(), e)),
        })?;

        let file = serde_json::from_slice(&bytes).map_err(|e| {
            SourceError::Malformed(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(file)
    }
}

#[async_trait]
impl NoteSource for JsonNoteSource {
    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }

    async fn list_accounts(&self) -> Result<Vec<String>> {
        let file = self.load().await?;
        Ok(file.accounts.into_iter().map(|a| a.name).collect())
    }

    async fn fetch_notes(&self, account: &str) -> Result<Vec<RawNoteRecord>> {
        let file = self.load().await?;
        let notes = file
            .accounts
            .into_iter()
            .find(|a| a.name == account)
            .map(|a| a.notes)
            .ok_or_else(|| SourceError::AccountNotFound(account.to_string()))?;

        tracing::debug!(
            source = %self.describe(),
            account,
            count = notes.len(),
            "Fetched notes"
        );
        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::FolioError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fixture(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const SAMPLE: &str = r#"{
        "accounts": [
            { "name": "iCloud", "notes": [
                { "id": "n1", "title": "Groceries", "content": "<div>milk</div>",
                  "creation_date": "2024-03-01T10:00:00Z",
                  "modification_date": "2024-03-01T10:00:00Z", "path": [] }
            ] },
            { "name": "On My Mac" }
        ]
    }"#;

    #[tokio::test]
    async fn test_list_accounts() {
        let file = fixture(SAMPLE);
        let source = JsonNoteSource::new(file.path());
        assert_eq!(
            source.list_accounts().await.unwrap(),
            vec!["iCloud".to_string(), "On My Mac".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fetch_notes() {
        let file = fixture(SAMPLE);
        let source = JsonNoteSource::new(file.path());

        let notes = source.fetch_notes("iCloud").await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Groceries");

        assert!(source.fetch_notes("On My Mac").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let file = fixture(SAMPLE);
        let source = JsonNoteSource::new(file.path());
        let err = source.fetch_notes("Work").await.unwrap_err();
        assert!(matches!(
            err,
            FolioError::Source(SourceError::AccountNotFound(ref name)) if name == "Work"
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let source = JsonNoteSource::new("/nonexistent/notes.json");
        let err = source.list_accounts().await.unwrap_err();
        assert!(matches!(err, FolioError::Source(SourceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let file = fixture("{ \"accounts\": 3 }");
        let source = JsonNoteSource::new(file.path());
        let err = source.fetch_notes("iCloud").await.unwrap_err();
        assert!(matches!(err, FolioError::Source(SourceError::Malformed(_))));
    }
}
