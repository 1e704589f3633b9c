//! In-memory note source

use super::traits::NoteSource;
use crate::domain::errors::SourceError;
use crate::domain::note::RawNoteRecord;
use crate::domain::Result;
use async_trait::async_trait;

/// Note source holding its accounts in memory
///
/// Accounts keep their insertion order. Useful for embedding the exporter
/// behind another front end and for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNoteSource {
    accounts: Vec<(String, Vec<RawNoteRecord>)>,
}

impl InMemoryNoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an account
    pub fn with_account(mut self, name: impl Into<String>, notes: Vec<RawNoteRecord>) -> Self {
        let name = name.into();
        match self.accounts.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = notes,
            None => self.accounts.push((name, notes)),
        }
        self
    }
}

#[async_trait]
impl NoteSource for InMemoryNoteSource {
    fn describe(&self) -> String {
        format!("memory ({} accounts)", self.accounts.len())
    }

    async fn list_accounts(&self) -> Result<Vec<String>> {
        Ok(self.accounts.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn fetch_notes(&self, account: &str) -> Result<Vec<RawNoteRecord>> {
        self.accounts
            .iter()
            .find(|(name, _)| name == account)
            .map(|(_, notes)| notes.clone())
            .ok_or_else(|| SourceError::AccountNotFound(account.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str) -> RawNoteRecord {
        RawNoteRecord {
            id: id.to_string(),
            title: format!("Note {id}"),
            content: String::new(),
            creation_date: "2024-01-01T00:00:00Z".to_string(),
            modification_date: "2024-01-01T00:00:00Z".to_string(),
            path: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_accounts_in_insertion_order() {
        let source = InMemoryNoteSource::new()
            .with_account("Work", vec![note("1")])
            .with_account("Home", vec![])
            .with_account("Work", vec![note("1"), note("2")]);

        assert_eq!(source.list_accounts().await.unwrap(), vec!["Work", "Home"]);
        assert_eq!(source.fetch_notes("Work").await.unwrap().len(), 2);
        assert!(source.fetch_notes("Home").await.unwrap().is_empty());
        assert!(source.fetch_notes("Gone").await.is_err());
    }
}
