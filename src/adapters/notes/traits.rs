//! Note source traits
//!
//! This module defines the trait that note sources must implement to feed
//! the export pipeline.

use crate::domain::note::RawNoteRecord;
use crate::domain::Result;
use async_trait::async_trait;

/// A provider of raw note records, grouped by account
///
/// Implementations return every note of an account in one batch. Any `Err`
/// fails the whole run; an empty batch is a valid, empty export.
#[async_trait]
pub trait NoteSource: Send + Sync {
    /// Human readable description of the source, for logs
    fn describe(&self) -> String;

    /// Names of the accounts this source exposes
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SourceError`] wrapped in a `FolioError` if
    /// the source cannot be read.
    async fn list_accounts(&self) -> Result<Vec<String>>;

    /// Every note of `account`, in source order
    ///
    /// # Errors
    ///
    /// Returns `SourceError::AccountNotFound` for an unknown account and
    /// other [`crate::domain::SourceError`] variants if the source cannot
    /// be read.
    async fn fetch_notes(&self, account: &str) -> Result<Vec<RawNoteRecord>>;
}
