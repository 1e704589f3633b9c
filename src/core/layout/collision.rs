//! File name collision resolution
//!
//! Candidates are tried in a fixed order: `name.ext`, then `name (1).ext`,
//! `name (2).ext` and so on with no upper bound. Existence is always checked
//! against the live filesystem, never a cache.

use crate::domain::errors::FolioError;
use crate::domain::result::Result;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name for candidate `n` (0 is the unnumbered name)
pub fn candidate_name(base_name: &str, extension: &str, n: usize) -> String {
    let stem = if n == 0 {
        base_name.to_string()
    } else {
        format!("{base_name} ({n})")
    };

    if extension.is_empty() {
        stem
    } else {
        format!("{stem}.{extension}")
    }
}

/// Return the first candidate path in `directory` that does not exist yet
///
/// This only reports; another writer may take the path before the caller
/// does. Use [`create_unique`] when the file is about to be written.
pub fn resolve_unique_path(directory: &Path, base_name: &str, extension: &str) -> PathBuf {
    let mut n = 0;
    loop {
        let candidate = directory.join(candidate_name(base_name, extension, n));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Claim the first free candidate by creating it
///
/// The file is opened with `create_new`, so two concurrent writers can
/// never end up with the same path: the loser sees `AlreadyExists` and
/// moves on to the next candidate.
///
/// # Errors
///
/// Returns [`FolioError::Filesystem`] for any error other than the
/// candidate already existing.
pub fn create_unique(directory: &Path, base_name: &str, extension: &str) -> Result<(PathBuf, File)> {
    let mut n = 0;
    loop {
        let candidate = directory.join(candidate_name(base_name, extension, n));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
            Err(e) => {
                return Err(FolioError::Filesystem(format!(
                    "Failed to create {}: {}",
                    candidate.display(),
                    e
                )))
            }
        }
    }
}
