//! Folder hierarchy reconstruction
//!
//! Notes carry their folder placement as a flat, root-first list of names.
//! [`ensure_path`] rebuilds the matching directory chain under the export
//! root lazily, one note at a time. Creation is create-or-reuse, so notes
//! sharing a prefix can race on the same directory without locking.
//!
//! A folder name can clash with a note file already written in the same
//! parent (folder `Cooking.html` next to note `Cooking`). The folder then
//! takes the next free numbered name, `Cooking.html (1)`, so neither note
//! is lost whichever one gets there first.

use super::collision::candidate_name;
use crate::core::sanitize::{sanitize, SanitizeRules};
use crate::domain::errors::FolioError;
use crate::domain::result::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Ensure the directory for `segments` exists below `root` and return it
///
/// Each segment is sanitized first; segments that sanitize to nothing are
/// elided instead of producing empty or dot directories.
///
/// # Errors
///
/// Returns [`FolioError::Filesystem`] if a directory cannot be created.
pub fn ensure_path<S: AsRef<str>>(
    root: &Path,
    segments: &[S],
    rules: &SanitizeRules,
) -> Result<PathBuf> {
    let mut current = root.to_path_buf();

    for segment in segments {
        let name = sanitize(segment.as_ref(), rules);
        if name.is_empty() {
            tracing::debug!(
                segment = %segment.as_ref(),
                "Eliding folder segment that sanitizes to nothing"
            );
            continue;
        }

        current = create_or_reuse(&current, &name)?;
    }

    Ok(current)
}

/// Existing directory `name` under `parent`, or the first numbered
/// variant that is a directory or can be created as one
fn create_or_reuse(parent: &Path, name: &str) -> Result<PathBuf> {
    let mut n = 0;
    loop {
        let dir = parent.join(candidate_name(name, "", n));
        match fs::create_dir(&dir) {
            Ok(()) => {
                tracing::trace!(path = %dir.display(), "Created folder");
                return Ok(dir);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if dir.is_dir() {
                    return Ok(dir);
                }
                tracing::debug!(
                    path = %dir.display(),
                    "File occupies folder name, trying next candidate"
                );
                n += 1;
            }
            Err(e) => {
                return Err(FolioError::Filesystem(format!(
                    "Failed to create folder {}: {}",
                    dir.display(),
                    e
                )))
            }
        }
    }
}
