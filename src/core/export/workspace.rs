//! Temporary working directory for one export run

use crate::domain::errors::FolioError;
use crate::domain::result::Result;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Prefix of every working directory name
pub const WORKSPACE_PREFIX: &str = "folio-";

/// Working directory owned by a single run
///
/// The directory is named after a fresh v4 UUID, so runs never share one.
/// Dropping the guard removes the tree; [`WorkingDirectory::retain`] keeps
/// it on disk instead.
#[derive(Debug)]
pub struct WorkingDirectory {
    id: Uuid,
    path: PathBuf,
    released: bool,
}

impl WorkingDirectory {
    /// Create a new, empty working directory below `base`
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Filesystem`] if the directory cannot be created.
    pub fn create(base: &Path) -> Result<Self> {
        fs::create_dir_all(base).map_err(|e| {
            FolioError::Filesystem(format!(
                "Failed to create work folder {}: {}",
                base.display(),
                e
            ))
        })?;

        let id = Uuid::new_v4();
        let path = base.join(format!("{WORKSPACE_PREFIX}{id}"));
        fs::create_dir(&path).map_err(|e| {
            FolioError::Filesystem(format!(
                "Failed to create working directory {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %path.display(), "Created working directory");
        Ok(Self {
            id,
            path,
            released: false,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the directory on disk and return its path
    pub fn retain(mut self) -> PathBuf {
        self.released = true;
        self.path.clone()
    }

    /// Remove the directory now, reporting failure
    pub fn remove(mut self) -> Result<()> {
        self.released = true;
        fs::remove_dir_all(&self.path).map_err(|e| {
            FolioError::Filesystem(format!(
                "Failed to remove working directory {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl Drop for WorkingDirectory {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = fs::remove_dir_all(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove working directory"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unique_per_run() {
        let temp = TempDir::new().unwrap();
        let a = WorkingDirectory::create(temp.path()).unwrap();
        let b = WorkingDirectory::create(temp.path()).unwrap();
        assert_ne!(a.id(), b.id());
        assert_ne!(a.path(), b.path());
        assert!(a
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(WORKSPACE_PREFIX));
    }

    #[test]
    fn test_removed_on_drop() {
        let temp = TempDir::new().unwrap();
        let path = {
            let dir = WorkingDirectory::create(temp.path()).unwrap();
            fs::write(dir.path().join("note.txt"), b"x").unwrap();
            dir.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_retain_keeps_tree() {
        let temp = TempDir::new().unwrap();
        let dir = WorkingDirectory::create(temp.path()).unwrap();
        fs::write(dir.path().join("note.txt"), b"x").unwrap();

        let kept = dir.retain();
        assert!(kept.join("note.txt").is_file());
    }

    #[test]
    fn test_explicit_remove() {
        let temp = TempDir::new().unwrap();
        let dir = WorkingDirectory::create(temp.path()).unwrap();
        let path = dir.path().to_path_buf();
        dir.remove().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_creates_missing_base() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("nested").join("work");
        let dir = WorkingDirectory::create(&base).unwrap();
        assert!(dir.path().starts_with(&base));
        assert!(dir.path().is_dir());
    }
}
