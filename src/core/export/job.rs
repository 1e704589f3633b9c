//! Export job description and run state
//!
//! An [`ExportJob`] is the immutable request handed to the coordinator: which
//! account, which format, where the archive goes. Run state is published
//! separately as [`ExportProgress`] snapshots.

use crate::core::render::OutputFormat;
use crate::core::sanitize::{sanitize_or, SanitizeRules};
use crate::domain::errors::FolioError;
use crate::domain::ids::AccountName;
use crate::domain::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Archive extension stripped from the destination to name the export root
pub const ARCHIVE_EXTENSION: &str = "zip";

/// One export request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportJob {
    /// Note source account to export
    pub account: String,

    /// Output document format
    pub format: OutputFormat,

    /// Archive file to produce
    pub destination: PathBuf,
}

impl ExportJob {
    /// Create a new export job
    pub fn new(
        account: impl Into<String>,
        format: OutputFormat,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            account: account.into(),
            format,
            destination: destination.into(),
        }
    }

    /// Check the request can start
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Validation`] when no account or no destination
    /// was selected.
    pub fn validate(&self) -> Result<()> {
        AccountName::new(self.account.as_str())
            .map_err(|e| FolioError::Validation(format!("No source account selected: {e}")))?;
        if self.destination.as_os_str().is_empty() {
            return Err(FolioError::Validation(
                "No destination archive selected".to_string(),
            ));
        }
        Ok(())
    }

    /// Name of the top-level folder inside the archive
    ///
    /// The destination file name without its archive extension, sanitized.
    pub fn export_root_name(&self, rules: &SanitizeRules, fallback: &str) -> String {
        sanitize_or(&strip_archive_extension(&self.destination), fallback, rules)
    }
}

fn strip_archive_extension(destination: &Path) -> String {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let cut = name.len().saturating_sub(ARCHIVE_EXTENSION.len() + 1);
    match name.get(cut..) {
        Some(ext)
            if cut > 0 && ext.eq_ignore_ascii_case(&format!(".{ARCHIVE_EXTENSION}")) =>
        {
            name[..cut].to_string()
        }
        _ => name,
    }
}

/// Lifecycle phase of the coordinator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportPhase {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl ExportPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ExportPhase::Completed | ExportPhase::Failed | ExportPhase::Cancelled
        )
    }
}

impl fmt::Display for ExportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportPhase::Idle => "idle",
            ExportPhase::Running => "running",
            ExportPhase::Completed => "completed",
            ExportPhase::Failed => "failed",
            ExportPhase::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Snapshot published on the progress channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportProgress {
    pub phase: ExportPhase,

    /// Notes finished so far, successful or not
    pub processed: usize,

    /// Notes returned by the source; zero until they are fetched
    pub total: usize,
}

impl ExportProgress {
    pub fn new(phase: ExportPhase, processed: usize, total: usize) -> Self {
        Self {
            phase,
            processed,
            total,
        }
    }

    /// Completion ratio in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return if self.phase == ExportPhase::Completed { 1.0 } else { 0.0 };
        }
        self.processed as f64 / self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_account_and_destination() {
        let ok = ExportJob::new("iCloud", OutputFormat::Html, "/tmp/Backup.zip");
        assert!(ok.validate().is_ok());

        let no_account = ExportJob::new("  ", OutputFormat::Html, "/tmp/Backup.zip");
        assert!(matches!(no_account.validate(), Err(FolioError::Validation(_))));

        let no_destination = ExportJob::new("iCloud", OutputFormat::Html, "");
        assert!(matches!(
            no_destination.validate(),
            Err(FolioError::Validation(_))
        ));
    }

    #[test]
    fn test_export_root_name() {
        let rules = SanitizeRules::default();
        let job = |dest: &str| ExportJob::new("a", OutputFormat::Html, dest);

        assert_eq!(job("/out/Backup.zip").export_root_name(&rules, "Export"), "Backup");
        assert_eq!(job("/out/Notes 2024.ZIP").export_root_name(&rules, "Export"), "Notes 2024");
        assert_eq!(job("/out/archive").export_root_name(&rules, "Export"), "archive");
        assert_eq!(job("/out/.zip").export_root_name(&rules, "Export"), "zip");
        assert_eq!(job("/out/??.zip").export_root_name(&rules, "Export"), "Export");
    }

    #[test]
    fn test_phase_terminal() {
        assert!(!ExportPhase::Idle.is_terminal());
        assert!(!ExportPhase::Running.is_terminal());
        assert!(ExportPhase::Completed.is_terminal());
        assert!(ExportPhase::Failed.is_terminal());
        assert!(ExportPhase::Cancelled.is_terminal());
        assert_eq!(ExportPhase::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(ExportProgress::new(ExportPhase::Running, 1, 4).fraction(), 0.25);
        assert_eq!(ExportProgress::new(ExportPhase::Running, 0, 0).fraction(), 0.0);
        assert_eq!(ExportProgress::new(ExportPhase::Completed, 0, 0).fraction(), 1.0);
    }
}
