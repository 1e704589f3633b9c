//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::core::export::job::ExportPhase;
use crate::domain::errors::FolioError;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Why a single note was not exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The source record is unusable (e.g. blank id)
    InvalidRecord,
    /// Creation or modification date could not be parsed
    DateParse,
    /// The writer for the format failed
    Render,
    /// The format has no writer
    Unsupported,
    /// Folder, file or attachment could not be written
    Write,
    /// Shutdown was observed while the note was being rendered
    Cancelled,
}

impl FailureKind {
    /// Classify a pipeline error
    pub fn from_error(error: &FolioError) -> Self {
        match error {
            FolioError::Note(_) | FolioError::Validation(_) => FailureKind::InvalidRecord,
            FolioError::DateParse(_) => FailureKind::DateParse,
            FolioError::Render(_) => FailureKind::Render,
            FolioError::Cancelled => FailureKind::Cancelled,
            _ => FailureKind::Write,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::InvalidRecord => "invalid record",
            FailureKind::DateParse => "date parse",
            FailureKind::Render => "render",
            FailureKind::Unsupported => "unsupported format",
            FailureKind::Write => "write",
            FailureKind::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// A note that was skipped, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteFailure {
    /// Source identifier of the note
    pub note_id: String,

    /// Unsanitized title, for display
    pub title: String,

    pub kind: FailureKind,

    /// Human readable reason
    pub reason: String,
}

impl NoteFailure {
    /// Create a new note failure
    pub fn new(
        note_id: impl Into<String>,
        title: impl Into<String>,
        kind: FailureKind,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            note_id: note_id.into(),
            title: title.into(),
            kind,
            reason: reason.into(),
        }
    }
}

/// A note that was written but lost content on the way
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteWarning {
    pub note_id: String,
    pub title: String,
    pub message: String,
}

impl NoteWarning {
    pub fn new(
        note_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            note_id: note_id.into(),
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Summary of an export operation
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// Identifier of the run (also names its working directory)
    pub job_id: Uuid,

    /// Phase the run ended in
    pub phase: ExportPhase,

    /// Number of notes returned by the source
    pub total_notes: usize,

    /// Number of notes written
    pub exported_notes: usize,

    /// Number of notes skipped because of a per-note failure
    pub failed_notes: usize,

    /// Duration of the export
    pub duration: Duration,

    /// Per-note failures, in completion order
    pub failures: Vec<NoteFailure>,

    /// Written notes whose output is lossy
    pub warnings: Vec<NoteWarning>,

    /// Archive produced by a completed run
    pub archive_path: Option<PathBuf>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(job_id: Uuid) -> Self {
        Self {
            job_id,
            phase: ExportPhase::Running,
            total_notes: 0,
            exported_notes: 0,
            failed_notes: 0,
            duration: Duration::from_secs(0),
            failures: Vec::new(),
            warnings: Vec::new(),
            archive_path: None,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a written note
    pub fn add_success(&mut self) {
        self.exported_notes += 1;
    }

    /// Record a skipped note
    pub fn add_failure(&mut self, failure: NoteFailure) {
        self.failed_notes += 1;
        self.failures.push(failure);
    }

    /// Record lossy output for a written note
    pub fn add_warning(&mut self, warning: NoteWarning) {
        self.warnings.push(warning);
    }

    /// Notes finished so far, successful or not
    pub fn processed(&self) -> usize {
        self.exported_notes + self.failed_notes
    }

    /// True when the run was interrupted by a shutdown request
    pub fn interrupted(&self) -> bool {
        self.phase == ExportPhase::Cancelled
    }

    /// Check if the export completed without any failed note
    pub fn is_successful(&self) -> bool {
        self.phase == ExportPhase::Completed && self.failed_notes == 0
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_notes == 0 {
            return 100.0;
        }
        (self.exported_notes as f64 / self.total_notes as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            job_id = %self.job_id,
            phase = %self.phase,
            total_notes = self.total_notes,
            exported = self.exported_notes,
            failed = self.failed_notes,
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Export finished"
        );

        if !self.failures.is_empty() {
            tracing::warn!(
                failure_count = self.failures.len(),
                "Export finished with failed notes"
            );
            for failure in &self.failures {
                tracing::warn!(
                    note_id = %failure.note_id,
                    kind = %failure.kind,
                    reason = %failure.reason,
                    "Note failure"
                );
            }
        }

        for warning in &self.warnings {
            tracing::warn!(
                note_id = %warning.note_id,
                message = %warning.message,
                "Note exported with lossy content"
            );
        }
    }
}
