//! Export orchestration
//!
//! - [`job`] - the export request and run phases
//! - [`workspace`] - per-run working directory
//! - [`pipeline`] - per-note processing
//! - [`coordinator`] - the run itself
//! - [`summary`] - results and per-note failures

pub mod coordinator;
pub mod job;
pub mod pipeline;
pub mod summary;
pub mod workspace;

pub use coordinator::ExportCoordinator;
pub use job::{ExportJob, ExportPhase, ExportProgress};
pub use pipeline::{NoteOutcome, NotePipeline};
pub use summary::{ExportSummary, FailureKind, NoteFailure, NoteWarning};
pub use workspace::WorkingDirectory;
