//! Logging and observability
//!
//! Structured logging through `tracing`, with an optional rolling JSON log
//! file, plus a few macros for the events every export emits.
//!
//! # Example
//!
//! ```no_run
//! use folio::logging::init_logging;
//! use folio::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export run
///
/// # Example
///
/// ```no_run
/// use folio::log_export_start;
///
/// let job_id = uuid::Uuid::new_v4();
/// log_export_start!(job_id, "iCloud", "md");
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($job_id:expr, $account:expr, $format:expr) => {
        tracing::info!(
            job_id = %$job_id,
            account = %$account,
            format = %$format,
            "Starting export"
        );
    };
}

/// Log the completion of an export run
///
/// # Example
///
/// ```no_run
/// use folio::log_export_complete;
/// use std::time::Duration;
///
/// let job_id = uuid::Uuid::new_v4();
/// log_export_complete!(job_id, 42, Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($job_id:expr, $count:expr, $duration:expr) => {
        tracing::info!(
            job_id = %$job_id,
            count = $count,
            duration_ms = $duration.as_millis(),
            "Export completed"
        );
    };
}

/// Log a note that could not be exported
///
/// Takes a [`crate::core::export::NoteFailure`].
#[macro_export]
macro_rules! log_note_failure {
    ($failure:expr) => {
        tracing::warn!(
            note_id = %$failure.note_id,
            title = %$failure.title,
            kind = %$failure.kind,
            reason = %$failure.reason,
            "Note not exported"
        );
    };
}
