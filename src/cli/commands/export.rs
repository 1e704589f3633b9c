//! Export command implementation
//!
//! This module implements the `export` command: every note of one account
//! rendered into a single archive.

use crate::cli::exit_code;
use crate::config::{load_config, FolioConfig};
use crate::core::export::{ExportCoordinator, ExportJob, ExportPhase, ExportSummary};
use crate::core::render::OutputFormat;
use crate::domain::errors::FolioError;
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::sync::watch;

/// Failures listed after a run; the rest are only counted
const MAX_LISTED_FAILURES: usize = 10;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Account to export (overrides export.account)
    #[arg(short, long)]
    pub account: Option<String>,

    /// Output format: html, md, rtf, txt or pdf (overrides export.format)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Archive to write (overrides export.destination)
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Notes rendered in parallel (overrides export.workers)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Replace an existing archive without asking
    #[arg(short, long)]
    pub yes: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };
        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(exit_code::CONFIGURATION);
        }

        let job = match build_job(&config) {
            Ok(job) => job,
            Err(e) => {
                eprintln!("{e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        if job.destination.exists() && !self.yes && !confirm_overwrite(&job)? {
            println!("Export cancelled.");
            return Ok(exit_code::SUCCESS);
        }

        let coordinator = match ExportCoordinator::new(config, shutdown_signal).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        println!("Exporting account '{}' as {}...", job.account, job.format);
        let reporter = tokio::spawn(report_progress(coordinator.subscribe()));

        let result = coordinator.execute_export(&job).await;
        reporter.abort();
        eprintln!();

        let summary = match result {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for_error(&e));
            }
        };

        print_summary(&summary);
        Ok(exit_code_for_summary(&summary))
    }

    fn apply_overrides(&self, config: &mut FolioConfig) {
        if let Some(account) = &self.account {
            config.export.account = Some(account.clone());
        }
        if let Some(format) = &self.format {
            tracing::info!(format = %format, "Overriding export format from CLI");
            config.export.format = format.clone();
        }
        if let Some(destination) = &self.destination {
            config.export.destination = Some(destination.clone());
        }
        if let Some(workers) = self.workers {
            config.export.workers = workers;
        }
    }
}

/// Assemble the job from the merged configuration
fn build_job(config: &FolioConfig) -> Result<ExportJob, FolioError> {
    let format: OutputFormat = config
        .export
        .output_format()
        .map_err(FolioError::Validation)?;
    let job = ExportJob::new(
        config.export.account.clone().unwrap_or_default(),
        format,
        config.export.destination.clone().unwrap_or_default(),
    );
    job.validate()?;
    Ok(job)
}

fn confirm_overwrite(job: &ExportJob) -> anyhow::Result<bool> {
    print!("{} already exists. Replace it? [y/N]: ", job.destination.display());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

async fn report_progress(mut progress: watch::Receiver<crate::core::export::ExportProgress>) {
    while progress.changed().await.is_ok() {
        let snapshot = *progress.borrow_and_update();
        if snapshot.phase == ExportPhase::Running && snapshot.total > 0 {
            eprint!(
                "\r  {}/{} notes ({:.0}%)",
                snapshot.processed,
                snapshot.total,
                snapshot.fraction() * 100.0
            );
        }
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("Export Summary:");
    println!("  Job: {}", summary.job_id);
    println!("  Total Notes: {}", summary.total_notes);
    println!("  Exported: {}", summary.exported_notes);
    println!("  Failed: {}", summary.failed_notes);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    if let Some(path) = &summary.archive_path {
        println!("  Archive: {}", path.display());
    }
    println!();

    if !summary.failures.is_empty() {
        println!("Notes not exported:");
        for failure in summary.failures.iter().take(MAX_LISTED_FAILURES) {
            println!("  - {} \"{}\"", failure.note_id, failure.title);
            println!("    {}: {}", failure.kind, failure.reason);
        }
        if summary.failures.len() > MAX_LISTED_FAILURES {
            println!(
                "  ... and {} more failures",
                summary.failures.len() - MAX_LISTED_FAILURES
            );
        }
        println!();
    }

    if !summary.warnings.is_empty() {
        println!("Notes exported with lossy content:");
        for warning in summary.warnings.iter().take(MAX_LISTED_FAILURES) {
            println!("  - {} \"{}\": {}", warning.note_id, warning.title, warning.message);
        }
        if summary.warnings.len() > MAX_LISTED_FAILURES {
            println!(
                "  ... and {} more",
                summary.warnings.len() - MAX_LISTED_FAILURES
            );
        }
        println!();
    }

    match summary.phase {
        ExportPhase::Cancelled => {
            println!("Export interrupted. Partial output discarded; the destination was not changed.")
        }
        _ if summary.is_successful() => println!("Export completed successfully!"),
        _ => println!("Export completed with failures"),
    }
}

fn exit_code_for_summary(summary: &ExportSummary) -> i32 {
    if summary.interrupted() {
        exit_code::CANCELLED
    } else if summary.failed_notes > 0 {
        exit_code::PARTIAL
    } else {
        exit_code::SUCCESS
    }
}

fn exit_code_for_error(error: &FolioError) -> i32 {
    match error {
        FolioError::Validation(_) | FolioError::Configuration(_) => exit_code::CONFIGURATION,
        FolioError::Source(_) => exit_code::SOURCE,
        FolioError::Cancelled => exit_code::CANCELLED,
        _ => exit_code::FATAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::summary::{FailureKind, NoteFailure};
    use crate::domain::errors::SourceError;
    use uuid::Uuid;

    #[test]
    fn test_overrides_win_over_config() {
        let args = ExportArgs {
            account: Some("Work".to_string()),
            format: Some("pdf".to_string()),
            destination: Some(PathBuf::from("out.zip")),
            workers: Some(1),
            yes: true,
        };
        let mut config = FolioConfig::default();
        config.export.account = Some("iCloud".to_string());

        args.apply_overrides(&mut config);

        assert_eq!(config.export.account.as_deref(), Some("Work"));
        assert_eq!(config.export.format, "pdf");
        assert_eq!(config.export.workers, 1);
        let job = build_job(&config).unwrap();
        assert_eq!(job.format, OutputFormat::Pdf);
        assert_eq!(job.destination, PathBuf::from("out.zip"));
    }

    #[test]
    fn test_job_requires_account_and_destination() {
        let mut config = FolioConfig::default();
        assert!(matches!(build_job(&config), Err(FolioError::Validation(_))));

        config.export.account = Some("iCloud".to_string());
        assert!(matches!(build_job(&config), Err(FolioError::Validation(_))));

        config.export.destination = Some(PathBuf::from("Notes.zip"));
        assert!(build_job(&config).is_ok());
    }

    #[test]
    fn test_exit_codes() {
        let mut summary = ExportSummary::new(Uuid::new_v4());
        summary.phase = ExportPhase::Completed;
        assert_eq!(exit_code_for_summary(&summary), exit_code::SUCCESS);

        summary.add_failure(NoteFailure::new("1", "t", FailureKind::Render, "x"));
        assert_eq!(exit_code_for_summary(&summary), exit_code::PARTIAL);

        summary.phase = ExportPhase::Cancelled;
        assert_eq!(exit_code_for_summary(&summary), exit_code::CANCELLED);

        assert_eq!(
            exit_code_for_error(&SourceError::Unavailable("down".into()).into()),
            exit_code::SOURCE
        );
        assert_eq!(
            exit_code_for_error(&FolioError::Archive("disk full".into())),
            exit_code::FATAL
        );
        assert_eq!(
            exit_code_for_error(&FolioError::Validation("busy".into())),
            exit_code::CONFIGURATION
        );
    }
}
