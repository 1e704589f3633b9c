//! Export coordinator - main orchestrator for the export process
//!
//! This module drives one export run from request to archive: it claims the
//! run, fetches the account's notes, fans them out to blocking workers,
//! collects per-note outcomes, and finally archives the working tree.

use crate::adapters::notes::{create_note_source, NoteSource};
use crate::config::FolioConfig;
use crate::core::archive::archive_directory;
use crate::core::export::job::{ExportJob, ExportPhase, ExportProgress};
use crate::core::export::pipeline::{NoteOutcome, NotePipeline};
use crate::core::export::summary::{ExportSummary, FailureKind, NoteFailure};
use crate::core::export::workspace::WorkingDirectory;
use crate::core::render::Renderer;
use crate::domain::dates::DateParser;
use crate::domain::errors::FolioError;
use crate::domain::Result;
use crate::{log_export_complete, log_export_start, log_note_failure};
use futures::stream::{self, StreamExt};
use std::future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Export coordinator
///
/// One coordinator runs at most one export at a time; progress of the
/// current run is published on a watch channel.
pub struct ExportCoordinator {
    config: FolioConfig,
    source: Arc<dyn NoteSource + Send + Sync>,
    shutdown_signal: watch::Receiver<bool>,
    progress: watch::Sender<ExportProgress>,
}

impl ExportCoordinator {
    /// Create a coordinator reading from the configured note source
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Configuration`] if the note source cannot be
    /// built from `config`.
    pub async fn new(config: FolioConfig, shutdown_signal: watch::Receiver<bool>) -> Result<Self> {
        let source = create_note_source(&config)?;
        tracing::debug!(source = %source.describe(), "Note source ready");
        Ok(Self::with_source(config, source, shutdown_signal))
    }

    /// Create a coordinator over an existing note source
    pub fn with_source(
        config: FolioConfig,
        source: Arc<dyn NoteSource + Send + Sync>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Self {
        let (progress, _) = watch::channel(ExportProgress::default());
        Self {
            config,
            source,
            shutdown_signal,
            progress,
        }
    }

    pub fn source(&self) -> &Arc<dyn NoteSource + Send + Sync> {
        &self.source
    }

    /// Receiver of progress snapshots
    pub fn subscribe(&self) -> watch::Receiver<ExportProgress> {
        self.progress.subscribe()
    }

    /// Latest progress snapshot
    pub fn progress(&self) -> ExportProgress {
        *self.progress.borrow()
    }

    /// Execute one export
    ///
    /// Per-note failures are collected in the returned summary. A run
    /// interrupted by the shutdown signal returns `Ok` with phase
    /// [`ExportPhase::Cancelled`] and leaves the destination untouched.
    ///
    /// # Errors
    ///
    /// - [`FolioError::Validation`] if the job is incomplete or another run
    ///   is in progress; no run is started.
    /// - [`FolioError::Source`] if the note batch cannot be fetched.
    /// - [`FolioError::Filesystem`] or [`FolioError::Archive`] if the
    ///   working tree or the archive cannot be produced. On an archive
    ///   failure the working directory is kept for recovery.
    pub async fn execute_export(&self, job: &ExportJob) -> Result<ExportSummary> {
        job.validate()?;

        let claimed = self.progress.send_if_modified(|progress| {
            if progress.phase == ExportPhase::Running {
                return false;
            }
            *progress = ExportProgress::new(ExportPhase::Running, 0, 0);
            true
        });
        if !claimed {
            return Err(FolioError::Validation(
                "An export is already running".to_string(),
            ));
        }
        let claim = RunClaim {
            progress: &self.progress,
            settled: false,
        };

        match self.run(job).await {
            Ok(summary) => {
                claim.settle(summary.phase, summary.processed(), summary.total_notes);
                summary.log_summary();
                Ok(summary)
            }
            Err(e) => {
                let last = self.progress();
                claim.settle(ExportPhase::Failed, last.processed, last.total);
                tracing::error!(error = %e, "Export failed");
                Err(e)
            }
        }
    }

    async fn run(&self, job: &ExportJob) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let settings = &self.config.export;
        let rules = job.format.sanitize_rules(&settings.sanitize_rules());

        let workspace = WorkingDirectory::create(&settings.work_dir())?;
        let mut summary = ExportSummary::new(workspace.id());
        log_export_start!(summary.job_id, job.account, job.format);

        if !job.format.is_supported() {
            tracing::warn!(format = %job.format, "No writer for format; every note will fail");
        }

        let root = workspace
            .path()
            .join(job.export_root_name(&rules, &settings.fallback_name));
        tokio::fs::create_dir(&root).await.map_err(|e| {
            FolioError::Filesystem(format!(
                "Failed to create export root {}: {}",
                root.display(),
                e
            ))
        })?;

        let records = self.source.fetch_notes(&job.account).await?;
        summary.total_notes = records.len();
        self.publish(ExportPhase::Running, 0, summary.total_notes);
        tracing::info!(
            job_id = %summary.job_id,
            total_notes = summary.total_notes,
            workers = settings.workers,
            "Notes fetched"
        );

        let pipeline = Arc::new(NotePipeline::new(
            root.clone(),
            job.format.clone(),
            rules,
            settings.fallback_name.clone(),
            DateParser::new(self.config.source.date_formats.clone()),
            Renderer::new(settings.page.clone()),
        ));

        let shutdown = &self.shutdown_signal;
        let mut outcomes = stream::iter(records)
            .take_while(|_| future::ready(!*shutdown.borrow()))
            .map(|record| {
                let pipeline = Arc::clone(&pipeline);
                let cancel = self.shutdown_signal.clone();
                async move {
                    let note_id = record.id.clone();
                    let title = record.title.clone();
                    tokio::task::spawn_blocking(move || pipeline.process(record, &cancel))
                        .await
                        .unwrap_or_else(|e| {
                            NoteOutcome::Failed(NoteFailure::new(
                                note_id,
                                title,
                                FailureKind::Render,
                                format!("Worker task failed: {e}"),
                            ))
                        })
                }
            })
            .buffer_unordered(settings.workers.max(1));

        while let Some(outcome) = outcomes.next().await {
            match outcome {
                NoteOutcome::Written { warnings, .. } => {
                    summary.add_success();
                    for warning in warnings {
                        summary.add_warning(warning);
                    }
                }
                NoteOutcome::Failed(failure) => {
                    log_note_failure!(failure);
                    summary.add_failure(failure);
                }
            }
            self.publish(ExportPhase::Running, summary.processed(), summary.total_notes);
            tokio::task::yield_now().await;
        }
        drop(outcomes);

        if *self.shutdown_signal.borrow() {
            tracing::warn!(
                job_id = %summary.job_id,
                processed = summary.processed(),
                total = summary.total_notes,
                "Export cancelled; discarding partial output"
            );
            drop(workspace);
            summary.phase = ExportPhase::Cancelled;
            return Ok(summary.with_duration(start_time.elapsed()));
        }

        let destination = job.destination.clone();
        let archive_root = root.clone();
        let archived =
            tokio::task::spawn_blocking(move || archive_directory(&archive_root, &destination))
                .await
                .map_err(|e| FolioError::Archive(format!("Archive task failed: {e}")))
                .and_then(|result| result);

        match archived {
            Ok(()) => {}
            Err(e @ FolioError::Archive(_)) => {
                let kept = workspace.retain();
                tracing::error!(
                    path = %kept.display(),
                    "Working directory kept after archive failure"
                );
                return Err(e);
            }
            Err(e) => return Err(e),
        }

        if let Err(e) = workspace.remove() {
            tracing::warn!(error = %e, "Failed to clean up working directory");
        }

        summary.phase = ExportPhase::Completed;
        summary.archive_path = Some(job.destination.clone());
        let summary = summary.with_duration(start_time.elapsed());
        log_export_complete!(summary.job_id, summary.exported_notes, summary.duration);
        Ok(summary)
    }

    fn publish(&self, phase: ExportPhase, processed: usize, total: usize) {
        self.progress
            .send_replace(ExportProgress::new(phase, processed, total));
    }
}

/// The Running phase held by one run
///
/// Dropping the run future before it settles publishes
/// [`ExportPhase::Cancelled`], so the coordinator accepts new runs again.
struct RunClaim<'a> {
    progress: &'a watch::Sender<ExportProgress>,
    settled: bool,
}

impl RunClaim<'_> {
    fn settle(mut self, phase: ExportPhase, processed: usize, total: usize) {
        self.settled = true;
        self.progress
            .send_replace(ExportProgress::new(phase, processed, total));
    }
}

impl Drop for RunClaim<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let last = *self.progress.borrow();
        self.progress.send_replace(ExportProgress::new(
            ExportPhase::Cancelled,
            last.processed,
            last.total,
        ));
        tracing::warn!("Export abandoned before it finished");
    }
}
