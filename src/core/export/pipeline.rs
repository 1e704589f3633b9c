//! Per-note processing
//!
//! One note at a time: build the note from its raw record, ensure its
//! folder, claim a unique file name, render and write. Every step is
//! synchronous and touches only the note's own files plus shared folders
//! created with create-or-reuse semantics, so any number of notes can run
//! through one [`NotePipeline`] in parallel.

use crate::core::export::summary::{FailureKind, NoteFailure, NoteWarning};
use crate::core::layout::{create_unique, ensure_path};
use crate::core::render::{OutputFormat, RenderContext, Rendered, RenderedDocument, Renderer};
use crate::core::sanitize::{sanitize_or, SanitizeRules};
use crate::domain::dates::DateParser;
use crate::domain::errors::FolioError;
use crate::domain::note::{Note, RawNoteRecord};
use crate::domain::result::Result;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

/// Result of processing one note
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteOutcome {
    /// The note was written to `path`, possibly with lossy content
    Written {
        note_id: String,
        path: PathBuf,
        warnings: Vec<NoteWarning>,
    },
    /// The note was skipped
    Failed(NoteFailure),
}

/// Settings shared by every note of one run
#[derive(Debug, Clone)]
pub struct NotePipeline {
    root: PathBuf,
    format: OutputFormat,
    rules: SanitizeRules,
    fallback_name: String,
    dates: DateParser,
    renderer: Renderer,
}

impl NotePipeline {
    /// Create a pipeline writing below `root`
    ///
    /// `rules` should already include the format's extra restrictions.
    pub fn new(
        root: PathBuf,
        format: OutputFormat,
        rules: SanitizeRules,
        fallback_name: impl Into<String>,
        dates: DateParser,
        renderer: Renderer,
    ) -> Self {
        Self {
            root,
            format,
            rules,
            fallback_name: fallback_name.into(),
            dates,
            renderer,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Process one raw record; never fails, failures are outcomes
    pub fn process(&self, record: RawNoteRecord, cancel: &watch::Receiver<bool>) -> NoteOutcome {
        let note_id = record.id.clone();
        let title = record.title.clone();

        let note = match Note::from_record(record, &self.dates) {
            Ok(note) => note,
            Err(e) => return failed(note_id, title, &e),
        };

        match self.write_note(&note, cancel) {
            Ok((path, messages)) => {
                tracing::debug!(
                    note_id = %note.id,
                    path = %path.display(),
                    "Note written"
                );
                let warnings = messages
                    .into_iter()
                    .map(|message| NoteWarning::new(note.id.as_str(), note.title.as_str(), message))
                    .collect();
                NoteOutcome::Written {
                    note_id: note.id.into_inner(),
                    path,
                    warnings,
                }
            }
            Err(failure) => NoteOutcome::Failed(failure),
        }
    }

    fn write_note(
        &self,
        note: &Note,
        cancel: &watch::Receiver<bool>,
    ) -> std::result::Result<(PathBuf, Vec<String>), NoteFailure> {
        let fail = |e: FolioError| NoteFailure::new(
            note.id.as_str(),
            note.title.as_str(),
            FailureKind::from_error(&e),
            e.to_string(),
        );

        let folder = ensure_path(&self.root, &note.path, &self.rules).map_err(fail)?;
        let base_name = sanitize_or(&note.title, &self.fallback_name, &self.rules);
        let (path, file) =
            create_unique(&folder, &base_name, self.format.extension()).map_err(fail)?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| base_name.clone());
        let ctx = RenderContext::new(note, &stem).with_cancellation(cancel);

        let written = match self.renderer.render(&self.format, &ctx) {
            Ok(Rendered::Document(document)) => {
                write_document(file, &folder, &document).map(|()| document.warnings)
            }
            Ok(Rendered::Unsupported) => {
                discard(&path);
                return Err(NoteFailure::new(
                    note.id.as_str(),
                    note.title.as_str(),
                    FailureKind::Unsupported,
                    format!("No writer for format '{}'", self.format),
                ));
            }
            Err(e) => Err(e),
        };

        match written {
            Ok(warnings) => Ok((path, warnings)),
            Err(e) => {
                discard(&path);
                Err(fail(e))
            }
        }
    }
}

fn write_document(mut file: File, folder: &Path, document: &RenderedDocument) -> Result<()> {
    file.write_all(&document.bytes)?;
    file.flush()?;

    let mut written: Vec<PathBuf> = Vec::with_capacity(document.attachments.len());
    for attachment in &document.attachments {
        let target = folder.join(&attachment.relative_path);
        if let Err(e) = write_attachment(&target, &attachment.attachment.data) {
            for path in &written {
                discard(path);
            }
            return Err(e);
        }
        written.push(target);
    }
    Ok(())
}

fn write_attachment(target: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
        .map_err(|e| {
            FolioError::Filesystem(format!(
                "Failed to write attachment {}: {}",
                target.display(),
                e
            ))
        })?;
    out.write_all(data)?;
    Ok(())
}

/// Remove a claimed file whose content could not be produced
fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial file");
    }
}

fn failed(note_id: String, title: String, error: &FolioError) -> NoteOutcome {
    NoteOutcome::Failed(NoteFailure::new(
        note_id,
        title,
        FailureKind::from_error(error),
        error.to_string(),
    ))
}
