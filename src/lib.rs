// Folio - Note export tool
// Copyright (c) 2025 Folio Contributors
// Licensed under the MIT License

//! # Folio - Note export
//!
//! Folio exports every note of one account from a note source into a
//! single zip archive, one document per note, laid out in the account's
//! folder hierarchy.
//!
//! ## Overview
//!
//! - **Sanitizing** titles and folder names into safe, bounded file names
//! - **Rendering** rich note content to HTML, Markdown, RTF, plain text or PDF
//! - **Resolving** name collisions with `Name (1)`, `Name (2)`...
//! - **Archiving** the finished tree deterministically
//! - **Reporting** per-note failures without aborting the run
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (sanitize, layout, render, archive, export)
//! - [`adapters`] - Note sources
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use folio::adapters::notes::InMemoryNoteSource;
//! use folio::config::FolioConfig;
//! use folio::core::export::{ExportCoordinator, ExportJob};
//! use folio::core::render::OutputFormat;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = InMemoryNoteSource::new().with_account("iCloud", vec![]);
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let coordinator =
//!         ExportCoordinator::with_source(FolioConfig::default(), Arc::new(source), shutdown_rx);
//!
//!     let job = ExportJob::new("iCloud", OutputFormat::Html, "Notes.zip");
//!     let summary = coordinator.execute_export(&job).await?;
//!
//!     println!("Exported {} notes", summary.exported_notes);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Run-level failures are [`domain::FolioError`] values. Failures of a
//! single note never abort a run; they are collected in the
//! [`core::export::ExportSummary`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
