//! Core business logic for Folio.
//!
//! # Modules
//!
//! - [`sanitize`] - turning titles into safe file names
//! - [`layout`] - folder hierarchy and collision-free file names
//! - [`render`] - note content to output documents
//! - [`archive`] - packing the finished tree
//! - [`export`] - orchestration of a whole run
//!
//! # Export Workflow
//!
//! 1. **Claim**: validate the job and move the coordinator to `Running`
//! 2. **Fetch**: read every note of the account from the note source
//! 3. **Process**: per note, build folders, claim a name, render, write
//! 4. **Archive**: zip the tree to the destination
//! 5. **Report**: return the summary with per-note failures
//!
//! # Example
//!
//! ```rust,no_run
//! use folio::config::load_config;
//! use folio::core::export::{ExportCoordinator, ExportJob};
//! use folio::core::render::OutputFormat;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("folio.toml")?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let coordinator = ExportCoordinator::new(config, shutdown_rx).await?;
//! let job = ExportJob::new("iCloud", OutputFormat::Markdown, "Notes.zip");
//! let summary = coordinator.execute_export(&job).await?;
//!
//! println!("Exported: {}", summary.exported_notes);
//! println!("Failed: {}", summary.failed_notes);
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod export;
pub mod layout;
pub mod render;
pub mod sanitize;
