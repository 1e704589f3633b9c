//! Configuration management for Folio.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Folio uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `FOLIO_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use folio::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("folio.toml")?;
//!
//! println!("Format: {}", config.export.format);
//! println!("Workers: {}", config.export.workers);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`SourceConfig`] - Where notes come from and how their dates read
//! - [`ExportConfig`] - Format, parallelism, naming rules, page layout
//! - [`LoggingConfig`] - Optional JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [source]
//! kind = "json"
//! path = "${HOME}/notes.json"
//!
//! [export]
//! account = "iCloud"
//! format = "md"
//! workers = 4
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{ApplicationConfig, ExportConfig, FolioConfig, LoggingConfig, SourceConfig};
