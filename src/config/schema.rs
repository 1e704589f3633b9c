//! Configuration schema types
//!
//! This module defines the configuration structure for Folio.

use crate::core::render::{OutputFormat, PageLayout};
use crate::core::sanitize::{SanitizeRules, DEFAULT_MAX_NAME_BYTES};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Supported note source kinds
pub const SOURCE_KINDS: &[&str] = &["json"];

/// Main Folio configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Note source settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FolioConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Note source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source kind (json)
    #[serde(default = "default_source_kind")]
    pub kind: String,

    /// Location of the source data (file for `json`)
    #[serde(default)]
    pub path: Option<String>,

    /// chrono format strings tried, in order, after RFC 3339
    ///
    /// Empty means the built-in list.
    #[serde(default)]
    pub date_formats: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: default_source_kind(),
            path: None,
            date_formats: Vec::new(),
        }
    }
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if !SOURCE_KINDS.contains(&self.kind.as_str()) {
            return Err(format!(
                "Invalid source.kind '{}'. Must be one of: {}",
                self.kind,
                SOURCE_KINDS.join(", ")
            ));
        }

        if let Some(path) = &self.path {
            if path.trim().is_empty() {
                return Err("source.path cannot be empty".to_string());
            }
        }

        if self.date_formats.iter().any(|f| f.trim().is_empty()) {
            return Err("source.date_formats cannot contain empty entries".to_string());
        }

        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Default account to export (CLI flag overrides)
    #[serde(default)]
    pub account: Option<String>,

    /// Output format (html, md, rtf, txt, pdf)
    #[serde(default = "default_format")]
    pub format: String,

    /// Default destination archive (CLI flag overrides)
    #[serde(default)]
    pub destination: Option<PathBuf>,

    /// Notes rendered in parallel
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Parent of the per-run working directory (default: OS temp dir)
    #[serde(default)]
    pub work_dir: Option<PathBuf>,

    /// Name used when a title or folder sanitizes to nothing
    #[serde(default = "default_fallback_name")]
    pub fallback_name: String,

    /// Byte cap for each sanitized name
    #[serde(default = "default_max_name_bytes")]
    pub max_name_bytes: usize,

    /// Remove emoji from names
    #[serde(default = "default_true")]
    pub strip_emoji: bool,

    /// Page geometry for paginated output
    #[serde(default)]
    pub page: PageLayout,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            account: None,
            format: default_format(),
            destination: None,
            workers: default_workers(),
            work_dir: None,
            fallback_name: default_fallback_name(),
            max_name_bytes: default_max_name_bytes(),
            strip_emoji: true,
            page: PageLayout::default(),
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        self.output_format()?;

        if self.workers == 0 || self.workers > 64 {
            return Err(format!(
                "export.workers must be between 1 and 64, got {}",
                self.workers
            ));
        }

        if self.max_name_bytes < 16 {
            return Err(format!(
                "export.max_name_bytes must be >= 16, got {}",
                self.max_name_bytes
            ));
        }

        let rules = self.sanitize_rules();
        if crate::core::sanitize::sanitize(&self.fallback_name, &rules) != self.fallback_name {
            return Err(format!(
                "export.fallback_name '{}' is not a valid file name",
                self.fallback_name
            ));
        }

        self.page.validate()?;
        Ok(())
    }

    /// Parsed output format
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format
            .parse()
            .map_err(|e| format!("Invalid export.format: {e}"))
    }

    /// Base sanitizer rules; the output format may add to them
    pub fn sanitize_rules(&self) -> SanitizeRules {
        SanitizeRules::default()
            .with_strip_emoji(self.strip_emoji)
            .with_max_bytes(self.max_name_bytes)
    }

    /// Parent of the per-run working directories
    pub fn work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_source_kind() -> String {
    "json".to_string()
}

fn default_format() -> String {
    "html".to_string()
}

fn default_workers() -> usize {
    4
}

fn default_fallback_name() -> String {
    "Untitled".to_string()
}

fn default_max_name_bytes() -> usize {
    DEFAULT_MAX_NAME_BYTES
}

fn default_true() -> bool {
    true
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
