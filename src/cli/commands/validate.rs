//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Folio configuration file.

use crate::cli::exit_code;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates, so a loaded file is a valid one.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Source: {}", config.source.kind);
        println!(
            "  Source Path: {}",
            config.source.path.as_deref().unwrap_or("(not set)")
        );
        println!(
            "  Date Formats: {}",
            if config.source.date_formats.is_empty() {
                "built-in".to_string()
            } else {
                config.source.date_formats.join(" | ")
            }
        );
        println!(
            "  Account: {}",
            config.export.account.as_deref().unwrap_or("(not set)")
        );
        println!("  Format: {}", config.export.format);
        println!(
            "  Destination: {}",
            config
                .export
                .destination
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(not set)".to_string())
        );
        println!("  Workers: {}", config.export.workers);
        println!("  Work Dir: {}", config.export.work_dir().display());
        println!();
        Ok(exit_code::SUCCESS)
    }
}
