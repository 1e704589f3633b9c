//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Folio using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Folio - Note export tool
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
#[command(author = "Folio Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "folio.toml", env = "FOLIO_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FOLIO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every note of an account into an archive
    Export(commands::export::ExportArgs),

    /// List the accounts the note source exposes
    Accounts(commands::accounts::AccountsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Exit codes shared by all commands
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    /// The run completed but some notes were skipped
    pub const PARTIAL: i32 = 1;
    /// Bad configuration or a rejected request
    pub const CONFIGURATION: i32 = 2;
    /// The note source could not be read
    pub const SOURCE: i32 = 4;
    pub const FATAL: i32 = 5;
    /// Interrupted by SIGINT / SIGTERM
    pub const CANCELLED: i32 = 130;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["folio", "export"]);
        assert_eq!(cli.config, "folio.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["folio", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["folio", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_export_overrides() {
        let cli = Cli::parse_from([
            "folio",
            "export",
            "--account",
            "iCloud",
            "--format",
            "md",
            "--destination",
            "Notes.zip",
            "--workers",
            "8",
        ]);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.account.as_deref(), Some("iCloud"));
                assert_eq!(args.format.as_deref(), Some("md"));
                assert_eq!(args.destination.as_deref(), Some(std::path::Path::new("Notes.zip")));
                assert_eq!(args.workers, Some(8));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_accounts() {
        let cli = Cli::parse_from(["folio", "accounts"]);
        assert!(matches!(cli.command, Commands::Accounts(_)));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["folio", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["folio", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
