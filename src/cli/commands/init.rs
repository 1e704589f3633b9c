//! Init command implementation
//!
//! This module implements the `init` command for generating a starter
//! configuration file.

use crate::cli::exit_code;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "folio.toml")]
    pub output: String,

    /// Include every setting with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(exit_code::CONFIGURATION);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point source.path at your notes file");
                println!("  2. List accounts: folio accounts");
                println!("  3. Validate configuration: folio validate-config");
                println!("  4. Run export: folio export --account <NAME> --destination Notes.zip");
                println!();
                Ok(exit_code::SUCCESS)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(exit_code::FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Folio Configuration File

[source]
kind = "json"
path = "notes.json"

[export]
format = "html"  # html | md | rtf | txt | pdf
workers = 4
"#
        .to_string()
    }

    /// Generate configuration with every setting documented
    fn generate_config_with_examples() -> String {
        r#"# Folio Configuration File
#
# Values may reference environment variables as ${VAR_NAME}.
# Any key can also be overridden with FOLIO_<SECTION>_<KEY>,
# for example FOLIO_EXPORT_FORMAT=md.

[application]
log_level = "info"  # trace | debug | info | warn | error

[source]
kind = "json"
path = "notes.json"
# chrono formats tried after RFC 3339; leave empty for the built-in list
# date_formats = ["%A, %B %d, %Y at %I:%M:%S %p", "%Y-%m-%d %H:%M:%S"]
date_formats = []

[export]
# Defaults for the export command; --account and --destination override them
# account = "iCloud"
# destination = "Notes.zip"
format = "html"  # html | md | rtf | txt | pdf
workers = 4      # 1..=64
# work_dir = "/var/tmp"  # defaults to the OS temp dir
fallback_name = "Untitled"
max_name_bytes = 200
strip_emoji = true

[export.page]
# PDF geometry in points (US Letter, one inch margins)
width = 612.0
height = 792.0
margin = 72.0
font_size = 10.0
line_height = 12.0

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"  # daily | hourly | never
"#
        .to_string()
    }
}
