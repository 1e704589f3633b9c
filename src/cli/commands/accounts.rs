//! Accounts command implementation
//!
//! Lists the accounts the configured note source exposes.

use crate::adapters::notes::create_note_source;
use crate::cli::exit_code;
use crate::config::load_config;
use clap::Args;

/// Arguments for the accounts command
#[derive(Args, Debug)]
pub struct AccountsArgs {
    /// Print one name per line, nothing else
    #[arg(long)]
    pub plain: bool,
}

impl AccountsArgs {
    /// Execute the accounts command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        let source = match create_note_source(&config) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        let accounts = match source.list_accounts().await {
            Ok(a) => a,
            Err(e) => {
                tracing::error!(error = %e, source = %source.describe(), "Failed to list accounts");
                eprintln!("Failed to read note source: {e}");
                return Ok(exit_code::SOURCE);
            }
        };

        if self.plain {
            for account in &accounts {
                println!("{account}");
            }
            return Ok(exit_code::SUCCESS);
        }

        if accounts.is_empty() {
            println!("No accounts found in {}", source.describe());
        } else {
            println!("Accounts in {}:", source.describe());
            for account in &accounts {
                let marker = if config.export.account.as_deref() == Some(account.as_str()) {
                    " (default)"
                } else {
                    ""
                };
                println!("  - {account}{marker}");
            }
        }
        Ok(exit_code::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_missing_config() {
        let args = AccountsArgs { plain: true };
        let code = args.execute("does-not-exist.toml").await.unwrap();
        assert_eq!(code, exit_code::CONFIGURATION);
    }

    #[tokio::test]
    async fn test_missing_source_file() {
        let mut config = NamedTempFile::new().unwrap();
        writeln!(config, "[source]\npath = \"/nonexistent/notes.json\"").unwrap();

        let args = AccountsArgs { plain: true };
        let code = args
            .execute(config.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, exit_code::SOURCE);
    }
}
