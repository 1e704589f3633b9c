//! Note source factory
//!
//! This module provides factory functions to create note sources based on configuration.

use super::json::JsonNoteSource;
use super::traits::NoteSource;
use crate::config::schema::FolioConfig;
use crate::domain::errors::FolioError;
use crate::domain::Result;
use std::sync::Arc;

/// Create a note source based on the configuration
///
/// # Errors
///
/// Returns [`FolioError::Configuration`] if the configured kind is unknown
/// or lacks the settings it needs.
pub fn create_note_source(config: &FolioConfig) -> Result<Arc<dyn NoteSource + Send + Sync>> {
    match config.source.kind.as_str() {
        "json" => {
            let path = config.source.path.as_deref().ok_or_else(|| {
                FolioError::Configuration(
                    "source.path is required when source.kind = 'json'".to_string(),
                )
            })?;

            tracing::info!(path, "Creating JSON note source");
            Ok(Arc::new(JsonNoteSource::new(path)) as Arc<dyn NoteSource + Send + Sync>)
        }
        other => Err(FolioError::Configuration(format!(
            "Unsupported source.kind '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_source_requires_path() {
        let config = FolioConfig::default();
        assert!(matches!(
            create_note_source(&config),
            Err(FolioError::Configuration(_))
        ));
    }

    #[test]
    fn test_json_source() {
        let mut config = FolioConfig::default();
        config.source.path = Some("notes.json".to_string());
        let source = create_note_source(&config).unwrap();
        assert_eq!(source.describe(), "json:notes.json");
    }
}
