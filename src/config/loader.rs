//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::FolioConfig;
use crate::domain::errors::FolioError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Prefix of every override variable
pub const ENV_PREFIX: &str = "FOLIO";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into FolioConfig
/// 4. Applies environment variable overrides (FOLIO_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`FolioError::Configuration`] if the file cannot be read or
/// parsed, a referenced variable is unset, an override does not parse, or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use folio::config::loader::load_config;
///
/// let config = load_config("folio.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<FolioConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(FolioError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        FolioError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parse, override and validate configuration text
///
/// # Errors
///
/// Same as [`load_config`], minus file access.
pub fn parse_config(contents: &str) -> Result<FolioConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: FolioConfig = toml::from_str(&contents)
        .map_err(|e| FolioError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        FolioError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| FolioError::Configuration(e.to_string()))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(FolioError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_var(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

fn env_parse<T>(section: &str, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(section, key) {
        Some(val) => val.trim().parse().map(Some).map_err(|e| {
            FolioError::Configuration(format!(
                "Invalid {ENV_PREFIX}_{section}_{key} '{val}': {e}"
            ))
        }),
        None => Ok(None),
    }
}

/// Applies environment variable overrides using FOLIO_* prefix
///
/// Environment variables follow the pattern: FOLIO_<SECTION>_<KEY>
/// For example: FOLIO_SOURCE_PATH, FOLIO_EXPORT_WORKERS
fn apply_env_overrides(config: &mut FolioConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_var("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Source overrides
    if let Some(val) = env_var("SOURCE", "KIND") {
        config.source.kind = val;
    }
    if let Some(val) = env_var("SOURCE", "PATH") {
        config.source.path = Some(val);
    }
    if let Some(val) = env_var("SOURCE", "DATE_FORMATS") {
        config.source.date_formats = val
            .split(';')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
    }

    // Export overrides
    if let Some(val) = env_var("EXPORT", "ACCOUNT") {
        config.export.account = Some(val);
    }
    if let Some(val) = env_var("EXPORT", "FORMAT") {
        config.export.format = val;
    }
    if let Some(val) = env_var("EXPORT", "DESTINATION") {
        config.export.destination = Some(val.into());
    }
    if let Some(workers) = env_parse("EXPORT", "WORKERS")? {
        config.export.workers = workers;
    }
    if let Some(val) = env_var("EXPORT", "WORK_DIR") {
        config.export.work_dir = Some(val.into());
    }
    if let Some(val) = env_var("EXPORT", "FALLBACK_NAME") {
        config.export.fallback_name = val;
    }
    if let Some(bytes) = env_parse("EXPORT", "MAX_NAME_BYTES")? {
        config.export.max_name_bytes = bytes;
    }
    if let Some(strip) = env_parse("EXPORT", "STRIP_EMOJI")? {
        config.export.strip_emoji = strip;
    }

    // Logging overrides
    if let Some(enabled) = env_parse("LOGGING", "LOCAL_ENABLED")? {
        config.logging.local_enabled = enabled;
    }
    if let Some(val) = env_var("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_var("LOGGING", "LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("FOLIO_TEST_NOTES_FILE", "/data/notes.json");
        let input = "path = \"${FOLIO_TEST_NOTES_FILE}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "path = \"/data/notes.json\"\n");
        std::env::remove_var("FOLIO_TEST_NOTES_FILE");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("FOLIO_TEST_MISSING_VAR");
        let input = "path = \"${FOLIO_TEST_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("FOLIO_TEST_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("FOLIO_TEST_COMMENTED");
        let input = "# path = \"${FOLIO_TEST_COMMENTED}\"\nformat = \"md\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${FOLIO_TEST_COMMENTED}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(FolioError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[source]
kind = "json"
path = "notes.json"
date_formats = ["%d/%m/%Y %H:%M"]

[export]
account = "iCloud"
format = "rtf"
workers = 2
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.source.path.as_deref(), Some("notes.json"));
        assert_eq!(config.source.date_formats, vec!["%d/%m/%Y %H:%M"]);
        assert_eq!(config.export.account.as_deref(), Some("iCloud"));
        assert_eq!(config.export.format, "rtf");
        assert_eq!(config.export.workers, 2);
    }

    #[test]
    fn test_validation_failure_is_configuration_error() {
        let err = parse_config("[export]\nworkers = 0\n").unwrap_err();
        match err {
            FolioError::Configuration(msg) => assert!(msg.contains("export.workers")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_toml() {
        let err = parse_config("[export\nformat = ").unwrap_err();
        assert!(matches!(err, FolioError::Configuration(_)));
    }
}
