//! Source date parsing
//!
//! Note sources hand dates over as locale-formatted strings. [`DateParser`]
//! normalises them to an absolute UTC instant before anything else looks at
//! the note.

use crate::domain::errors::FolioError;
use crate::domain::result::Result;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// Formats tried, in order, after RFC 3339
///
/// The first entry is the long English form automation bridges print
/// (`Monday, June 3, 2024 at 2:05:12 PM`).
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%A, %B %d, %Y at %I:%M:%S %p",
    "%A, %d %B %Y at %H:%M:%S",
    "%B %d, %Y at %I:%M:%S %p",
    "%d %B %Y at %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parses source date strings into UTC instants
#[derive(Debug, Clone)]
pub struct DateParser {
    formats: Vec<String>,
}

impl DateParser {
    /// Create a parser that tries `formats` in order
    ///
    /// An empty list falls back to [`DEFAULT_DATE_FORMATS`].
    pub fn new(formats: Vec<String>) -> Self {
        if formats.is_empty() {
            return Self::default();
        }
        Self { formats }
    }

    /// Parse a raw date string
    ///
    /// Strings without an offset are read as local time. Local times that
    /// fall in a DST gap or overlap are rejected rather than guessed.
    pub fn parse(&self, raw: &str) -> Result<DateTime<Utc>> {
        // macOS puts a narrow no-break space before the AM/PM marker
        let normalized = raw.replace(['\u{202f}', '\u{a0}'], " ");
        let value = normalized.trim();

        if value.is_empty() {
            return Err(FolioError::DateParse("empty date string".to_string()));
        }

        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return Ok(parsed.with_timezone(&Utc));
        }

        for format in &self.formats {
            if format.contains("%z") || format.contains("%:z") {
                if let Ok(parsed) = DateTime::parse_from_str(value, format) {
                    return Ok(parsed.with_timezone(&Utc));
                }
                continue;
            }

            if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
                return Local
                    .from_local_datetime(&naive)
                    .single()
                    .map(|local| local.with_timezone(&Utc))
                    .ok_or_else(|| {
                        FolioError::DateParse(format!(
                            "'{value}' is not a unique local time"
                        ))
                    });
            }
        }

        Err(FolioError::DateParse(format!(
            "'{value}' does not match any known date format"
        )))
    }
}

impl Default for DateParser {
    fn default() -> Self {
        Self {
            formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}
