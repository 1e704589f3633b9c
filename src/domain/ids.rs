//! Domain identifier types with validation
//!
//! Newtype wrappers for source identifiers. They keep note ids and account
//! names from being mixed up and reject blank values at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Note identifier newtype wrapper
///
/// Opaque, stable identifier handed out by the note source. Used for
/// traceability only; never used to name files.
///
/// # Examples
///
/// ```
/// use folio::domain::ids::NoteId;
/// use std::str::FromStr;
///
/// let id = NoteId::from_str("x-coredata://1F2E/ICNote/p42").unwrap();
/// assert_eq!(id.as_str(), "x-coredata://1F2E/ICNote/p42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(String);

impl NoteId {
    /// Creates a new NoteId from a string
    ///
    /// Returns `Err` if the id is blank
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Note ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the note ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for NoteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Account name newtype wrapper
///
/// Names one account (e.g. "iCloud", "On My Mac") exposed by the note source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountName(String);

impl AccountName {
    /// Creates a new AccountName from a string
    ///
    /// Returns `Err` if the name is blank
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Account name cannot be empty".to_string());
        }
        Ok(Self(name))
    }

    /// Returns the account name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_id_valid() {
        let id = NoteId::new("note-123").unwrap();
        assert_eq!(id.as_str(), "note-123");
        assert_eq!(id.to_string(), "note-123");
    }

    #[test]
    fn test_note_id_empty() {
        assert!(NoteId::new("").is_err());
        assert!(NoteId::new("   ").is_err());
    }

    #[test]
    fn test_note_id_into_inner() {
        let id = NoteId::from_str("abc").unwrap();
        assert_eq!(id.into_inner(), "abc");
    }

    #[test]
    fn test_account_name_valid() {
        let account = AccountName::from_str("iCloud").unwrap();
        assert_eq!(account.as_str(), "iCloud");
        assert_eq!(account.as_ref(), "iCloud");
    }

    #[test]
    fn test_account_name_empty() {
        assert!(AccountName::new(" ").is_err());
    }

    #[test]
    fn test_note_id_serialization() {
        let id = NoteId::new("n-1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"n-1\"");
        let back: NoteId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
