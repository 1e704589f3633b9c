//! External system integrations for Folio.
//!
//! - [`notes`] - Note source abstraction (trait-based) and its implementations
//!
//! # Design Pattern
//!
//! Adapters isolate where notes come from behind the [`notes::NoteSource`]
//! trait. The export pipeline only ever sees raw note records, so a scripting
//! bridge, a database or a fixture file are interchangeable.
//!
//! ```rust,no_run
//! use folio::adapters::notes::{JsonNoteSource, NoteSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = JsonNoteSource::new("notes.json");
//! for account in source.list_accounts().await? {
//!     println!("{account}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod notes;
