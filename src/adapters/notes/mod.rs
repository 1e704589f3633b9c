//! Note source abstraction layer
//!
//! This module provides a trait-based abstraction for reading the raw note
//! batch of one account.

pub mod factory;
pub mod json;
pub mod memory;
pub mod traits;

pub use factory::create_note_source;
pub use json::JsonNoteSource;
pub use memory::InMemoryNoteSource;
pub use traits::NoteSource;
