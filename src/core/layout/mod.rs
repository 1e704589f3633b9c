//! Output tree layout
//!
//! - [`hierarchy`] - rebuilds the folder tree from per-note path lists
//! - [`collision`] - picks a free file name inside a folder

pub mod collision;
pub mod hierarchy;

pub use collision::{candidate_name, create_unique, resolve_unique_path};
pub use hierarchy::ensure_path;
