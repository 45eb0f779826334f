//! Directory scanning and entry classification

pub mod directory;
pub mod filter;

pub use directory::{find_lsm_files, list_entries};
pub use filter::{has_source_extension, is_lsm_file, SOURCE_EXTENSION};
