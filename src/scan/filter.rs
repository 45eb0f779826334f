//! Entry classification for the batch loop

use std::path::Path;

/// Source extension identifying convertible microscopy files
pub const SOURCE_EXTENSION: &str = "lsm";

/// True for regular files carrying the source extension
///
/// The match is case-sensitive; `scan.LSM` is treated as a non-matching
/// file, not as an input.
pub fn is_lsm_file(path: &Path) -> bool {
    path.is_file() && has_source_extension(path)
}

/// Suffix test on the filename only, without touching the filesystem
pub fn has_source_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}
