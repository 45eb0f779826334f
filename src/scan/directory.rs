//! Directory listing for the batch loop

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ScanError, ScanResult};
use crate::scan::filter;

/// List every entry of a single directory, sorted lexicographically
///
/// Sub-directories are included; classification is the batch loop's job.
/// Sorting makes runs reproducible across platforms whose native listing
/// order differs.
pub fn list_entries(dir: &Path) -> ScanResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ScanError::new(
            "Not a directory".to_string(),
            dir.to_path_buf(),
        ));
    }

    let mut entries = Vec::new();
    let listing = fs::read_dir(dir)
        .map_err(|e| ScanError::new(e.to_string(), dir.to_path_buf()))?;

    for entry in listing {
        let entry = entry.map_err(|e| ScanError::new(e.to_string(), dir.to_path_buf()))?;
        entries.push(entry.path());
    }

    entries.sort();
    Ok(entries)
}

/// Find LSM files in a directory. If recursive is true, use walkdir;
/// otherwise list files.
pub fn find_lsm_files(dir: &Path, recursive: bool) -> ScanResult<Vec<PathBuf>> {
    let mut lsm_files = Vec::new();

    if recursive {
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry =
                entry.map_err(|e| ScanError::new(e.to_string(), dir.to_path_buf()))?;
            let path = entry.path();
            if filter::is_lsm_file(path) {
                lsm_files.push(path.to_path_buf());
            }
        }
    } else {
        for path in list_entries(dir)? {
            if filter::is_lsm_file(&path) {
                lsm_files.push(path);
            }
        }
    }

    Ok(lsm_files)
}
