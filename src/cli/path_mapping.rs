//! Output naming for exported sequences
//!
//! Artifact names are a pure function of the input filename: strip the
//! source extension, append the fixed channel/timepoint suffix, add the
//! target extension. `scan.lsm` becomes `scan_c001_t001.tif`.

use std::path::{Path, PathBuf};

use crate::io::TargetFormat;

/// Fixed channel/timepoint suffix appended to every artifact name
pub const SEQUENCE_SUFFIX: &str = "_c001_t001";

/// Base name of an input file with the source extension stripped
pub fn derive_base(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Artifact filename stem: derived base plus the fixed suffix
pub fn sequence_stem(input: &Path) -> String {
    format!("{}{}", derive_base(input), SEQUENCE_SUFFIX)
}

/// Artifact path next to the input file
pub fn sequence_save_path(input: &Path, format: TargetFormat) -> PathBuf {
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{}.{}", sequence_stem(input), format.extension()))
}

/// Map an input LSM file into an artifact path under `output_dir`.
/// This preserves the input directory structure relative to `input_dir`.
pub fn map_input_to_output(
    input_dir: &Path,
    input_file: &Path,
    output_dir: &Path,
    format: TargetFormat,
) -> PathBuf {
    let relative = input_file.strip_prefix(input_dir).unwrap_or(input_file);
    let parent = relative.parent().unwrap_or_else(|| Path::new(""));
    output_dir.join(parent).join(format!(
        "{}.{}",
        sequence_stem(input_file),
        format.extension()
    ))
}
