//! Input size guards applied before the backend opens a file

use std::path::Path;

use crate::conversion::config::ConversionConfig;
use crate::error::{ConvertError, ConvertErrorKind, ConvertResult};

/// Reject inputs larger than the configured memory limit before any decode
/// work happens. The backend loads every plane of a file into memory, so
/// the on-disk size is a usable lower bound.
pub fn check_file_size_before_open(path: &Path, config: &ConversionConfig) -> ConvertResult<()> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        ConvertError::conversion(ConvertErrorKind::io(e.to_string(), Some(path.to_path_buf())))
    })?;

    if metadata.len() > config.memory_limit {
        return Err(ConvertError::conversion(ConvertErrorKind::FileTooLarge {
            size: metadata.len(),
            limit: config.memory_limit,
        }));
    }

    Ok(())
}
