//! LSM to TIFF batch converter
//!
//! A Rust CLI tool and library for batch-converting Zeiss LSM microscopy
//! stacks into TIFF artifacts with derived names. The conversion loop is
//! implemented against the [`ImageIo`] collaborator trait so it can be
//! exercised without a real decoder; [`TiffBackend`] is the reference
//! implementation on top of the `tiff` crate.

pub mod cli;
pub mod conversion;
pub mod error;
pub mod io;
pub mod scan;

// Re-export commonly used types
pub use conversion::{
    BatchOptions, BatchSummary, ConversionConfig, ConversionEngine, ConversionStatistics,
    ConvertedFile,
};
pub use error::{BackendError, ConvertError, ConvertErrorKind, ConvertResult, ScanError};
pub use io::{ImageIo, SequenceExportConfig, TargetFormat, TiffBackend};

use std::path::Path;

/// Convert every LSM file in a directory with default configuration
///
/// Artifacts are written next to their inputs; nothing is printed. Use
/// [`convert_lsm_directory_with_config`] or the batch module directly for
/// more control.
pub fn convert_lsm_directory(dir: &Path) -> ConvertResult<BatchSummary> {
    let options = BatchOptions {
        quiet: true,
        ..Default::default()
    };
    convert_lsm_directory_with_config(dir, &ConversionConfig::default(), &options)
}

/// Convert every LSM file in a directory with custom configuration
pub fn convert_lsm_directory_with_config(
    dir: &Path,
    config: &ConversionConfig,
    options: &BatchOptions,
) -> ConvertResult<BatchSummary> {
    let engine = ConversionEngine::new(config.clone(), TiffBackend::new());
    conversion::batch::convert_directory(&engine, dir, options)
}
