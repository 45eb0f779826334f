//! Per-file conversion orchestration
//!
//! One [`ConversionEngine::convert_file`] call performs the strict
//! open -> export -> close sequence against the backend. The backend is the
//! single "current image" slot of the original workflow; nothing else is
//! opened until the handle has been released.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::path_mapping;
use crate::conversion::config::ConversionConfig;
use crate::conversion::limits;
use crate::error::{ConvertError, ConvertErrorKind, ConvertResult};
use crate::io::{ExportOutcome, ImageIo, SequenceExportConfig};
use crate::scan::filter;

/// Metadata about one completed conversion
#[derive(Debug, Clone)]
pub struct ConversionMetadata {
    pub input_size: u64,
    pub output_size: u64,
    pub frames_written: usize,
    pub processing_time_ms: u64,
}

/// Result of converting one input file
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    pub input: PathBuf,
    pub outcome: ExportOutcome,
    pub metadata: ConversionMetadata,
}

/// Main conversion engine, generic over the image-I/O collaborator
pub struct ConversionEngine<B: ImageIo> {
    config: ConversionConfig,
    backend: B,
}

impl<B: ImageIo> ConversionEngine<B> {
    /// Create a new conversion engine
    pub fn new(config: ConversionConfig, backend: B) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Convert a single input file, writing the artifact at `save`
    pub fn convert_file(&self, input: &Path, save: &Path) -> ConvertResult<ConvertedFile> {
        let start_time = Instant::now();

        self.validate_input(input)?;

        let export = self.export_config(input, save);

        // Fail before any decode work when the primary artifact would
        // clobber an existing file and the policy forbids it.
        if !export.split_frames && !export.overwrite && save.exists() {
            return Err(ConvertError::conversion(ConvertErrorKind::OutputExists {
                path: save.to_path_buf(),
            }));
        }

        if let Some(parent) = save.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ConvertError::conversion(ConvertErrorKind::io(
                        e.to_string(),
                        Some(parent.to_path_buf()),
                    ))
                })?;
            }
        }

        let input_size = std::fs::metadata(input).map(|m| m.len()).unwrap_or(0);

        // open -> export -> close, releasing the handle even when the
        // export fails
        let handle = self.backend.open(input)?;
        let result = self.backend.export_sequence(&handle, &export);
        self.backend.close(handle);
        let outcome = result?;

        let metadata = ConversionMetadata {
            input_size,
            output_size: outcome.bytes_written,
            frames_written: outcome.frames_written,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        Ok(ConvertedFile {
            input: input.to_path_buf(),
            outcome,
            metadata,
        })
    }

    /// Build the export parameters for one input file
    pub fn export_config(&self, input: &Path, save: &Path) -> SequenceExportConfig {
        SequenceExportConfig {
            format: self.config.target_format,
            name: path_mapping::derive_base(input),
            start_index: self.config.start_index,
            digits: self.config.digits,
            save: save.to_path_buf(),
            overwrite: self.config.overwrite,
            split_frames: self.config.split_frames,
        }
    }

    /// Validate one input file before touching the backend
    fn validate_input(&self, input: &Path) -> ConvertResult<()> {
        if !input.is_file() {
            return Err(ConvertError::conversion(ConvertErrorKind::io(
                "Input is not a regular file".to_string(),
                Some(input.to_path_buf()),
            )));
        }

        if !filter::has_source_extension(input) {
            return Err(ConvertError::conversion(
                ConvertErrorKind::unsupported_input(format!(
                    "{} does not carry the .{} extension",
                    input.display(),
                    filter::SOURCE_EXTENSION
                )),
            ));
        }

        limits::check_file_size_before_open(input, &self.config)
    }
}
