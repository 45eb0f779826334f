//! Image I/O boundary
//!
//! The conversion loop never touches pixel data directly. Everything codec
//! related goes through the [`ImageIo`] trait so the batch logic stays
//! testable against a fake collaborator, while [`TiffBackend`] provides the
//! real implementation on top of the `tiff` crate.

use std::path::{Path, PathBuf};

use crate::error::BackendResult;

pub mod tiff;

pub use self::tiff::TiffBackend;

/// Output encoding for exported sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    /// Tagged Image File Format
    Tiff,
}

impl TargetFormat {
    /// File extension used for artifacts of this format
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Tiff => "tif",
        }
    }
}

/// Parameters of one "export as image sequence" operation
///
/// Mirrors the option set of the host export call: output encoding, base
/// name for generated sequence entries, first index, zero-padding width,
/// and the destination path of the primary artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceExportConfig {
    /// Output encoding
    pub format: TargetFormat,
    /// Base filename for generated sequence entries
    pub name: String,
    /// First sequence index
    pub start_index: u32,
    /// Zero-padding width for sequence indices
    pub digits: u8,
    /// Destination path of the primary artifact
    pub save: PathBuf,
    /// Overwrite existing outputs instead of failing
    pub overwrite: bool,
    /// Write one numbered file per frame instead of a single multi-page file
    pub split_frames: bool,
}

impl SequenceExportConfig {
    /// Numbered sibling path for frame `index` in split mode
    pub fn frame_path(&self, index: u32) -> PathBuf {
        let dir = self.save.parent().unwrap_or_else(|| Path::new(""));
        dir.join(format!(
            "{}{:0width$}.{}",
            self.name,
            self.start_index + index,
            self.format.extension(),
            width = self.digits as usize
        ))
    }
}

/// Result of one export operation
#[derive(Debug, Clone, Default)]
pub struct ExportOutcome {
    /// Paths of all artifacts written, in write order
    pub files: Vec<PathBuf>,
    /// Number of frames written across all artifacts
    pub frames_written: usize,
    /// Total bytes written
    pub bytes_written: u64,
}

/// External image-I/O collaborator
///
/// The contract is strictly sequential: a handle returned by [`open`] is
/// exported at most once and then passed to [`close`] before the next file
/// is opened.
///
/// [`open`]: ImageIo::open
/// [`close`]: ImageIo::close
pub trait ImageIo {
    /// Opaque handle to an opened image
    type Handle;

    /// Open an image file for export
    fn open(&self, path: &Path) -> BackendResult<Self::Handle>;

    /// Export the opened image as a sequence according to `config`
    fn export_sequence(
        &self,
        handle: &Self::Handle,
        config: &SequenceExportConfig,
    ) -> BackendResult<ExportOutcome>;

    /// Release the opened image
    fn close(&self, handle: Self::Handle) {
        drop(handle);
    }
}
