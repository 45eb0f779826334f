//! Error types and handling infrastructure for LSM to TIFF conversion

use anyhow::Error;
use std::fmt;
use std::path::PathBuf;

/// Core error types for the conversion process
#[derive(Debug, thiserror::Error)]
pub enum ConvertErrorKind {
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Input file too large: {size} bytes (limit: {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Unsupported input: {message}")]
    UnsupportedInput { message: String },

    #[error("Output already exists: {path}")]
    OutputExists { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("Export failed: {message}")]
    ExportFailed { message: String },
}

impl ConvertErrorKind {
    pub fn io(message: String, path: Option<PathBuf>) -> Self {
        Self::Io { message, path }
    }

    pub fn unsupported_input(message: String) -> Self {
        Self::UnsupportedInput { message }
    }

    pub fn configuration(message: String) -> Self {
        Self::Configuration { message }
    }

    pub fn export_failed(message: String) -> Self {
        Self::ExportFailed { message }
    }
}

/// Main error type for conversion operations
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("{kind}")]
    Conversion {
        kind: ConvertErrorKind,
        source: Option<anyhow::Error>,
    },

    #[error(transparent)]
    Other(#[from] Error),
}

impl ConvertError {
    pub fn scan(message: String, path: PathBuf) -> Self {
        Self::Scan(ScanError::new(message, path))
    }

    pub fn conversion(kind: ConvertErrorKind) -> Self {
        Self::Conversion { kind, source: None }
    }

    pub fn conversion_with_source(kind: ConvertErrorKind, source: anyhow::Error) -> Self {
        Self::Conversion {
            kind,
            source: Some(source),
        }
    }

    pub fn other(error: Error) -> Self {
        Self::Other(error)
    }

    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Scan(err) => {
                format!("Scan error in {}: {}", err.path.display(), err.message)
            }
            Self::Backend(err) => {
                format!("Image I/O error: {}", err)
            }
            Self::Conversion { kind, .. } => match kind {
                ConvertErrorKind::FileTooLarge { size, limit } => {
                    format!(
                        "Input file too large: {} bytes (limit: {} bytes)",
                        size, limit
                    )
                }
                ConvertErrorKind::OutputExists { path } => {
                    format!("Refusing to overwrite existing output: {}", path.display())
                }
                ConvertErrorKind::Io { message, path } => match path {
                    Some(p) => format!("IO error on {}: {}", p.display(), message),
                    None => format!("IO error: {}", message),
                },
                _ => self.to_string(),
            },
            Self::Other(err) => {
                format!("Unexpected error: {}", err)
            }
        }
    }
}

/// Directory scanning errors
#[derive(Debug, Clone)]
pub struct ScanError {
    pub message: String,
    pub path: PathBuf,
}

impl ScanError {
    pub fn new(message: String, path: PathBuf) -> Self {
        Self { message, path }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.path.display())
    }
}

impl std::error::Error for ScanError {}

/// Image backend errors (open, decode, encode, write)
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Failed to open {path}: {message}")]
    Open { path: PathBuf, message: String },

    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl BackendError {
    pub fn open(path: PathBuf, message: String) -> Self {
        Self::Open { path, message }
    }

    pub fn decode(path: PathBuf, message: String) -> Self {
        Self::Decode { path, message }
    }

    pub fn encode(path: PathBuf, message: String) -> Self {
        Self::Encode { path, message }
    }

    pub fn write(path: PathBuf, message: String) -> Self {
        Self::Write { path, message }
    }
}

/// Result type for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Convenience result type for scanning operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Convenience result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_display() {
        let error = ScanError::new("Not a directory".to_string(), PathBuf::from("/data/run1"));
        assert_eq!(error.to_string(), "Not a directory (/data/run1)");
    }

    #[test]
    fn test_convert_error_user_message() {
        let error = ConvertError::conversion(ConvertErrorKind::FileTooLarge {
            size: 2048,
            limit: 1024,
        });
        assert!(error.user_message().contains("2048 bytes (limit: 1024"));
    }

    #[test]
    fn test_convert_error_kind_variants() {
        let kinds = vec![
            ConvertErrorKind::io("test".to_string(), None),
            ConvertErrorKind::unsupported_input("test".to_string()),
            ConvertErrorKind::configuration("test".to_string()),
            ConvertErrorKind::export_failed("test".to_string()),
        ];

        for kind in kinds {
            let error = ConvertError::conversion(kind);
            assert!(!error.user_message().is_empty());
        }
    }

    #[test]
    fn test_backend_error_carries_path() {
        let error = BackendError::open(PathBuf::from("a.lsm"), "no such file".to_string());
        assert!(error.to_string().contains("a.lsm"));
    }
}
