//! LSM to TIFF conversion module
//!
//! This module contains the per-file engine, the batch loop, configuration,
//! and statistics.

pub mod batch;
pub mod config;
pub mod engine;
pub mod limits;
pub mod stats;

pub use batch::{convert_directory, BatchOptions, BatchSummary};
pub use config::ConversionConfig;
pub use engine::{ConversionEngine, ConversionMetadata, ConvertedFile};
pub use stats::ConversionStatistics;

/// Result type for conversion operations
pub type ConvertResult<T> = crate::error::ConvertResult<T>;
