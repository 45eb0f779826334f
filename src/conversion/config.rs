//! Configuration options for LSM to TIFF conversion

use crate::io::TargetFormat;

/// Default memory allowance for a single input file
pub const DEFAULT_MEMORY_LIMIT: u64 = 1024 * 1024 * 1024; // 1GB

/// Conversion configuration options
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Output encoding for artifacts
    pub target_format: TargetFormat,
    /// First sequence index passed to the export operation
    pub start_index: u32,
    /// Zero-padding width for sequence indices (1-6)
    pub digits: u8,
    /// Write one numbered file per frame instead of one multi-page file
    pub split_frames: bool,
    /// Overwrite existing artifacts instead of failing
    pub overwrite: bool,
    /// Maximum input file size in bytes
    pub memory_limit: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            target_format: TargetFormat::Tiff,
            start_index: 0,
            digits: 3,
            split_frames: false,
            overwrite: true,
            memory_limit: DEFAULT_MEMORY_LIMIT,
        }
    }
}

impl ConversionConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first sequence index
    pub fn with_start_index(mut self, start_index: u32) -> Self {
        self.start_index = start_index;
        self
    }

    /// Set the zero-padding width
    pub fn with_digits(mut self, digits: u8) -> Result<Self, String> {
        if !(1..=6).contains(&digits) {
            return Err("Digit padding must be 1-6".to_string());
        }
        self.digits = digits;
        Ok(self)
    }

    /// Enable per-frame numbered output files
    pub fn with_split_frames(mut self, split: bool) -> Self {
        self.split_frames = split;
        self
    }

    /// Set the overwrite policy
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Set the input size limit
    pub fn with_memory_limit(mut self, limit_bytes: u64) -> Self {
        self.memory_limit = limit_bytes;
        self
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=6).contains(&self.digits) {
            return Err("Digit padding must be 1-6".to_string());
        }

        if self.memory_limit < 1024 {
            return Err("Memory limit must be at least 1KB".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConversionConfig::default();
        assert_eq!(config.target_format, TargetFormat::Tiff);
        assert_eq!(config.start_index, 0);
        assert_eq!(config.digits, 3);
        assert!(!config.split_frames);
        assert!(config.overwrite);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ConversionConfig::default();
        assert!(config.validate().is_ok());

        config.digits = 9;
        assert!(config.validate().is_err());

        config.digits = 3;
        config.memory_limit = 512;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_digits_bounds() {
        assert!(ConversionConfig::new().with_digits(0).is_err());
        assert!(ConversionConfig::new().with_digits(7).is_err());
        let config = ConversionConfig::new().with_digits(4).unwrap();
        assert_eq!(config.digits, 4);
    }
}
