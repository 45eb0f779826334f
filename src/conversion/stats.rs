//! Conversion statistics collection and reporting

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Aggregate statistics for a conversion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStatistics {
    /// Number of files converted
    pub files_converted: usize,
    /// Number of non-matching files skipped
    pub files_skipped: usize,
    /// Number of files that failed to convert
    pub files_failed: usize,
    /// Total frames written across all artifacts
    pub frames_written: usize,
    /// Input bytes read
    pub input_size_bytes: u64,
    /// Output bytes written
    pub output_size_bytes: u64,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Throughput (input bytes processed per second)
    pub throughput_bytes_per_sec: f32,
    /// Timestamp of when statistics were collected
    pub collected_at: chrono::DateTime<chrono::Utc>,
}

impl Default for ConversionStatistics {
    fn default() -> Self {
        Self {
            files_converted: 0,
            files_skipped: 0,
            files_failed: 0,
            frames_written: 0,
            input_size_bytes: 0,
            output_size_bytes: 0,
            processing_time_ms: 0,
            throughput_bytes_per_sec: 0.0,
            collected_at: chrono::Utc::now(),
        }
    }
}

impl ConversionStatistics {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Create statistics for a single conversion
    pub fn for_conversion(
        input_size: u64,
        output_size: u64,
        frames_written: usize,
        processing_time: Duration,
    ) -> Self {
        let mut stats = Self {
            files_converted: 1,
            frames_written,
            input_size_bytes: input_size,
            output_size_bytes: output_size,
            processing_time_ms: processing_time.as_millis() as u64,
            ..Default::default()
        };
        stats.recalculate_throughput();
        stats
    }

    /// Combine statistics from multiple operations
    pub fn combine(&mut self, other: &Self) {
        self.files_converted += other.files_converted;
        self.files_skipped += other.files_skipped;
        self.files_failed += other.files_failed;
        self.frames_written += other.frames_written;
        self.input_size_bytes += other.input_size_bytes;
        self.output_size_bytes += other.output_size_bytes;
        self.processing_time_ms += other.processing_time_ms;

        self.recalculate_throughput();
        self.collected_at = chrono::Utc::now();
    }

    fn recalculate_throughput(&mut self) {
        self.throughput_bytes_per_sec = if self.processing_time_ms > 0 {
            self.input_size_bytes as f32 / (self.processing_time_ms as f32 / 1000.0)
        } else {
            0.0
        };
    }

    /// Get a formatted summary
    pub fn summary(&self) -> String {
        format!(
            "Converted {} files ({} frames, {} skipped, {} failed) in {:.1}s",
            self.files_converted,
            self.frames_written,
            self.files_skipped,
            self.files_failed,
            self.processing_time_ms as f32 / 1000.0
        )
    }

    /// Export to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Import from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
