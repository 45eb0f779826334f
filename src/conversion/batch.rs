//! Batch conversion loop
//!
//! Implements the sequential directory pass: list entries, classify each as
//! sub-directory / matching file / other file, convert or skip, then report.
//! Sub-directories are passed over without a message; non-matching files get
//! one skip notice each. Both behaviors are pinned by tests.

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use walkdir::WalkDir;

use crate::cli::{path_mapping, CliUtils};
use crate::conversion::engine::{ConversionEngine, ConvertedFile};
use crate::conversion::stats::ConversionStatistics;
use crate::error::{ConvertResult, ScanError};
use crate::io::ImageIo;
use crate::scan;

/// Options governing one batch pass
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Descend into sub-directories instead of passing over them
    pub recursive: bool,
    /// Report per-file failures and keep going instead of aborting
    pub continue_on_error: bool,
    /// Redirect artifacts into this directory, preserving relative structure
    pub output_dir: Option<PathBuf>,
    /// Suppress non-error output
    pub quiet: bool,
    /// Print every listed entry and its classification
    pub verbose: bool,
    /// Show a progress bar for larger batches
    pub progress: bool,
}

/// Result of one batch pass
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Successfully converted files, in processing order
    pub converted: Vec<ConvertedFile>,
    /// Non-matching files that received a skip notice, in listing order
    pub skipped: Vec<PathBuf>,
    /// Sub-directories passed over without a message
    pub directories: usize,
    /// Files that failed to convert, with their rendered error
    pub failed: Vec<(PathBuf, String)>,
    /// Aggregate statistics for the pass
    pub stats: ConversionStatistics,
}

/// Convert every matching file in `input_dir`
pub fn convert_directory<B: ImageIo>(
    engine: &ConversionEngine<B>,
    input_dir: &Path,
    options: &BatchOptions,
) -> ConvertResult<BatchSummary> {
    let entries = collect_entries(input_dir, options.recursive)?;

    let matching = entries
        .iter()
        .filter(|e| e.is_file() && scan::has_source_extension(e))
        .count();
    let bar = make_progress_bar(matching, options);

    let mut summary = BatchSummary::default();

    for entry in entries {
        if options.verbose && !options.quiet {
            emit(&bar, &format!("  entry: {}", entry.display()));
        }

        if entry.is_dir() {
            summary.directories += 1;
            continue;
        }

        if !scan::has_source_extension(&entry) {
            if !options.quiet {
                emit(
                    &bar,
                    &format!(
                        "- {}: skipped (not a .{} file)",
                        display_name(&entry),
                        scan::SOURCE_EXTENSION
                    ),
                );
            }
            summary.skipped.push(entry);
            continue;
        }

        let save = artifact_path(engine, input_dir, &entry, options);
        match engine.convert_file(&entry, &save) {
            Ok(converted) => {
                if !options.quiet {
                    emit(
                        &bar,
                        &format!("✓ {} -> {}", display_name(&entry), save.display()),
                    );
                }
                summary.stats.combine(&ConversionStatistics::for_conversion(
                    converted.metadata.input_size,
                    converted.metadata.output_size,
                    converted.metadata.frames_written,
                    std::time::Duration::from_millis(converted.metadata.processing_time_ms),
                ));
                summary.converted.push(converted);
                if let Some(bar) = &bar {
                    bar.inc(1);
                }
            }
            Err(e) => {
                let message = e.user_message();
                match &bar {
                    Some(bar) => bar.println(format!("✗ {}", message)),
                    None => CliUtils::show_error(&message),
                }
                summary.failed.push((entry, message));
                if !options.continue_on_error {
                    if let Some(bar) = &bar {
                        bar.finish_and_clear();
                    }
                    return Err(e);
                }
                if let Some(bar) = &bar {
                    bar.inc(1);
                }
            }
        }
    }

    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    summary.stats.files_skipped = summary.skipped.len();
    summary.stats.files_failed = summary.failed.len();

    Ok(summary)
}

/// Entries of the batch pass, sorted for reproducible runs
fn collect_entries(input_dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
    if recursive {
        let mut entries = Vec::new();
        for entry in WalkDir::new(input_dir).min_depth(1).sort_by_file_name() {
            let entry =
                entry.map_err(|e| ScanError::new(e.to_string(), input_dir.to_path_buf()))?;
            entries.push(entry.into_path());
        }
        Ok(entries)
    } else {
        scan::list_entries(input_dir)
    }
}

fn artifact_path<B: ImageIo>(
    engine: &ConversionEngine<B>,
    input_dir: &Path,
    input_file: &Path,
    options: &BatchOptions,
) -> PathBuf {
    let format = engine.config().target_format;
    match &options.output_dir {
        Some(output_dir) => {
            path_mapping::map_input_to_output(input_dir, input_file, output_dir, format)
        }
        None => path_mapping::sequence_save_path(input_file, format),
    }
}

fn make_progress_bar(files: usize, options: &BatchOptions) -> Option<ProgressBar> {
    if options.progress && !options.quiet && !options.verbose && files > 1 {
        Some(CliUtils::create_progress_bar(files as u64))
    } else {
        None
    }
}

/// Route messages through the progress bar when one is active so lines are
/// not torn mid-redraw
fn emit(bar: &Option<ProgressBar>, message: &str) {
    match bar {
        Some(bar) => bar.println(message.to_string()),
        None => println!("{}", message),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::config::ConversionConfig;
    use crate::error::BackendResult;
    use crate::io::{ExportOutcome, SequenceExportConfig};
    use std::cell::RefCell;
    use tempfile::tempdir;

    /// Fake collaborator that records exports without touching pixels
    #[derive(Default)]
    struct FakeBackend {
        pub exports: RefCell<Vec<SequenceExportConfig>>,
        pub fail_on: Option<String>,
    }

    impl ImageIo for FakeBackend {
        type Handle = PathBuf;

        fn open(&self, path: &Path) -> BackendResult<PathBuf> {
            if let Some(needle) = &self.fail_on {
                if path.to_string_lossy().contains(needle.as_str()) {
                    return Err(crate::error::BackendError::open(
                        path.to_path_buf(),
                        "injected failure".to_string(),
                    ));
                }
            }
            Ok(path.to_path_buf())
        }

        fn export_sequence(
            &self,
            _handle: &PathBuf,
            config: &SequenceExportConfig,
        ) -> BackendResult<ExportOutcome> {
            self.exports.borrow_mut().push(config.clone());
            Ok(ExportOutcome {
                files: vec![config.save.clone()],
                frames_written: 1,
                bytes_written: 32,
            })
        }
    }

    fn engine_with(backend: FakeBackend) -> ConversionEngine<FakeBackend> {
        ConversionEngine::new(ConversionConfig::default(), backend)
    }

    fn quiet_options() -> BatchOptions {
        BatchOptions {
            quiet: true,
            ..Default::default()
        }
    }

    fn touch(path: &Path) {
        std::fs::write(path, b"stub").unwrap();
    }

    #[test]
    fn test_converts_matching_skips_rest() {
        let tmp = tempdir().unwrap();
        touch(&tmp.path().join("a.lsm"));
        touch(&tmp.path().join("b.lsm"));
        touch(&tmp.path().join("notes.txt"));
        touch(&tmp.path().join("readme.md"));
        touch(&tmp.path().join("c.lsm"));

        let engine = engine_with(FakeBackend::default());
        let summary = convert_directory(&engine, tmp.path(), &quiet_options()).unwrap();

        assert_eq!(summary.converted.len(), 3);
        assert_eq!(summary.skipped.len(), 2);
        assert_eq!(summary.stats.files_converted, 3);
        assert_eq!(summary.stats.files_skipped, 2);
        assert_eq!(engine.backend().exports.borrow().len(), 3);
    }

    #[test]
    fn test_directories_pass_silently() {
        let tmp = tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("nested")).unwrap();
        touch(&tmp.path().join("nested/inner.lsm"));
        touch(&tmp.path().join("a.lsm"));

        let engine = engine_with(FakeBackend::default());
        let summary = convert_directory(&engine, tmp.path(), &quiet_options()).unwrap();

        // The nested directory is neither converted nor skipped-with-notice
        assert_eq!(summary.converted.len(), 1);
        assert_eq!(summary.skipped.len(), 0);
        assert_eq!(summary.directories, 1);
    }

    #[test]
    fn test_recursive_descends() {
        let tmp = tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("nested")).unwrap();
        touch(&tmp.path().join("nested/inner.lsm"));
        touch(&tmp.path().join("a.lsm"));

        let engine = engine_with(FakeBackend::default());
        let options = BatchOptions {
            recursive: true,
            ..quiet_options()
        };
        let summary = convert_directory(&engine, tmp.path(), &options).unwrap();
        assert_eq!(summary.converted.len(), 2);
    }

    #[test]
    fn test_empty_directory() {
        let tmp = tempdir().unwrap();
        let engine = engine_with(FakeBackend::default());
        let summary = convert_directory(&engine, tmp.path(), &quiet_options()).unwrap();

        assert!(summary.converted.is_empty());
        assert!(summary.skipped.is_empty());
        assert_eq!(summary.stats.files_converted, 0);
    }

    #[test]
    fn test_skip_notices_in_listing_order() {
        let tmp = tempdir().unwrap();
        touch(&tmp.path().join("c.txt"));
        touch(&tmp.path().join("a.txt"));
        touch(&tmp.path().join("b.txt"));

        let engine = engine_with(FakeBackend::default());
        let summary = convert_directory(&engine, tmp.path(), &quiet_options()).unwrap();

        let names: Vec<_> = summary
            .skipped
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
        assert!(summary.converted.is_empty());
    }

    #[test]
    fn test_artifact_named_next_to_input() {
        let tmp = tempdir().unwrap();
        touch(&tmp.path().join("sample.lsm"));

        let engine = engine_with(FakeBackend::default());
        convert_directory(&engine, tmp.path(), &quiet_options()).unwrap();

        let exports = engine.backend().exports.borrow();
        assert_eq!(exports.len(), 1);
        assert_eq!(exports[0].save, tmp.path().join("sample_c001_t001.tif"));
        assert_eq!(exports[0].name, "sample");
    }

    #[test]
    fn test_fail_fast_by_default() {
        let tmp = tempdir().unwrap();
        touch(&tmp.path().join("a.lsm"));
        touch(&tmp.path().join("b.lsm"));

        let backend = FakeBackend {
            fail_on: Some("a.lsm".to_string()),
            ..Default::default()
        };
        let engine = engine_with(backend);
        let result = convert_directory(&engine, tmp.path(), &quiet_options());
        assert!(result.is_err());
    }

    #[test]
    fn test_continue_on_error_collects_failures() {
        let tmp = tempdir().unwrap();
        touch(&tmp.path().join("a.lsm"));
        touch(&tmp.path().join("b.lsm"));

        let backend = FakeBackend {
            fail_on: Some("a.lsm".to_string()),
            ..Default::default()
        };
        let engine = engine_with(backend);
        let options = BatchOptions {
            continue_on_error: true,
            ..quiet_options()
        };
        let summary = convert_directory(&engine, tmp.path(), &options).unwrap();

        assert_eq!(summary.converted.len(), 1);
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].0.ends_with("a.lsm"));
    }
}
