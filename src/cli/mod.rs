//! Command-line interface module

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::conversion::{BatchOptions, ConversionConfig};
use crate::error::{ConvertError, ConvertErrorKind, ConvertResult};

pub mod path_mapping;

/// Main CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "lsmconv")]
#[command(about = "Batch-convert Zeiss LSM microscopy stacks to TIFF")]
#[command(version = "0.1.0")]
#[command(long_about = None)]
pub struct Args {
    /// Input source (directory of .lsm files, or a single .lsm file)
    #[arg()]
    pub input: Option<String>,

    /// Output directory (default: artifacts are written next to inputs)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Recursively process sub-directories
    #[arg(long)]
    pub recursive: bool,

    /// Write one numbered file per frame instead of one multi-page TIFF
    #[arg(long)]
    pub split: bool,

    /// First sequence index for split output (default: 0)
    #[arg(long)]
    pub start: Option<u32>,

    /// Zero-padding width for sequence indices (1-6, default: 3)
    #[arg(long)]
    pub digits: Option<u8>,

    /// Maximum input file size (e.g. 512MB, default: 1GB)
    #[arg(long)]
    pub memory_limit: Option<String>,

    /// Fail instead of overwriting existing artifacts
    #[arg(long)]
    pub no_overwrite: bool,

    /// Continue converting other files when one file fails
    #[arg(long)]
    pub continue_on_error: bool,

    /// Output conversion statistics
    #[arg(long)]
    pub stats: bool,

    /// Output conversion statistics as JSON
    #[arg(long)]
    pub stats_json: bool,

    /// Print every listed entry and its classification
    #[arg(long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(long)]
    pub quiet: bool,
}

/// Resolved CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    args: Args,
    conversion: ConversionConfig,
}

impl CliConfig {
    pub fn from_args(args: Args) -> ConvertResult<Self> {
        let mut conversion = ConversionConfig::new()
            .with_start_index(args.start.unwrap_or(0))
            .with_split_frames(args.split)
            .with_overwrite(!args.no_overwrite);

        if let Some(digits) = args.digits {
            conversion = conversion
                .with_digits(digits)
                .map_err(|message| {
                    ConvertError::conversion(ConvertErrorKind::configuration(message))
                })?;
        }

        if let Some(limit) = &args.memory_limit {
            conversion = conversion.with_memory_limit(parse_memory_limit(limit)?);
        }

        conversion.validate().map_err(|message| {
            ConvertError::conversion(ConvertErrorKind::configuration(message))
        })?;

        Ok(Self { args, conversion })
    }

    pub fn args(&self) -> &Args {
        &self.args
    }

    pub fn conversion(&self) -> &ConversionConfig {
        &self.conversion
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            recursive: self.args.recursive,
            continue_on_error: self.args.continue_on_error,
            output_dir: self.args.output.clone(),
            quiet: self.args.quiet,
            verbose: self.args.verbose,
            progress: CliUtils::stdout_is_terminal(),
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.args.quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.args.verbose
    }

    pub fn want_stats(&self) -> bool {
        self.args.stats || self.args.stats_json
    }
}

/// Parse a human-readable size string (e.g. "512MB", "1GB", "500KB")
pub fn parse_memory_limit(limit_str: &str) -> ConvertResult<u64> {
    let parse = |digits: &str, scale: f64| -> ConvertResult<u64> {
        digits
            .trim()
            .parse::<f64>()
            .map(|value| (value * scale) as u64)
            .map_err(|_| {
                ConvertError::conversion(ConvertErrorKind::configuration(format!(
                    "Invalid memory limit '{}'",
                    limit_str
                )))
            })
    };

    if let Some(size) = limit_str.strip_suffix("GB") {
        parse(size, 1024.0 * 1024.0 * 1024.0)
    } else if let Some(size) = limit_str.strip_suffix("MB") {
        parse(size, 1024.0 * 1024.0)
    } else if let Some(size) = limit_str.strip_suffix("KB") {
        parse(size, 1024.0)
    } else if let Some(size) = limit_str.strip_suffix('B') {
        parse(size, 1.0)
    } else {
        // Assume bytes
        parse(limit_str, 1.0)
    }
}

/// Console helpers shared by the binary and the batch loop
pub struct CliUtils;

impl CliUtils {
    /// Format a file size in human-readable format
    pub fn format_file_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }

    /// Format a duration in human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_millis = duration.as_millis();

        if total_millis < 1000 {
            format!("{}ms", total_millis)
        } else if total_millis < 60_000 {
            format!("{:.1}s", total_millis as f64 / 1000.0)
        } else {
            let minutes = total_millis / 60_000;
            let seconds = (total_millis % 60_000) / 1000;
            format!("{}m {}s", minutes, seconds)
        }
    }

    /// Create a progress bar for file processing
    pub fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
        let pb = indicatif::ProgressBar::new(total);
        pb.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb
    }

    /// Show a success message (if not in quiet mode)
    pub fn show_success(message: &str, quiet: bool) {
        if !quiet {
            if Self::should_use_color() {
                println!("{} {}", console::style("✓").green(), message);
            } else {
                println!("✓ {}", message);
            }
        }
    }

    /// Show an error message
    pub fn show_error(message: &str) {
        if Self::should_use_color() {
            eprintln!("{} {}", console::style("✗").red(), message);
        } else {
            eprintln!("✗ {}", message);
        }
    }

    /// Show a warning message (if not in quiet mode)
    pub fn show_warning(message: &str, quiet: bool) {
        if !quiet {
            eprintln!("⚠ {}", message);
        }
    }

    /// Check if stdout is attached to a terminal
    pub fn stdout_is_terminal() -> bool {
        atty::is(atty::Stream::Stdout)
    }

    /// Check if output should be colored
    pub fn should_use_color() -> bool {
        Self::stdout_is_terminal() && std::env::var("NO_COLOR").is_err()
    }

    /// Get the terminal size
    pub fn get_terminal_size() -> (u16, u16) {
        terminal_size::terminal_size()
            .map(|(width, height)| (width.0, height.0))
            .unwrap_or((80, 24))
    }
}

/// Handle CLI errors with user-friendly messages
pub fn handle_error(error: &ConvertError) {
    let message = error.user_message();
    CliUtils::show_error(&message);

    // Provide helpful suggestions
    if message.contains("too large") {
        eprintln!("\nTip: Use --memory-limit to increase the input size allowance");
    } else if message.contains("Refusing to overwrite") {
        eprintln!("\nTip: Drop --no-overwrite to replace existing artifacts");
    } else if message.contains("Scan error") {
        eprintln!("\nTip: Check that the input directory exists and is readable");
    }

    // Show usage hint
    eprintln!("\nTry 'lsmconv --help' for usage information.");
}
