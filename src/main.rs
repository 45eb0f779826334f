// Allow dead code for library features compiled into the binary but not
// used by the CLI
#![allow(dead_code)]

use clap::Parser;
use std::path::{Path, PathBuf};

mod cli;
mod conversion;
mod error;
mod io;
mod scan;

use crate::cli::{path_mapping, Args, CliConfig, CliUtils};
use crate::conversion::batch;
use crate::conversion::stats::ConversionStatistics;
use crate::conversion::ConversionEngine;
use crate::error::{ConvertError, ConvertErrorKind, ConvertResult};
use crate::io::TiffBackend;

fn main() {
    let args = Args::parse();

    if let Err(error) = run(args) {
        cli::handle_error(&error);
        std::process::exit(1);
    }
}

fn run(args: Args) -> ConvertResult<()> {
    let config = CliConfig::from_args(args)?;

    let input = config.args().input.clone().ok_or_else(|| {
        ConvertError::conversion(ConvertErrorKind::configuration(
            "No input provided. Pass a directory or a .lsm file".to_string(),
        ))
    })?;

    let path = PathBuf::from(&input);
    if path.is_file() {
        convert_file(&path, &config)
    } else if path.is_dir() {
        convert_directory(&path, &config)
    } else {
        Err(ConvertError::conversion(ConvertErrorKind::io(
            "Input path does not exist".to_string(),
            Some(path),
        )))
    }
}

fn convert_file(input: &Path, config: &CliConfig) -> ConvertResult<()> {
    let engine = ConversionEngine::new(config.conversion().clone(), TiffBackend::new());

    let format = config.conversion().target_format;
    let save = match &config.args().output {
        Some(output_dir) => {
            let input_dir = input.parent().unwrap_or_else(|| Path::new(""));
            path_mapping::map_input_to_output(input_dir, input, output_dir, format)
        }
        None => path_mapping::sequence_save_path(input, format),
    };

    let converted = engine.convert_file(input, &save)?;
    CliUtils::show_success(
        &format!("{} -> {}", input.display(), save.display()),
        config.is_quiet(),
    );

    if config.want_stats() {
        let stats = ConversionStatistics::for_conversion(
            converted.metadata.input_size,
            converted.metadata.output_size,
            converted.metadata.frames_written,
            std::time::Duration::from_millis(converted.metadata.processing_time_ms),
        );
        output_statistics(&stats, config)?;
    }

    Ok(())
}

fn convert_directory(input_dir: &Path, config: &CliConfig) -> ConvertResult<()> {
    if !config.is_quiet() {
        println!("Processing folder {}", input_dir.display());
    }

    if config.is_verbose() && !config.is_quiet() {
        let matching = scan::find_lsm_files(input_dir, config.args().recursive)?;
        println!("Found {} LSM files", matching.len());
    }

    let engine = ConversionEngine::new(config.conversion().clone(), TiffBackend::new());
    let summary = batch::convert_directory(&engine, input_dir, &config.batch_options())?;

    if !config.is_quiet() {
        println!("Done. {}", summary.stats.summary());
    }

    if config.want_stats() {
        output_statistics(&summary.stats, config)?;
    }

    Ok(())
}

fn output_statistics(stats: &ConversionStatistics, config: &CliConfig) -> ConvertResult<()> {
    if config.is_quiet() {
        return Ok(());
    }

    if config.args().stats_json {
        let json = stats
            .to_json()
            .map_err(|e| ConvertError::other(anyhow::anyhow!(e)))?;
        println!("{}", json);
        return Ok(());
    }

    println!("\nConversion Statistics:");
    println!("Files converted: {}", stats.files_converted);
    println!("Files skipped: {}", stats.files_skipped);
    println!("Frames written: {}", stats.frames_written);
    println!(
        "Input size: {}",
        CliUtils::format_file_size(stats.input_size_bytes)
    );
    println!(
        "Output size: {}",
        CliUtils::format_file_size(stats.output_size_bytes)
    );
    println!(
        "Processing time: {}",
        CliUtils::format_duration(std::time::Duration::from_millis(stats.processing_time_ms))
    );

    Ok(())
}
