//! Convert every .lsm file in a directory and print a short report.
//!
//! Usage: cargo run --example batch_convert -- <directory>

use std::path::Path;

use lsmconv::{convert_lsm_directory_with_config, BatchOptions, ConversionConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| ".".to_string());

    let options = BatchOptions {
        continue_on_error: true,
        ..Default::default()
    };
    let summary =
        convert_lsm_directory_with_config(Path::new(&dir), &ConversionConfig::default(), &options)?;

    println!("{}", summary.stats.summary());
    for (path, error) in &summary.failed {
        eprintln!("failed: {}: {}", path.display(), error);
    }

    Ok(())
}
