//! Integration tests for sequence export modes against the TIFF backend

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use lsmconv::{ConversionConfig, ConversionEngine, ImageIo, TiffBackend};
use tempfile::tempdir;
use tiff::decoder::Decoder;
use tiff::encoder::{colortype, TiffEncoder};

fn write_stack(path: &Path, frames: usize) {
    let file = File::create(path).unwrap();
    let mut encoder = TiffEncoder::new(BufWriter::new(file)).unwrap();
    for index in 0..frames {
        encoder
            .write_image::<colortype::Gray16>(3, 2, &[index as u16; 6])
            .unwrap();
    }
}

fn page_count(path: &Path) -> usize {
    let file = File::open(path).unwrap();
    let mut decoder = Decoder::new(std::io::BufReader::new(file)).unwrap();
    let mut pages = 1;
    while decoder.more_images() {
        decoder.next_image().unwrap();
        pages += 1;
    }
    pages
}

#[test]
fn test_stack_exports_as_single_multipage_artifact() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("stack.lsm");
    write_stack(&input, 5);

    let engine = ConversionEngine::new(ConversionConfig::default(), TiffBackend::new());
    let save = tmp.path().join("stack_c001_t001.tif");
    let converted = engine.convert_file(&input, &save).unwrap();

    assert_eq!(converted.outcome.files, vec![save.clone()]);
    assert_eq!(converted.metadata.frames_written, 5);
    assert_eq!(page_count(&save), 5);
}

#[test]
fn test_split_mode_writes_numbered_files() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("stack.lsm");
    write_stack(&input, 3);

    let config = ConversionConfig::default().with_split_frames(true);
    let engine = ConversionEngine::new(config, TiffBackend::new());
    let save = tmp.path().join("stack_c001_t001.tif");
    let converted = engine.convert_file(&input, &save).unwrap();

    assert_eq!(converted.metadata.frames_written, 3);
    assert_eq!(
        converted.outcome.files,
        vec![
            tmp.path().join("stack000.tif"),
            tmp.path().join("stack001.tif"),
            tmp.path().join("stack002.tif"),
        ]
    );
    for file in &converted.outcome.files {
        assert_eq!(page_count(file), 1);
    }
}

#[test]
fn test_split_mode_honors_start_and_digits() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("scan.lsm");
    write_stack(&input, 2);

    let config = ConversionConfig::default()
        .with_split_frames(true)
        .with_start_index(10)
        .with_digits(4)
        .unwrap();
    let engine = ConversionEngine::new(config, TiffBackend::new());
    let converted = engine
        .convert_file(&input, &tmp.path().join("scan_c001_t001.tif"))
        .unwrap();

    assert_eq!(
        converted.outcome.files,
        vec![
            tmp.path().join("scan0010.tif"),
            tmp.path().join("scan0011.tif"),
        ]
    );
}

#[test]
fn test_pixel_data_survives_conversion() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("scan.lsm");
    write_stack(&input, 1);

    let engine = ConversionEngine::new(ConversionConfig::default(), TiffBackend::new());
    let save = tmp.path().join("scan_c001_t001.tif");
    engine.convert_file(&input, &save).unwrap();

    let backend = TiffBackend::new();
    let handle = backend.open(&save).unwrap();
    assert_eq!(handle.frames.len(), 1);
    assert_eq!(handle.frames[0].width, 3);
    assert_eq!(handle.frames[0].height, 2);
}

#[test]
fn test_oversized_input_rejected() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("big.lsm");
    let file = File::create(&input).unwrap();
    let mut encoder = TiffEncoder::new(BufWriter::new(file)).unwrap();
    encoder
        .write_image::<colortype::Gray16>(64, 64, &[0u16; 64 * 64])
        .unwrap();
    drop(encoder);
    assert!(std::fs::metadata(&input).unwrap().len() > 1024);

    let config = ConversionConfig::default().with_memory_limit(1024);
    let engine = ConversionEngine::new(config, TiffBackend::new());
    let result = engine.convert_file(&input, &tmp.path().join("big_c001_t001.tif"));
    assert!(result.is_err());
    assert!(!tmp.path().join("big_c001_t001.tif").exists());
}
