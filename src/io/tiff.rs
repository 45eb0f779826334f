//! Reference [`ImageIo`] backend built on the `tiff` crate
//!
//! LSM files are TIFF containers, so the decoder handles them directly. The
//! only LSM-specific wrinkle is that acquisition software interleaves
//! reduced-resolution thumbnail planes between the data planes; those are
//! filtered out by the `NewSubfileType` tag.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;
use tiff::ColorType;

use crate::error::{BackendError, BackendResult};
use crate::io::{ExportOutcome, ImageIo, SequenceExportConfig};

/// Sample storage for one decoded frame
#[derive(Debug, Clone)]
pub enum SampleBuffer {
    U8(Vec<u8>),
    U16(Vec<u16>),
    F32(Vec<f32>),
}

/// Channel layout of one decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Gray,
    Rgb,
}

/// One full-resolution image plane
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub samples: SampleBuffer,
}

/// An opened LSM file with all data planes decoded
#[derive(Debug)]
pub struct TiffHandle {
    pub source: PathBuf,
    pub frames: Vec<Frame>,
}

impl TiffHandle {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// [`ImageIo`] implementation delegating to the `tiff` crate
#[derive(Debug, Default, Clone)]
pub struct TiffBackend;

impl TiffBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ImageIo for TiffBackend {
    type Handle = TiffHandle;

    fn open(&self, path: &Path) -> BackendResult<TiffHandle> {
        let file = File::open(path)
            .map_err(|e| BackendError::open(path.to_path_buf(), e.to_string()))?;

        let mut decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| BackendError::decode(path.to_path_buf(), e.to_string()))?;

        let mut frames = Vec::new();
        loop {
            if !is_thumbnail_plane(&mut decoder) {
                frames.push(read_frame(&mut decoder, path)?);
            }

            if !decoder.more_images() {
                break;
            }
            decoder
                .next_image()
                .map_err(|e| BackendError::decode(path.to_path_buf(), e.to_string()))?;
        }

        if frames.is_empty() {
            return Err(BackendError::decode(
                path.to_path_buf(),
                "No full-resolution image planes found".to_string(),
            ));
        }

        Ok(TiffHandle {
            source: path.to_path_buf(),
            frames,
        })
    }

    fn export_sequence(
        &self,
        handle: &TiffHandle,
        config: &SequenceExportConfig,
    ) -> BackendResult<ExportOutcome> {
        let mut outcome = ExportOutcome::default();

        if config.split_frames {
            for (index, frame) in handle.frames.iter().enumerate() {
                let path = config.frame_path(index as u32);
                check_clobber(&path, config)?;
                write_tiff(&path, std::slice::from_ref(frame))?;
                outcome.bytes_written += written_size(&path)?;
                outcome.files.push(path);
                outcome.frames_written += 1;
            }
        } else {
            // All planes go into one multi-page file at the save path, so a
            // stack still produces exactly one artifact per input.
            check_clobber(&config.save, config)?;
            write_tiff(&config.save, &handle.frames)?;
            outcome.bytes_written = written_size(&config.save)?;
            outcome.files.push(config.save.clone());
            outcome.frames_written = handle.frames.len();
        }

        Ok(outcome)
    }
}

/// True when the current IFD is flagged reduced-resolution
fn is_thumbnail_plane<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> bool {
    match decoder.find_tag(Tag::NewSubfileType) {
        Ok(Some(value)) => value.into_u64().map(|v| v & 1 != 0).unwrap_or(false),
        _ => false,
    }
}

fn read_frame<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
    path: &Path,
) -> BackendResult<Frame> {
    let (width, height) = decoder
        .dimensions()
        .map_err(|e| BackendError::decode(path.to_path_buf(), e.to_string()))?;

    let layout = match decoder
        .colortype()
        .map_err(|e| BackendError::decode(path.to_path_buf(), e.to_string()))?
    {
        ColorType::Gray(_) => PixelLayout::Gray,
        ColorType::RGB(_) => PixelLayout::Rgb,
        other => {
            return Err(BackendError::decode(
                path.to_path_buf(),
                format!("Unsupported color type: {:?}", other),
            ))
        }
    };

    let samples = match decoder
        .read_image()
        .map_err(|e| BackendError::decode(path.to_path_buf(), e.to_string()))?
    {
        DecodingResult::U8(data) => SampleBuffer::U8(data),
        DecodingResult::U16(data) => SampleBuffer::U16(data),
        DecodingResult::F32(data) => SampleBuffer::F32(data),
        _ => {
            return Err(BackendError::decode(
                path.to_path_buf(),
                "Unsupported sample format".to_string(),
            ))
        }
    };

    Ok(Frame {
        width,
        height,
        layout,
        samples,
    })
}

fn check_clobber(path: &Path, config: &SequenceExportConfig) -> BackendResult<()> {
    if !config.overwrite && path.exists() {
        return Err(BackendError::write(
            path.to_path_buf(),
            "Output already exists".to_string(),
        ));
    }
    Ok(())
}

fn write_tiff(path: &Path, frames: &[Frame]) -> BackendResult<()> {
    let file =
        File::create(path).map_err(|e| BackendError::write(path.to_path_buf(), e.to_string()))?;

    let mut encoder = TiffEncoder::new(BufWriter::new(file))
        .map_err(|e| BackendError::encode(path.to_path_buf(), e.to_string()))?;

    for frame in frames {
        write_frame(&mut encoder, frame, path)?;
    }

    Ok(())
}

fn write_frame<W: std::io::Write + std::io::Seek>(
    encoder: &mut TiffEncoder<W>,
    frame: &Frame,
    path: &Path,
) -> BackendResult<()> {
    let result = match (frame.layout, &frame.samples) {
        (PixelLayout::Gray, SampleBuffer::U8(data)) => {
            encoder.write_image::<colortype::Gray8>(frame.width, frame.height, data)
        }
        (PixelLayout::Gray, SampleBuffer::U16(data)) => {
            encoder.write_image::<colortype::Gray16>(frame.width, frame.height, data)
        }
        (PixelLayout::Gray, SampleBuffer::F32(data)) => {
            encoder.write_image::<colortype::Gray32Float>(frame.width, frame.height, data)
        }
        (PixelLayout::Rgb, SampleBuffer::U8(data)) => {
            encoder.write_image::<colortype::RGB8>(frame.width, frame.height, data)
        }
        (PixelLayout::Rgb, SampleBuffer::U16(data)) => {
            encoder.write_image::<colortype::RGB16>(frame.width, frame.height, data)
        }
        (PixelLayout::Rgb, SampleBuffer::F32(_)) => {
            return Err(BackendError::encode(
                path.to_path_buf(),
                "Floating-point RGB frames are not supported".to_string(),
            ))
        }
    };

    result.map_err(|e| BackendError::encode(path.to_path_buf(), e.to_string()))
}

fn written_size(path: &Path) -> BackendResult<u64> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| BackendError::write(path.to_path_buf(), e.to_string()))
}
