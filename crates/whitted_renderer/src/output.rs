//! Image encoding and export.
//!
//! The native format is binary PPM (`P6`): a short ASCII header followed by
//! raw RGB triplets, row-major from the top-left pixel. PNG export goes
//! through the `image` crate.

use std::fs::File;
use std::hash::Hasher;
use std::io::{BufWriter, Write};
use std::path::Path;

use fnv::FnvHasher;
use thiserror::Error;

use crate::ImageBuffer;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

pub type OutputResult<T> = Result<T, OutputError>;

/// PPM header for an image of the given size.
pub fn ppm_header(width: u32, height: u32) -> String {
    format!("P6\n{} {}\n255\n", width, height)
}

/// Encode an image as binary PPM.
pub fn encode_ppm(image: &ImageBuffer) -> Vec<u8> {
    let header = ppm_header(image.width, image.height);
    let pixels = image.to_rgb8();

    let mut bytes = Vec::with_capacity(header.len() + pixels.len());
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend_from_slice(&pixels);
    bytes
}

/// Write an image as binary PPM.
pub fn write_ppm<P: AsRef<Path>>(image: &ImageBuffer, path: P) -> OutputResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&encode_ppm(image))?;
    writer.flush()?;
    Ok(())
}

/// Write an image as PNG.
pub fn write_png<P: AsRef<Path>>(image: &ImageBuffer, path: P) -> OutputResult<()> {
    let pixels = image.to_rgb8();
    let actual = pixels.len();
    let expected = image.width as usize * image.height as usize * 3;

    let rgb = image::RgbImage::from_raw(image.width, image.height, pixels)
        .ok_or(OutputError::BufferSize { expected, actual })?;
    rgb.save_with_format(path.as_ref(), image::ImageFormat::Png)?;
    Ok(())
}

/// Write an image, choosing the format from the file extension.
///
/// `.ppm` and `.png` are supported; a missing extension means PPM.
pub fn save<P: AsRef<Path>>(image: &ImageBuffer, path: P) -> OutputResult<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        None | Some("ppm") => write_ppm(image, path)?,
        Some("png") => write_png(image, path)?,
        Some(other) => return Err(OutputError::UnsupportedFormat(other.to_string())),
    }

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}

/// 64-bit FNV-1a checksum of a byte buffer.
pub fn checksum(bytes: &[u8]) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(bytes);
    hasher.finish()
}
