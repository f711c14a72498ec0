//! Image decoding.
//!
//! Turns encoded image bytes into an RGBA pixel buffer. Palette, grayscale and
//! 16-bit sources are normalised to 8-bit truecolor RGBA.

use image::{ImageError, ImageReader, Limits, RgbaImage};
use std::io::Cursor;
use thiserror::Error;

/// Decode errors
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Image decode failed: {0}")]
    Decode(ImageError),

    #[error("Image exceeds decode limits: {0}")]
    TooLarge(image::error::LimitError),

    #[error("Unrecognised image data: {0}")]
    Format(#[from] std::io::Error),
}

impl From<ImageError> for SourceError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::Limits(limit) => SourceError::TooLarge(limit),
            other => SourceError::Decode(other),
        }
    }
}

/// Decode limits
#[derive(Debug, Clone)]
pub struct SourceLimits {
    /// Maximum width and height of a decoded image
    pub max_dimension: u32,
}

impl Default for SourceLimits {
    fn default() -> Self {
        Self {
            max_dimension: 4096,
        }
    }
}

/// Decode image bytes into an RGBA buffer
pub fn decode_image(bytes: &[u8], limits: &SourceLimits) -> Result<RgbaImage, SourceError> {
    let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;

    let mut decode_limits = Limits::default();
    decode_limits.max_image_width = Some(limits.max_dimension);
    decode_limits.max_image_height = Some(limits.max_dimension);
    reader.limits(decode_limits);

    let format = reader.format();
    let img = reader.decode()?;

    tracing::debug!(
        "Image decoded: {}x{} ({:?}, {:?})",
        img.width(),
        img.height(),
        format,
        img.color()
    );

    Ok(img.into_rgba8())
}
