//! PNG encoding for the lossless path.
//!
//! The PNG encoder has no quality setting, only a compression effort. The
//! 0-1 factor picks an effort tier; pixel data is always stored exactly.

use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use super::{validate_raster, EncodeError, RasterEncoder};
use crate::decode::{ColorMode, DecodedImage};
use crate::policy::OutputFormat;

/// [`RasterEncoder`] for [`OutputFormat::Lossless`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PngOutput;

impl RasterEncoder for PngOutput {
    fn format(&self) -> OutputFormat {
        OutputFormat::Lossless
    }

    fn encode(&self, image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
        encode_png(image, quality)
    }
}

/// Map a 0-1 factor onto the encoder's compression effort.
pub fn png_compression(quality: f32) -> CompressionType {
    if quality >= 0.67 {
        CompressionType::Best
    } else if quality >= 0.34 {
        CompressionType::Default
    } else {
        // includes NaN
        CompressionType::Fast
    }
}

/// Encode an RGB or RGBA raster to PNG bytes.
pub fn encode_png(image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
    validate_raster(image)?;

    let color = match image.mode {
        ColorMode::Rgb => ExtendedColorType::Rgb8,
        ColorMode::Rgba => ExtendedColorType::Rgba8,
    };

    let mut buffer = Cursor::new(Vec::new());
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, png_compression(quality), PngFilter::Adaptive);

    encoder
        .write_image(&image.pixels, image.width, image.height, color)
        .map_err(|e| EncodeError::EncodingFailed {
            format: "PNG",
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}
