//! Core types for decoded rasters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding and resampling.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not in a recognized format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The codec recognized the format but not a feature the file uses.
    #[error("Unsupported image feature: {0}")]
    Unsupported(String),

    /// Decoding was refused for resource reasons; the data may be valid.
    #[error("Image exceeds decoder limits: {0}")]
    LimitsExceeded(String),

    /// Requested output dimensions contain a zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel buffer length does not match the declared dimensions.
    #[error("Pixel buffer mismatch: expected {expected} bytes, got {actual}")]
    PixelBufferMismatch { expected: usize, actual: usize },
}

/// Resampling filter used when scaling assets.
///
/// Only smooth interpolating filters are offered: nearest neighbour
/// visibly degrades downscaled icon artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Bicubic (Catmull-Rom) interpolation.
    #[default]
    Bicubic,
    /// Lanczos3 interpolation (slower, sharper).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Bicubic => image::imageops::FilterType::CatmullRom,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Channel layout of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// 3 bytes per pixel, no alpha.
    Rgb,
    /// 4 bytes per pixel, straight (non-premultiplied) alpha.
    Rgba,
}

impl ColorMode {
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Rgb => 3,
            ColorMode::Rgba => 4,
        }
    }

    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(self, ColorMode::Rgba)
    }
}

/// A decoded raster with 8-bit channels.
///
/// For a freshly decoded asset the mode mirrors the source color model, so
/// `has_alpha()` reports whether the format carries an alpha channel, not
/// whether any pixel is actually transparent.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data in row-major order, `mode.channels()` bytes per pixel.
    pub pixels: Vec<u8>,
    /// Channel layout of `pixels`.
    pub mode: ColorMode,
}

impl DecodedImage {
    /// Create a new DecodedImage, checking the buffer against the dimensions.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        mode: ColorMode,
    ) -> Result<Self, DecodeError> {
        let expected = width as usize * height as usize * mode.channels();
        if pixels.len() != expected {
            return Err(DecodeError::PixelBufferMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            mode,
        })
    }

    /// Create an opaque DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
            mode: ColorMode::Rgb,
        }
    }

    /// Create an alpha-carrying DecodedImage from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
            mode: ColorMode::Rgba,
        }
    }

    /// Expand to RGBA, filling alpha with 255 for opaque rasters.
    ///
    /// Consumes the raster; an RGBA buffer is reused without copying.
    pub fn into_rgba_image(self) -> Result<image::RgbaImage, DecodeError> {
        let expected = self.width as usize * self.height as usize * self.mode.channels();
        let actual = self.pixels.len();
        let mismatch = || DecodeError::PixelBufferMismatch { expected, actual };

        match self.mode {
            ColorMode::Rgba => {
                image::RgbaImage::from_raw(self.width, self.height, self.pixels).ok_or_else(mismatch)
            }
            ColorMode::Rgb => {
                let rgb = image::RgbImage::from_raw(self.width, self.height, self.pixels)
                    .ok_or_else(mismatch)?;
                Ok(image::DynamicImage::ImageRgb8(rgb).into_rgba8())
            }
        }
    }

    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.mode.has_alpha()
    }
}
