//! Image encoding for the two output formats.
//!
//! This module provides functionality for:
//! - Encoding opaque rasters to JPEG at a 0-1 quality factor
//! - Encoding rasters with or without alpha to PNG at a 0-1 effort factor
//! - Resolving the encoder for an [`OutputFormat`] at runtime
//!
//! # Examples
//!
//! ```ignore
//! use assetslim_core::encode::encoder_for;
//! use assetslim_core::policy::OutputFormat;
//!
//! let bytes = encoder_for(OutputFormat::Lossy).encode(&raster, 0.82)?;
//! ```

mod jpeg;
mod png;

use std::io;

use thiserror::Error;

use crate::decode::{ColorMode, DecodedImage};
use crate::policy::OutputFormat;

pub use jpeg::{encode_jpeg, jpeg_quality, JpegOutput};
pub use png::{encode_png, png_compression, PngOutput};

/// Errors that can occur while producing an encoded replacement.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The target format cannot store this channel layout
    #[error("{format} cannot encode {mode:?} rasters")]
    UnsupportedColorMode {
        format: &'static str,
        mode: ColorMode,
    },

    /// The codec failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: &'static str,
        message: String,
    },

    /// Encoded bytes could not be written to a temporary file
    #[error("Failed to stage encoded output: {0}")]
    Staging(#[source] io::Error),
}

/// Encoder for one output format.
///
/// `quality` is on a 0-1 scale; each implementation maps it onto whatever
/// knob its codec exposes.
pub trait RasterEncoder: Send + Sync {
    /// The format this encoder produces.
    fn format(&self) -> OutputFormat;

    /// Encode `image` to file bytes.
    fn encode(&self, image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError>;
}

static JPEG_OUTPUT: JpegOutput = JpegOutput;
static PNG_OUTPUT: PngOutput = PngOutput;

/// Resolve the encoder for `format`.
pub fn encoder_for(format: OutputFormat) -> &'static dyn RasterEncoder {
    match format {
        OutputFormat::Lossy => &JPEG_OUTPUT,
        OutputFormat::Lossless => &PNG_OUTPUT,
    }
}

/// Shared input validation for both codecs.
fn validate_raster(image: &DecodedImage) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = image.width as usize * image.height as usize * image.mode.channels();
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    Ok(())
}
