//! JPEG encoding for the lossy path.
//!
//! Uses the `image` crate's baseline JPEG encoder. The optimizer hands it
//! rasters already flattened onto an opaque background.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{validate_raster, EncodeError, RasterEncoder};
use crate::decode::{ColorMode, DecodedImage};
use crate::policy::OutputFormat;

/// [`RasterEncoder`] for [`OutputFormat::Lossy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegOutput;

impl RasterEncoder for JpegOutput {
    fn format(&self) -> OutputFormat {
        OutputFormat::Lossy
    }

    fn encode(&self, image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
        encode_jpeg(image, quality)
    }
}

/// Map a 0-1 quality factor onto the encoder's 1-100 scale.
///
/// Out-of-range values are clamped; NaN falls back to the 0.82 default.
pub fn jpeg_quality(quality: f32) -> u8 {
    let quality = if quality.is_nan() { 0.82 } else { quality };
    ((quality.clamp(0.0, 1.0) * 100.0).round() as u8).clamp(1, 100)
}

/// Encode an opaque RGB raster to JPEG bytes.
///
/// # Arguments
///
/// * `image` - RGB raster (3 bytes per pixel, row-major order)
/// * `quality` - quality factor on a 0-1 scale (0.82 for bundled assets)
///
/// # Errors
///
/// Returns `EncodeError::UnsupportedColorMode` for RGBA input, since JPEG has
/// no alpha channel and callers are expected to flatten first.
pub fn encode_jpeg(image: &DecodedImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
    validate_raster(image)?;

    if image.mode != ColorMode::Rgb {
        return Err(EncodeError::UnsupportedColorMode {
            format: "JPEG",
            mode: image.mode,
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality));

    encoder
        .write_image(
            &image.pixels,
            image.width,
            image.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| EncodeError::EncodingFailed {
            format: "JPEG",
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any valid RGB raster at any quality produces a JPEG stream.
        #[test]
        fn prop_valid_input_produces_valid_jpeg(
            (width, height) in (1u32..=40, 1u32..=40),
            quality in 0.0f32..=1.0,
        ) {
            let img = DecodedImage::new(
                width,
                height,
                vec![100u8; (width * height * 3) as usize],
                ColorMode::Rgb,
            ).unwrap();

            let jpeg = encode_jpeg(&img, quality).unwrap();
            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
            prop_assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
        }

        /// Property: mapped quality always lands within the encoder range.
        #[test]
        fn prop_quality_in_encoder_range(quality in proptest::num::f32::ANY) {
            let q = jpeg_quality(quality);
            prop_assert!((1..=100).contains(&q));
        }
    }
}
