//! Decoding of encoded asset bytes into rasters.

use std::io::Cursor;

use image::{DynamicImage, ImageError, ImageReader};

use super::{ColorMode, DecodeError, DecodedImage};

/// Decode PNG or JPEG bytes into a raster.
///
/// The returned image is `Rgba` whenever the decoded color model carries an
/// alpha channel (RGBA, gray+alpha, palette with transparency) and `Rgb`
/// otherwise. Pixels are not scanned: a fully opaque RGBA file still
/// reports `has_alpha() == true`.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognized
/// and `DecodeError::CorruptedFile` if the codec rejects the data. The
/// decoder's default allocation cap is lifted, so large but valid source
/// art decodes as long as memory allows.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader.no_limits();
    let img = reader.decode().map_err(map_image_error)?;

    Ok(into_decoded(img))
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Limits(e) => DecodeError::LimitsExceeded(e.to_string()),
        ImageError::Unsupported(e) => DecodeError::Unsupported(e.to_string()),
        other => DecodeError::CorruptedFile(other.to_string()),
    }
}

fn into_decoded(img: DynamicImage) -> DecodedImage {
    match color_mode_of(&img) {
        ColorMode::Rgba => DecodedImage::from_rgba_image(img.into_rgba8()),
        ColorMode::Rgb => DecodedImage::from_rgb_image(img.into_rgb8()),
    }
}

fn color_mode_of(img: &DynamicImage) -> ColorMode {
    if img.color().has_alpha() {
        ColorMode::Rgba
    } else {
        ColorMode::Rgb
    }
}
