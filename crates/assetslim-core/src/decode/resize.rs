//! Resampling and background compositing for re-encoded assets.
//!
//! Scaling happens on premultiplied `f32` RGBA so transparent pixels do not
//! bleed their (invisible) color into visible neighbours. The scaled raster
//! is then either un-premultiplied (alpha kept) or composited over an
//! opaque background, which is the same result as filling the destination
//! with the background first and drawing the scaled source over it.

use image::{imageops, Rgb, Rgba, Rgba32FImage, RgbaImage};

use super::{DecodeError, DecodedImage, FilterType};

/// Background used when flattening transparency into an opaque raster.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Resample `image` to exactly `width` x `height`.
///
/// When `keep_alpha` is true the result is `Rgba` with per-pixel alpha
/// preserved. Otherwise the result is `Rgb`, flattened onto [`WHITE`].
/// The resample runs even when the dimensions are unchanged. The source is
/// consumed so its buffer is freed before the scaled copy is built.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` for a zero target dimension and
/// `DecodeError::PixelBufferMismatch` if the source buffer is inconsistent.
pub fn resize_composite(
    image: DecodedImage,
    width: u32,
    height: u32,
    keep_alpha: bool,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    let premultiplied = premultiply(&image.into_rgba_image()?);
    let scaled = imageops::resize(&premultiplied, width, height, filter.to_image_filter());
    drop(premultiplied);

    if keep_alpha {
        Ok(DecodedImage::from_rgba_image(unpremultiply(&scaled)))
    } else {
        Ok(DecodedImage::from_rgb_image(flatten_onto(&scaled, WHITE)))
    }
}

fn premultiply(src: &RgbaImage) -> Rgba32FImage {
    Rgba32FImage::from_fn(src.width(), src.height(), |x, y| {
        let [r, g, b, a] = src.get_pixel(x, y).0;
        let alpha = f32::from(a) / 255.0;
        Rgba([
            f32::from(r) / 255.0 * alpha,
            f32::from(g) / 255.0 * alpha,
            f32::from(b) / 255.0 * alpha,
            alpha,
        ])
    })
}

fn unpremultiply(src: &Rgba32FImage) -> RgbaImage {
    RgbaImage::from_fn(src.width(), src.height(), |x, y| {
        let [r, g, b, a] = src.get_pixel(x, y).0;
        let alpha = a.clamp(0.0, 1.0);
        let alpha_u8 = to_u8(alpha);
        // Bicubic ringing can leave tiny negative or zero alpha
        if alpha_u8 == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        Rgba([
            to_u8(r / alpha),
            to_u8(g / alpha),
            to_u8(b / alpha),
            alpha_u8,
        ])
    })
}

fn flatten_onto(src: &Rgba32FImage, background: Rgb<u8>) -> image::RgbImage {
    let bg = background.0.map(|c| f32::from(c) / 255.0);
    image::RgbImage::from_fn(src.width(), src.height(), |x, y| {
        let [r, g, b, a] = src.get_pixel(x, y).0;
        let cover = 1.0 - a.clamp(0.0, 1.0);
        Rgb([
            to_u8(r + bg[0] * cover),
            to_u8(g + bg[1] * cover),
            to_u8(b + bg[2] * cover),
        ])
    })
}

#[inline]
fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: output always has exactly the requested dimensions.
        #[test]
        fn prop_output_matches_requested_size(
            (src_w, src_h) in (1u32..=24, 1u32..=24),
            (dst_w, dst_h) in (1u32..=24, 1u32..=24),
            keep_alpha in any::<bool>(),
        ) {
            let img = DecodedImage::from_rgba_image(RgbaImage::from_pixel(src_w, src_h, Rgba([90, 60, 30, 200])));
            let out = resize_composite(img, dst_w, dst_h, keep_alpha, FilterType::Bicubic).unwrap();

            prop_assert_eq!((out.width, out.height), (dst_w, dst_h));
            prop_assert_eq!(out.pixels.len(), (dst_w * dst_h) as usize * out.mode.channels());
            prop_assert_eq!(out.has_alpha(), keep_alpha);
        }
    }
}
