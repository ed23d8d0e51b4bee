//! Image decoding and resampling for the optimizer.
//!
//! This module provides functionality for:
//! - Decoding PNG (and JPEG) asset bytes into 8-bit rasters
//! - Reporting whether the decoded color model carries alpha
//! - Resampling to a target size, keeping or flattening transparency
//!
//! All operations are synchronous and allocate a fresh raster; inputs are
//! never modified.

mod reader;
mod resize;
mod types;

pub use reader::decode_image;
pub use resize::{resize_composite, WHITE};
pub use types::{ColorMode, DecodeError, DecodedImage, FilterType};
