//! Assetslim Core - shrink bundled raster assets in place
//!
//! This crate scans a directory of PNG assets and, for each file, decides
//! between lossy recompression (opaque images become JPEG) and lossless
//! recompression (images with alpha stay PNG), bounds the long edge,
//! re-encodes, and swaps the result into place without ever leaving a
//! truncated or missing asset behind.
//!
//! # Module Structure
//!
//! - `config` - tunables grouped into [`OptimizerConfig`]
//! - `policy` - pure format and size decisions
//! - `decode` - decoding and resampling/compositing
//! - `encode` - JPEG and PNG encoders behind [`RasterEncoder`]
//! - `replace` - staged, rename-based file replacement
//! - `discovery` - directory listing and size measurement
//! - `pipeline` - the sequential batch driver
//! - `report` - run totals and summary line

pub mod config;
pub mod decode;
pub mod discovery;
pub mod encode;
pub mod error;
pub mod pipeline;
pub mod policy;
pub mod replace;
pub mod report;

pub use config::{ConfigError, OptimizerConfig};
pub use decode::{decode_image, resize_composite, DecodedImage, FilterType};
pub use encode::{encoder_for, EncodeError, RasterEncoder};
pub use error::OptimizeError;
pub use pipeline::{Optimizer, ProcessedFile};
pub use policy::{compute_target_size, decide_format, OutputFormat};
pub use report::RunReport;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
