//! Per-asset decisions: output format and target dimensions.
//!
//! Both functions are pure; the pipeline feeds them the file's base name and
//! the decoded raster's properties.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Output encoding chosen for an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JPEG; transparency is flattened and the extension changes.
    Lossy,
    /// PNG; alpha is kept and the file keeps its name.
    Lossless,
}

impl OutputFormat {
    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Lossy => "jpg",
            OutputFormat::Lossless => "png",
        }
    }

    /// Whether rasters for this format keep their alpha channel.
    #[inline]
    pub fn retains_alpha(self) -> bool {
        matches!(self, OutputFormat::Lossless)
    }
}

/// Pick the output format for an asset.
///
/// Names in `force_lossy` always go lossy, even when the source has an
/// alpha channel. Otherwise alpha-capable sources stay lossless.
pub fn decide_format(
    base_name: &str,
    has_alpha: bool,
    force_lossy: &BTreeSet<String>,
) -> OutputFormat {
    if force_lossy.contains(base_name) || !has_alpha {
        OutputFormat::Lossy
    } else {
        OutputFormat::Lossless
    }
}

/// Compute dimensions that fit the long edge within `max_long_edge`.
///
/// Images already within bounds are returned unchanged. Larger images are
/// scaled by a single factor applied to both axes, rounded half away from
/// zero and floored at 1 pixel.
pub fn compute_target_size(width: u32, height: u32, max_long_edge: u32) -> (u32, u32) {
    let long_edge = width.max(height);
    if long_edge <= max_long_edge {
        return (width, height);
    }

    let scale = f64::from(max_long_edge) / f64::from(long_edge);
    (scale_edge(width, scale), scale_edge(height, scale))
}

#[inline]
fn scale_edge(edge: u32, scale: f64) -> u32 {
    // f64::round is half-away-from-zero
    ((f64::from(edge) * scale).round() as u32).max(1)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
