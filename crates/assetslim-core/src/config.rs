//! Tunables for an optimizer run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;
use crate::policy::OutputFormat;

/// Default bound on the longer image edge, in pixels.
pub const DEFAULT_MAX_LONG_EDGE: u32 = 1200;
/// Default JPEG quality factor.
pub const DEFAULT_LOSSY_QUALITY: f32 = 0.82;
/// Default PNG compression effort factor.
pub const DEFAULT_LOSSLESS_QUALITY: f32 = 0.9;
/// Base names whose transparency is flattened regardless of alpha.
pub const DEFAULT_FORCE_LOSSY: &[&str] = &["cups02", "cups06"];

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max_long_edge must be at least 1 pixel")]
    ZeroLongEdge,

    #[error("{field} must be within 0.0..=1.0, got {value}")]
    QualityOutOfRange { field: &'static str, value: f32 },
}

/// Settings shared by every file in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Bound on the longer edge; smaller images are left at their size.
    pub max_long_edge: u32,
    /// JPEG quality, 0-1.
    pub lossy_quality: f32,
    /// PNG compression effort, 0-1.
    pub lossless_quality: f32,
    /// Base names (file name without extension) always encoded lossy.
    pub force_lossy: BTreeSet<String>,
    /// Resampling filter.
    #[serde(default)]
    pub filter: FilterType,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_long_edge: DEFAULT_MAX_LONG_EDGE,
            lossy_quality: DEFAULT_LOSSY_QUALITY,
            lossless_quality: DEFAULT_LOSSLESS_QUALITY,
            force_lossy: DEFAULT_FORCE_LOSSY.iter().map(|s| s.to_string()).collect(),
            filter: FilterType::default(),
        }
    }
}

impl OptimizerConfig {
    pub fn with_max_long_edge(mut self, max_long_edge: u32) -> Self {
        self.max_long_edge = max_long_edge;
        self
    }

    /// Replace the force-lossy set.
    pub fn with_force_lossy<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.force_lossy = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Quality factor handed to the encoder for `format`.
    pub fn quality_for(&self, format: OutputFormat) -> f32 {
        match format {
            OutputFormat::Lossy => self.lossy_quality,
            OutputFormat::Lossless => self.lossless_quality,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_long_edge == 0 {
            return Err(ConfigError::ZeroLongEdge);
        }
        check_unit("lossy_quality", self.lossy_quality)?;
        check_unit("lossless_quality", self.lossless_quality)?;
        Ok(())
    }
}

fn check_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::QualityOutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OptimizerConfig::default();

        assert_eq!(config.max_long_edge, 1200);
        assert_eq!(config.lossy_quality, 0.82);
        assert_eq!(config.lossless_quality, 0.9);
        assert!(config.force_lossy.contains("cups02"));
        assert!(config.force_lossy.contains("cups06"));
        assert_eq!(config.force_lossy.len(), 2);
        assert_eq!(config.filter, FilterType::Bicubic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_quality_for_format() {
        let config = OptimizerConfig::default();
        assert_eq!(config.quality_for(OutputFormat::Lossy), 0.82);
        assert_eq!(config.quality_for(OutputFormat::Lossless), 0.9);
    }

    #[test]
    fn test_builders() {
        let config = OptimizerConfig::default()
            .with_max_long_edge(64)
            .with_force_lossy(["hero"])
            .with_filter(FilterType::Lanczos3);

        assert_eq!(config.max_long_edge, 64);
        assert_eq!(config.force_lossy.len(), 1);
        assert!(config.force_lossy.contains("hero"));
        assert_eq!(config.filter, FilterType::Lanczos3);
    }

    #[test]
    fn test_zero_long_edge_rejected() {
        let config = OptimizerConfig::default().with_max_long_edge(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroLongEdge));
    }

    #[test]
    fn test_quality_out_of_range_rejected() {
        let mut config = OptimizerConfig::default();
        config.lossy_quality = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::QualityOutOfRange {
                field: "lossy_quality",
                ..
            })
        ));

        let mut config = OptimizerConfig::default();
        config.lossless_quality = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::QualityOutOfRange {
                field: "lossless_quality",
                ..
            })
        ));
    }
}
