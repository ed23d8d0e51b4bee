//! Run-level error taxonomy.
//!
//! Codec and filesystem layers have their own error enums; the pipeline
//! wraps them here with the path of the asset being processed.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::replace::ReplaceError;

/// Step of the run at which a generic I/O error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the source bytes.
    Read,
    /// Reading file sizes for the report.
    Measure,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Read => f.write_str("read"),
            Stage::Measure => f.write_str("measure"),
        }
    }
}

/// Main error type for an optimizer run.
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// The input directory is missing, not a directory, or cannot be listed.
    #[error("Cannot read asset directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file could not be decoded; it is left untouched.
    #[error("Skipping unreadable image {path}: {source}")]
    UnreadableImage {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// Resampling failed; the file is left untouched.
    #[error("Failed to resize {path}: {source}")]
    Transform {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// Encoding or staging the replacement failed; the file is left untouched.
    #[error("Failed to encode {path}: {source}")]
    EncodeFailure {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },

    /// Swapping the replacement into place failed.
    #[error("Failed to replace {path}: {source}")]
    ReplaceFailure {
        path: PathBuf,
        #[source]
        source: ReplaceError,
    },

    /// Any other I/O error.
    #[error("Failed to {stage} {path}: {source}")]
    Io {
        path: PathBuf,
        stage: Stage,
        #[source]
        source: io::Error,
    },
}

impl OptimizeError {
    /// True for per-file failures after which the run continues.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            OptimizeError::UnreadableImage { .. }
                | OptimizeError::Transform { .. }
                | OptimizeError::EncodeFailure { .. }
        )
    }
}
