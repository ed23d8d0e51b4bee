//! Crash-safe replacement of asset files.
//!
//! Replacement is two-phase. [`stage`] writes the encoded bytes to a hidden
//! temporary file beside the asset and syncs it. [`commit`] renames that
//! file onto the target path and only then removes the original if the
//! target has a different name. The asset is never absent: until the rename
//! the old file is untouched, and after it the new file is complete.
//!
//! Temporary names end in `.tmp`, so a staged file left behind by a crash is
//! never picked up as an input.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::encode::EncodeError;

const TEMP_PREFIX: &str = ".assetslim-";
const TEMP_SUFFIX: &str = ".tmp";

/// Failures while swapping a staged file into place.
#[derive(Debug, Error)]
pub enum ReplaceError {
    /// The rename onto the target failed; the original is untouched.
    #[error("could not move replacement onto {target}: {source}")]
    Persist {
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The replacement is in place but the old file could not be removed.
    #[error("replacement written to {target} but {original} could not be removed: {source}")]
    RemoveOriginal {
        original: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Encoded bytes written to a temporary file, not yet visible as an asset.
///
/// Dropping a `StagedFile` without committing it deletes the temporary file.
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
    len: u64,
}

impl StagedFile {
    #[cfg(test)]
    fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of bytes staged.
    pub(crate) fn len(&self) -> u64 {
        self.len
    }
}

/// Write `bytes` to a fresh uniquely named temporary file in `dir`.
///
/// `dir` should be the directory of the final target so the later rename
/// stays on one filesystem.
pub fn stage(dir: &Path, bytes: &[u8]) -> Result<StagedFile, EncodeError> {
    let mut file = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)
        .map_err(EncodeError::Staging)?;

    file.write_all(bytes).map_err(EncodeError::Staging)?;
    file.as_file().sync_all().map_err(EncodeError::Staging)?;

    Ok(StagedFile {
        file,
        len: bytes.len() as u64,
    })
}

/// Move `staged` onto `target`, then remove `original` if it differs.
///
/// An existing file at `target` is overwritten.
pub fn commit(staged: StagedFile, original: &Path, target: &Path) -> Result<(), ReplaceError> {
    staged
        .file
        .persist(target)
        .map_err(|e| ReplaceError::Persist {
            target: target.to_path_buf(),
            source: e.error,
        })?;

    if original != target {
        match fs::remove_file(original) {
            Ok(()) => {}
            // Already gone; nothing stale is left behind.
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(ReplaceError::RemoveOriginal {
                    original: original.to_path_buf(),
                    target: target.to_path_buf(),
                    source,
                })
            }
        }
    }

    Ok(())
}

/// Path for `source` re-encoded with `extension`, in the same directory.
pub fn with_output_extension(source: &Path, extension: &str) -> PathBuf {
    source.with_extension(extension)
}
