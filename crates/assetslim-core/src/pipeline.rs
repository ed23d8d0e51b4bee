//! The batch driver: discover, then decode, decide, resize, encode and
//! replace each asset in turn, then re-measure the directory.
//!
//! Files are processed strictly one after another. A file that cannot be
//! decoded, resized or encoded is logged and left on disk unchanged; any
//! other failure aborts the run.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{ConfigError, OptimizerConfig};
use crate::decode::{decode_image, resize_composite};
use crate::discovery::{base_name, discover_inputs, discover_outputs, total_size};
use crate::encode::encoder_for;
use crate::error::{OptimizeError, Stage};
use crate::policy::{compute_target_size, decide_format, OutputFormat};
use crate::replace::{self, with_output_extension};
use crate::report::RunReport;

/// Outcome of one successfully replaced asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub source: PathBuf,
    /// Final path; differs from `source` when the extension changed.
    pub output: PathBuf,
    pub format: OutputFormat,
    pub original_dimensions: (u32, u32),
    pub final_dimensions: (u32, u32),
    pub original_bytes: u64,
    pub final_bytes: u64,
}

/// Runs the optimization pipeline with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Optimize every input in `dir` and report the size change.
    ///
    /// # Errors
    ///
    /// Returns `OptimizeError::DirectoryUnreadable` before touching any file
    /// if `dir` cannot be listed, and any non-recoverable per-file error as
    /// soon as it happens.
    pub fn run(&self, dir: &Path) -> Result<RunReport, OptimizeError> {
        run_with(dir, |path| self.process_file(path))
    }

    /// Re-encode a single asset in place.
    pub fn process_file(&self, path: &Path) -> Result<ProcessedFile, OptimizeError> {
        let bytes = fs::read(path).map_err(|source| OptimizeError::Io {
            path: path.to_path_buf(),
            stage: Stage::Read,
            source,
        })?;
        let original_bytes = bytes.len() as u64;

        let image = decode_image(&bytes).map_err(|source| OptimizeError::UnreadableImage {
            path: path.to_path_buf(),
            source,
        })?;
        drop(bytes);

        let original_dimensions = (image.width, image.height);
        let format = decide_format(&base_name(path), image.has_alpha(), &self.config.force_lossy);
        let (width, height) =
            compute_target_size(image.width, image.height, self.config.max_long_edge);
        debug!(
            path = %path.display(),
            has_alpha = image.has_alpha(),
            ?format,
            from = ?original_dimensions,
            to = ?(width, height),
            "planned"
        );

        let raster = resize_composite(
            image,
            width,
            height,
            format.retains_alpha(),
            self.config.filter,
        )
        .map_err(|source| OptimizeError::Transform {
            path: path.to_path_buf(),
            source,
        })?;

        let quality = self.config.quality_for(format);
        let encode_failure = |source| OptimizeError::EncodeFailure {
            path: path.to_path_buf(),
            source,
        };
        let encoded = encoder_for(format)
            .encode(&raster, quality)
            .map_err(encode_failure)?;
        let final_dimensions = (raster.width, raster.height);
        drop(raster);

        let output = match format {
            OutputFormat::Lossless => path.to_path_buf(),
            OutputFormat::Lossy => with_output_extension(path, format.extension()),
        };
        let staged = replace::stage(parent_dir(path), &encoded).map_err(encode_failure)?;
        let final_bytes = staged.len();
        replace::commit(staged, path, &output).map_err(|source| {
            OptimizeError::ReplaceFailure {
                path: path.to_path_buf(),
                source,
            }
        })?;

        match format {
            OutputFormat::Lossy => info!(
                "Converted {} -> {} ({:.2}% size target)",
                file_name(path),
                file_name(&output),
                quality * 100.0
            ),
            OutputFormat::Lossless => info!("Re-encoded {} (kept alpha)", file_name(path)),
        }

        Ok(ProcessedFile {
            source: path.to_path_buf(),
            output,
            format,
            original_dimensions,
            final_dimensions,
            original_bytes,
            final_bytes,
        })
    }
}

/// Drive `process` over the inputs of `dir`, skipping recoverable failures.
fn run_with<F>(dir: &Path, mut process: F) -> Result<RunReport, OptimizeError>
where
    F: FnMut(&Path) -> Result<ProcessedFile, OptimizeError>,
{
    let inputs = discover_inputs(dir)?;
    let before_bytes = total_size(&inputs)?;
    info!(dir = %dir.display(), inputs = inputs.len(), "optimizing assets");

    let mut report = RunReport {
        considered: inputs.len(),
        before_bytes,
        ..RunReport::default()
    };

    for path in &inputs {
        match process(path) {
            Ok(_) => report.optimized += 1,
            Err(err) if err.is_recoverable() => {
                warn!("{err}");
                report.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    report.after_bytes = total_size(&discover_outputs(dir)?)?;
    debug!(?report, "run finished");
    Ok(report)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
