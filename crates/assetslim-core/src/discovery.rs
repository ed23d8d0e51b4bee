//! Listing assets in the drawable directory and measuring them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::{OptimizeError, Stage};

/// Extension of files picked up as inputs.
pub const INPUT_EXTENSIONS: &[&str] = &["png"];
/// Extensions counted as optimized outputs when re-measuring the directory.
pub const OUTPUT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Inputs in `dir`, sorted by path.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, OptimizeError> {
    list_matching(dir, INPUT_EXTENSIONS)
}

/// Files in `dir` that count towards the "after" total.
pub fn discover_outputs(dir: &Path) -> Result<Vec<PathBuf>, OptimizeError> {
    list_matching(dir, OUTPUT_EXTENSIONS)
}

/// Regular files directly inside `dir` whose extension matches one of
/// `extensions`, compared case-insensitively. Subdirectories are not entered.
///
/// An entry that cannot be inspected, such as a dangling symlink, is logged
/// and left out; only a failure to list `dir` itself is an error.
pub fn list_matching(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, OptimizeError> {
    let unreadable = |source: io::Error| OptimizeError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let meta = fs::metadata(dir).map_err(unreadable)?;
    if !meta.is_dir() {
        return Err(unreadable(io::Error::other("not a directory")));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() > 0 => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                warn!(path = %path.display(), "skipping unreadable entry: {err}");
                continue;
            }
            Err(err) => return Err(unreadable(err.into())),
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Case-insensitive extension match.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
}

/// File name without its final extension.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Combined size in bytes of `paths`.
pub fn total_size(paths: &[PathBuf]) -> Result<u64, OptimizeError> {
    let mut total = 0u64;
    for path in paths {
        total += file_size(path)?;
    }
    Ok(total)
}

pub(crate) fn file_size(path: &Path) -> Result<u64, OptimizeError> {
    fs::metadata(path)
        .map(|meta| meta.len())
        .map_err(|source| OptimizeError::Io {
            path: path.to_path_buf(),
            stage: Stage::Measure,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str, len: usize) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, vec![0u8; len]).unwrap();
        path
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_inputs_filtered_and_sorted() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "zeta.png", 1);
        touch(dir.path(), "alpha.PNG", 1);
        touch(dir.path(), "mid.png", 1);
        touch(dir.path(), "photo.jpg", 1);
        touch(dir.path(), "notes.txt", 1);
        touch(dir.path(), ".assetslim-abc123.tmp", 1);

        let inputs = discover_inputs(dir.path()).unwrap();
        assert_eq!(names(&inputs), vec!["alpha.PNG", "mid.png", "zeta.png"]);
    }

    #[test]
    fn test_subdirectories_are_not_entered() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "top.png", 1);
        let nested = dir.path().join("nested.png");
        fs::create_dir(&nested).unwrap();
        touch(&nested, "inner.png", 1);

        let inputs = discover_inputs(dir.path()).unwrap();
        assert_eq!(names(&inputs), vec!["top.png"]);
    }

    #[test]
    fn test_outputs_include_all_formats() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.png", 1);
        touch(dir.path(), "b.jpg", 1);
        touch(dir.path(), "c.JPEG", 1);
        touch(dir.path(), "d.webp", 1);

        let outputs = discover_outputs(dir.path()).unwrap();
        assert_eq!(names(&outputs), vec!["a.png", "b.jpg", "c.JPEG"]);
    }

    #[test]
    fn test_missing_directory_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let result = discover_inputs(&dir.path().join("missing"));
        assert!(matches!(
            result,
            Err(OptimizeError::DirectoryUnreadable { .. })
        ));
    }

    #[test]
    fn test_file_path_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "a.png", 1);
        assert!(matches!(
            discover_inputs(&file),
            Err(OptimizeError::DirectoryUnreadable { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "real.png", 5);
        std::os::unix::fs::symlink(dir.path().join("gone.png"), dir.path().join("ghost.png"))
            .unwrap();

        let inputs = discover_inputs(dir.path()).unwrap();
        assert_eq!(names(&inputs), vec!["real.png"]);
        assert_eq!(total_size(&inputs).unwrap(), 5);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_asset_is_followed() {
        let dir = TempDir::new().unwrap();
        let target = touch(dir.path(), "real.bin", 3);
        std::os::unix::fs::symlink(&target, dir.path().join("alias.png")).unwrap();

        let inputs = discover_inputs(dir.path()).unwrap();
        assert_eq!(names(&inputs), vec!["alias.png"]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(discover_inputs(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_total_size() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.png", 100);
        let b = touch(dir.path(), "b.png", 23);

        assert_eq!(total_size(&[a, b]).unwrap(), 123);
        assert_eq!(total_size(&[]).unwrap(), 0);
    }

    #[test]
    fn test_total_size_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = total_size(&[dir.path().join("gone.png")]);
        assert!(matches!(
            result,
            Err(OptimizeError::Io {
                stage: Stage::Measure,
                ..
            })
        ));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("res/cups02.png")), "cups02");
        assert_eq!(base_name(Path::new("a.b.png")), "a.b");
        assert_eq!(base_name(Path::new("plain")), "plain");
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("x.PnG"), &["png"]));
        assert!(!has_extension(Path::new("x.png.bak"), &["png"]));
        assert!(!has_extension(Path::new("png"), &["png"]));
    }
}
