//! # Path Planning Module
//!
//! Computes where a source file lands under the destination root. The
//! destination tree mirrors the source tree, rooted at
//! `destination/basename(source root)`; in-place runs bypass planning
//! entirely.

use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Head directory everything mirrors under. Identical roots mean
/// in-place mode and come back unchanged.
pub fn head_directory(source_root: &Path, destination_root: &Path) -> PathBuf {
    if source_root == destination_root {
        return destination_root.to_path_buf();
    }

    match source_root.file_name() {
        Some(name) => destination_root.join(name),
        None => destination_root.to_path_buf(),
    }
}

/// Mirror a walked directory under the destination head: strip the
/// source-root prefix and re-root the remainder. A file directly under
/// the root maps to the head itself.
pub fn plan_destination_dir(
    source_root: &Path,
    source_file_dir: &Path,
    destination_head: &Path,
) -> PathBuf {
    let relative = source_file_dir
        .strip_prefix(source_root)
        .unwrap_or(Path::new(""));
    destination_head.join(relative)
}

/// Idempotent directory creation: an existing directory is a no-op
/// success, only an actual creation is logged.
pub fn create_directory(path: &Path) -> io::Result<()> {
    if path.exists() {
        return Ok(());
    }

    std::fs::create_dir_all(path)?;
    info!("Created directory '{}'", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn nested_directory_is_mirrored() {
        let planned = plan_destination_dir(
            Path::new("/music"),
            Path::new("/music/Album/CD1"),
            Path::new("/out/music"),
        );
        assert_eq!(planned, Path::new("/out/music/Album/CD1"));
    }

    #[test]
    fn root_level_file_lands_in_the_head_itself() {
        let planned = plan_destination_dir(
            Path::new("/music"),
            Path::new("/music"),
            Path::new("/out/music"),
        );
        assert_eq!(planned, Path::new("/out/music"));
    }

    #[test]
    fn head_is_destination_plus_source_basename() {
        assert_eq!(
            head_directory(Path::new("/music"), Path::new("/out")),
            Path::new("/out/music")
        );
        // identical roots: in-place, nothing re-rooted
        assert_eq!(
            head_directory(Path::new("/music"), Path::new("/music")),
            Path::new("/music")
        );
    }

    #[test]
    fn create_directory_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a").join("b");

        create_directory(&target).unwrap();
        assert!(target.is_dir());
        // second call on an existing directory is a no-op success
        create_directory(&target).unwrap();
        assert!(target.is_dir());
    }
}
