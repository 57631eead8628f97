//! # Relocation Engine Module
//!
//! Per-file move/copy decisions and execution.
//!
//! ## Classification:
//! - **Move**: files of the active target-format family, i.e. freshly
//!   transcoded outputs or pre-existing files of that format. Move is
//!   reserved for files the run may take destructively.
//! - **Copy**: companion files (playlists, album art, text metadata,
//!   checksum sidecars) relocated without disturbing the source. mpc
//!   lives in this list so it is always copied, never moved.
//! - **Ignore**: everything else; no filesystem touch, no stats impact.
//!
//! Per-file I/O failures are logged with the destination path and never
//! abort the batch.

use crate::registry::TargetFormat;
use crate::stats::{format_size, RunStats};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{error, info};

/// Non-audio files relocated alongside the transcoded audio
const COMPANION_EXTENSIONS: &[&str] = &[
    "mpc", "jpg", "jpeg", "png", "pls", "rtf", "txt", "accurip",
];

/// What relocation does with one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocateAction {
    Move,
    Copy,
    Ignore,
}

/// Moves transcoded audio and copies companion files into the mirrored
/// destination
pub struct RelocationEngine {
    format: TargetFormat,
}

impl RelocationEngine {
    pub fn new(format: TargetFormat) -> Self {
        Self { format }
    }

    /// Decide move/copy/ignore from the file's extension.
    pub fn classify(&self, file: &Path) -> RelocateAction {
        let extension = file
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if extension == self.format.key() {
            RelocateAction::Move
        } else if COMPANION_EXTENSIONS.contains(&extension.as_str()) {
            RelocateAction::Copy
        } else {
            RelocateAction::Ignore
        }
    }

    /// Carry out a classified action against the destination directory.
    pub fn execute(
        &self,
        action: RelocateAction,
        file: &Path,
        destination_dir: &Path,
        stats: &mut RunStats,
    ) {
        match action {
            RelocateAction::Move => move_file(file, destination_dir, stats),
            RelocateAction::Copy => copy_file(file, destination_dir, stats),
            RelocateAction::Ignore => {}
        }
    }

    /// Classify and execute in one step.
    pub fn relocate(&self, file: &Path, destination_dir: &Path, stats: &mut RunStats) {
        self.execute(self.classify(file), file, destination_dir, stats);
    }
}

fn move_file(file: &Path, destination_dir: &Path, stats: &mut RunStats) {
    let Some(destination) = destination_path(file, destination_dir) else {
        return;
    };
    let size = match fs::metadata(file) {
        Ok(metadata) => metadata.len(),
        Err(error) => {
            error!("Error reading '{}': {}", file.display(), error);
            return;
        }
    };

    info!(
        "Moving '{}' ({}) -> '{}'",
        file.display(),
        format_size(size),
        destination_dir.display()
    );

    match rename_or_copy(file, &destination) {
        Ok(()) => {
            stats.record_move(size);
            log_spacer(stats.files_processed, file, size, "move");
        }
        Err(error) => {
            error!(
                "Error moving file '{}' -> '{}': {}",
                file.display(),
                destination_dir.display(),
                error
            );
        }
    }
}

fn copy_file(file: &Path, destination_dir: &Path, stats: &mut RunStats) {
    let Some(destination) = destination_path(file, destination_dir) else {
        return;
    };
    let size = match fs::metadata(file) {
        Ok(metadata) => metadata.len(),
        Err(error) => {
            error!("Error reading '{}': {}", file.display(), error);
            return;
        }
    };

    info!(
        "Copying '{}' ({}) -> '{}'",
        file.display(),
        format_size(size),
        destination_dir.display()
    );

    match fs::copy(file, &destination) {
        Ok(_) => {
            stats.record_copy(size);
            log_spacer(stats.files_processed, file, size, "copy");
        }
        Err(error) => {
            error!(
                "Error copying file '{}' to '{}': {}",
                file.display(),
                destination_dir.display(),
                error
            );
        }
    }
}

fn destination_path(file: &Path, destination_dir: &Path) -> Option<std::path::PathBuf> {
    Some(destination_dir.join(file.file_name()?))
}

// rename cannot cross filesystems; a move degrades to copy plus delete
// of the source
fn rename_or_copy(file: &Path, destination: &Path) -> io::Result<()> {
    if fs::rename(file, destination).is_ok() {
        return Ok(());
    }

    fs::copy(file, destination)?;
    fs::remove_file(file)
}

fn log_spacer(count: u64, file: &Path, size: u64, operation: &str) {
    info!(
        "[File {:>4}][{:>8}] '{}' {} complete",
        count,
        format_size(size),
        file.display(),
        operation
    );
}
