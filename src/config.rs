//! # Configuration Module
//!
//! The run configuration assembled from the command line.
//!
//! ## Parameters:
//! - `source`: file or directory to transcode and/or relocate
//! - `destination`: directory the mirrored tree is rooted under; defaults
//!   to the source itself (in-place mode)
//! - `operation`: `Encode`/`Decode`, or `None` for move-only runs
//! - `format`: the target format the run revolves around
//! - `show_percentage`: drive the counting pre-pass and percentage lines
//!
//! ## Validation:
//! - percentage reporting cannot be combined with move-only runs
//! - the source path must exist
//!
//! Both violations are fatal preconditions; nothing per-file has happened
//! yet when they fire.

use crate::error::TranscodeError;
use crate::registry::{Operation, TargetFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Configuration for one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source file or directory
    pub source: PathBuf,
    /// Destination root for relocated files
    pub destination: PathBuf,
    /// Transcode direction; None means relocate without transcoding
    pub operation: Option<Operation>,
    /// Target format key for tool lookup and move classification
    pub format: TargetFormat,
    /// Report percentage completion during the transcode pass
    pub show_percentage: bool,
}

impl Config {
    /// Validate fatal preconditions before any per-file work.
    pub fn validate(&self) -> Result<(), TranscodeError> {
        if self.show_percentage && self.operation.is_none() {
            return Err(TranscodeError::ConflictingOptions(
                "'--percentage-completion' cannot be applied with option '--move-format'"
                    .to_string(),
            ));
        }

        if !self.source.exists() {
            return Err(TranscodeError::MissingSource(self.source.clone()));
        }

        Ok(())
    }

    /// Destination when none was given: the source directory itself for
    /// directory input, the containing directory for file input.
    pub fn default_destination(source: &Path) -> PathBuf {
        let destination = if source.is_dir() {
            source.to_path_buf()
        } else {
            source.parent().unwrap_or(Path::new(".")).to_path_buf()
        };

        warn!(
            "Destination not specified; defaulting to the source '{}' itself",
            destination.display()
        );

        destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn base_config(source: PathBuf) -> Config {
        Config {
            destination: source.clone(),
            source,
            operation: Some(Operation::Encode),
            format: TargetFormat::Opus,
            show_percentage: false,
        }
    }

    #[test]
    fn valid_config_passes() {
        let temp_dir = TempDir::new().unwrap();
        let config = base_config(temp_dir.path().to_path_buf());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn percentage_conflicts_with_move_only() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = base_config(temp_dir.path().to_path_buf());
        config.operation = None;
        config.show_percentage = true;

        assert!(matches!(
            config.validate(),
            Err(TranscodeError::ConflictingOptions(_))
        ));
    }

    #[test]
    fn missing_source_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = base_config(temp_dir.path().to_path_buf());
        config.source = temp_dir.path().join("gone");

        assert!(matches!(
            config.validate(),
            Err(TranscodeError::MissingSource(_))
        ));
    }

    #[test]
    fn default_destination_follows_input_shape() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(
            Config::default_destination(temp_dir.path()),
            temp_dir.path()
        );

        let file = temp_dir.path().join("track.wav");
        File::create(&file).unwrap();
        assert_eq!(Config::default_destination(&file), temp_dir.path());
    }
}
