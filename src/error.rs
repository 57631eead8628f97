//! # Error Types Module
//!
//! Defines the error taxonomy for a batch run.
//!
//! ## Categories:
//! - `UnsupportedPlatform`: OS is neither Windows nor Linux (fatal, pre-run)
//! - `MissingSource`: source path does not exist (fatal, pre-run)
//! - `DestinationUncreatable`: destination head directory missing and could
//!   not be created (fatal, pre-run)
//! - `ConflictingOptions`: invalid command line combination (fatal, pre-run)
//! - `ToolInvocation`: external transcode tool exited non-zero (per-file,
//!   recorded in the failure ledger, never aborts the batch)
//! - `Io`: wrapped filesystem errors
//!
//! Fatal variants surface before any per-file work and turn into a nonzero
//! process exit. Per-file skips (ineligible extension, output already
//! present) are dispatch outcomes, not errors.

use std::path::PathBuf;

/// Custom error types for transcoding and relocation
#[derive(thiserror::Error, Debug)]
pub enum TranscodeError {
    #[error("unsupported OS '{0}'")]
    UnsupportedPlatform(String),

    #[error("no such source directory/file to copy from: '{}'", .0.display())]
    MissingSource(PathBuf),

    #[error("no such target directory: '{}'", .path.display())]
    DestinationUncreatable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("conflicting options: {0}")]
    ConflictingOptions(String),

    #[error("transcode tool '{tool}' failed with {status}")]
    ToolInvocation {
        tool: String,
        status: std::process::ExitStatus,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
