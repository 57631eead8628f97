//! # Platform Support Module
//!
//! Detection of the two supported operating system families, plus the
//! probe used to decide whether a transcode tool is actually reachable
//! before spawning it.
//!
//! Tool resolution is deliberately asymmetric: the Linux tables carry
//! absolute paths, the Windows tables carry bare `.exe` names that are
//! found through `PATH`. The probe honors both without forcing either
//! strategy on the other family.

use crate::error::TranscodeError;
use std::path::Path;

/// Operating system families this tool supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
}

impl Platform {
    /// Identify the running OS, refusing anything outside the two
    /// supported families.
    pub fn detect() -> Result<Self, TranscodeError> {
        match std::env::consts::OS {
            "windows" => Ok(Self::Windows),
            "linux" => Ok(Self::Linux),
            other => Err(TranscodeError::UnsupportedPlatform(other.to_string())),
        }
    }
}

/// Check whether a transcode tool is reachable: absolute paths are probed
/// directly, bare names are searched on `PATH`.
pub fn tool_exists(tool: &Path) -> bool {
    if tool.is_absolute() {
        return tool.is_file();
    }

    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| dir.join(tool).is_file())
}
