//! # Format Registry Module
//!
//! Pure lookup tables mapping (platform, operation, target format) to the
//! external transcode tool, its fixed option template, the extensions it
//! accepts as input, and the extension it produces.
//!
//! ## Responsibilities:
//! - Closed `TargetFormat` and `Operation` enumerations so unsupported
//!   combinations are unrepresentable rather than runtime string typos
//! - Per-platform tool tables (absolute paths on Linux, bare `.exe` names
//!   on Windows)
//! - Valid-source and output-extension tables per format and operation
//!
//! No I/O happens here; resolution is a pure function of the three enums
//! and platform never changes mid-run.

use crate::platform::Platform;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Audio format a run encodes to, decodes from, or relocates
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Opus,
    Flac,
}

impl TargetFormat {
    /// Lower-case format key; doubles as the encoded-output extension.
    pub fn key(self) -> &'static str {
        match self {
            Self::Opus => "opus",
            Self::Flac => "flac",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Direction of the transcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Encode,
    Decode,
}

/// External program plus its fixed argument template. The argument order
/// on the final command line is a hard contract: tool, source, template,
/// output.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub tool: &'static str,
    pub args: &'static [&'static str],
}

// opusenc options; the opusdec side takes none worth forcing
const ENCODE_OPUS_ARGS: &[&str] = &[
    "--music",
    "--bitrate",
    "160",
    "--vbr",
    "--framesize",
    "20",
    "--comp",
    "10",
];
const DECODE_OPUS_ARGS: &[&str] = &[];

// --keep-foreign-metadata refuses to decode without foreign metadata, so
// the decode template leaves it out
const ENCODE_FLAC_ARGS: &[&str] = &[
    "--keep-foreign-metadata",
    "--replay-gain",
    "--mid-side",
    "--best",
    "--verify",
    "--output-name",
];
const DECODE_FLAC_ARGS: &[&str] = &["--decode", "--output-name"];

/// Resolved lookup tables for one (platform, operation) pair
#[derive(Debug, Clone, Copy)]
pub struct FormatRegistry {
    platform: Platform,
    operation: Operation,
}

impl FormatRegistry {
    /// Resolve the tables for a run. Platform and operation are fixed for
    /// the run's lifetime, so the result is immutable.
    pub fn resolve(platform: Platform, operation: Operation) -> Self {
        Self {
            platform,
            operation,
        }
    }

    /// The external tool and fixed options for a target format.
    pub fn tool_spec(&self, format: TargetFormat) -> ToolSpec {
        use Operation::*;
        use Platform::*;
        use TargetFormat::*;

        let (tool, args) = match (self.platform, self.operation, format) {
            (Windows, Encode, Opus) => ("opusenc.exe", ENCODE_OPUS_ARGS),
            (Windows, Decode, Opus) => ("opusdec.exe", DECODE_OPUS_ARGS),
            (Windows, Encode, Flac) => ("flac.exe", ENCODE_FLAC_ARGS),
            (Windows, Decode, Flac) => ("flac.exe", DECODE_FLAC_ARGS),
            (Linux, Encode, Opus) => ("/usr/bin/opusenc", ENCODE_OPUS_ARGS),
            (Linux, Decode, Opus) => ("/usr/bin/opusdec", DECODE_OPUS_ARGS),
            (Linux, Encode, Flac) => ("/usr/bin/flac", ENCODE_FLAC_ARGS),
            (Linux, Decode, Flac) => ("/usr/bin/flac", DECODE_FLAC_ARGS),
        };

        ToolSpec { tool, args }
    }

    /// Source extensions the tool accepts for this format and operation.
    /// Not every container can feed every encoder, hence the per-format
    /// allow lists.
    pub fn valid_sources(&self, format: TargetFormat) -> &'static [&'static str] {
        use Operation::*;
        use TargetFormat::*;

        match (self.operation, format) {
            (Encode, Opus) => &["wav", "aiff", "flac", "oga", "pcm"],
            (Encode, Flac) => &["wav", "aiff", "rf64", "w64"],
            (Decode, Opus) => &["opus"],
            (Decode, Flac) => &["flac"],
        }
    }

    /// Extension the transcoded output carries.
    pub fn output_extension(&self, format: TargetFormat) -> &'static str {
        match self.operation {
            Operation::Encode => format.key(),
            Operation::Decode => "wav",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_FORMATS: [TargetFormat; 2] = [TargetFormat::Opus, TargetFormat::Flac];
    const ALL_OPERATIONS: [Operation; 2] = [Operation::Encode, Operation::Decode];

    #[test]
    fn every_format_has_sources_and_a_distinct_output() {
        for operation in ALL_OPERATIONS {
            let registry = FormatRegistry::resolve(Platform::Linux, operation);
            for format in ALL_FORMATS {
                let sources = registry.valid_sources(format);
                let output = registry.output_extension(format);
                assert!(!sources.is_empty());
                // A no-op transcode (output fed back in as source) must be
                // impossible
                assert!(!sources.contains(&output));
            }
        }
    }

    #[test]
    fn linux_tools_are_absolute_windows_tools_are_bare() {
        for operation in ALL_OPERATIONS {
            for format in ALL_FORMATS {
                let linux = FormatRegistry::resolve(Platform::Linux, operation).tool_spec(format);
                assert!(linux.tool.starts_with("/usr/bin/"));

                let windows =
                    FormatRegistry::resolve(Platform::Windows, operation).tool_spec(format);
                assert!(!windows.tool.contains('/'));
                assert!(windows.tool.ends_with(".exe"));
            }
        }
    }

    #[test]
    fn encode_templates_match_the_tool_contracts() {
        let registry = FormatRegistry::resolve(Platform::Linux, Operation::Encode);

        let opus = registry.tool_spec(TargetFormat::Opus);
        assert_eq!(
            opus.args,
            [
                "--music",
                "--bitrate",
                "160",
                "--vbr",
                "--framesize",
                "20",
                "--comp",
                "10"
            ]
        );

        let flac = registry.tool_spec(TargetFormat::Flac);
        assert_eq!(flac.args.last(), Some(&"--output-name"));
        assert!(flac.args.contains(&"--verify"));
    }

    #[test]
    fn decode_always_lands_on_wav() {
        let registry = FormatRegistry::resolve(Platform::Linux, Operation::Decode);
        for format in ALL_FORMATS {
            assert_eq!(registry.output_extension(format), "wav");
        }
        assert_eq!(
            registry.tool_spec(TargetFormat::Flac).args,
            ["--decode", "--output-name"]
        );
    }
}
