//! # Transcode Mover Library
//!
//! Batch-processes a directory tree of audio files: optionally invokes an
//! external encoder/decoder per file, then relocates the results, along
//! with sibling companion assets, into a destination tree mirroring the
//! source hierarchy.
//!
//! ## Module architecture:
//! - `config`: run configuration and fatal precondition validation
//! - `error`: error taxonomy
//! - `platform`: supported-OS detection and tool reachability
//! - `registry`: format/tool/extension lookup tables
//! - `batch`: the core engine (coordinator, dispatcher, relocator, planner)
//! - `stats`: run counters, failure ledger, summary formatting
//! - `progress`: visual progress feedback
//! - `logging`: tracing subscriber setup (stderr plus log file)
//! - `notify`: desktop notification collaborator
//!
//! ## Usage:
//! ```no_run
//! use transcode_mover::{BatchCoordinator, Config, Operation, Platform, TargetFormat};
//!
//! # fn run() -> anyhow::Result<()> {
//! let platform = Platform::detect()?;
//! let config = Config {
//!     source: "/music".into(),
//!     destination: "/out".into(),
//!     operation: Some(Operation::Encode),
//!     format: TargetFormat::Opus,
//!     show_percentage: false,
//! };
//! config.validate()?;
//!
//! let mut coordinator = BatchCoordinator::new(config, platform);
//! coordinator.run()?;
//! coordinator.print_summary();
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod platform;
pub mod progress;
pub mod registry;
pub mod stats;

pub use batch::{BatchCoordinator, RelocateAction, RelocationEngine, TranscodeDispatcher, TranscodeOutcome};
pub use config::Config;
pub use error::TranscodeError;
pub use platform::Platform;
pub use registry::{FormatRegistry, Operation, TargetFormat, ToolSpec};
pub use stats::{FailureLedger, RunStats};
