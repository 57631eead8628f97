//! # Transcode Mover - Main Entry Point
//!
//! ## Responsibilities:
//! - Command line parsing with `clap`
//! - Platform check and logging initialization with `tracing`
//! - Fatal precondition validation (exactly one action, no conflicting
//!   options, source exists)
//! - Handing the run to `BatchCoordinator` and printing the summary
//!
//! Exactly one of `--encode-to`, `--decode-from` or `--move-format` must
//! be given. The checks are performed after parsing so every fatal
//! precondition exits with code 1; per-file failures inside a run never
//! change the exit code.
//!
//! ## Example:
//! ```bash
//! transcode-mover --source /music --target /mnt/phone --encode-to opus -p
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use transcode_mover::{
    logging, BatchCoordinator, Config, Operation, Platform, TargetFormat, TranscodeError,
};

#[derive(Parser)]
#[command(name = "transcode-mover")]
#[command(
    about = "Transcode audio files and move them, with their companion assets, \
             into a destination tree mirroring the source"
)]
struct Args {
    /// Source file, or directory to recurse, holding the files to
    /// transcode and/or relocate
    #[arg(short, long)]
    source: PathBuf,

    /// Destination directory transcoded files are moved (and companion
    /// files copied) to; defaults to the source itself
    #[arg(short, long)]
    target: Option<PathBuf>,

    /// Show the percentage of eligible files completed (file count, not
    /// data volume)
    #[arg(short, long)]
    percentage_completion: bool,

    /// Encode the source into this format
    #[arg(short, long, value_name = "FORMAT")]
    encode_to: Option<TargetFormat>,

    /// Decode sources of this encoded format
    #[arg(short, long, value_name = "FORMAT")]
    decode_from: Option<TargetFormat>,

    /// Relocate files of this format without transcoding
    #[arg(short, long, value_name = "FORMAT")]
    move_format: Option<TargetFormat>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let platform = Platform::detect()?;
    logging::init(args.verbose);

    let config = build_config(args)?;
    config.validate()?;
    debug!(
        "Effective configuration: {}",
        serde_json::to_string(&config)?
    );

    let mut coordinator = BatchCoordinator::new(config, platform);
    let result = coordinator.run();

    // the summary still covers whatever happened before an abort
    coordinator.print_summary();
    result?;

    Ok(())
}

fn build_config(args: Args) -> Result<Config, TranscodeError> {
    let (operation, format) = match (args.encode_to, args.decode_from, args.move_format) {
        (Some(format), None, None) => (Some(Operation::Encode), format),
        (None, Some(format), None) => (Some(Operation::Decode), format),
        (None, None, Some(format)) => (None, format),
        (None, None, None) => {
            return Err(TranscodeError::ConflictingOptions(
                "you need to specify one of the options: \
                 --encode-to/--decode-from/--move-format, and its value"
                    .to_string(),
            ));
        }
        _ => {
            return Err(TranscodeError::ConflictingOptions(
                "--encode-to, --decode-from and --move-format are mutually exclusive".to_string(),
            ));
        }
    };

    let destination = match args.target {
        Some(target) => target,
        None => Config::default_destination(&args.source),
    };

    Ok(Config {
        source: args.source,
        destination,
        operation,
        format,
        show_percentage: args.percentage_completion,
    })
}
