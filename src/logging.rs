//! # Logging Setup Module
//!
//! Installs the global `tracing` subscriber: an ANSI stderr layer for the
//! console and a plain-text layer writing a timestamped log file under
//! the platform's local data directory. A log directory that cannot be
//! created degrades to stderr-only logging with a warning; it never
//! aborts the run.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

/// Initialize logging. Returns the log file path when one could be
/// opened.
pub fn init(verbose: bool) -> Option<PathBuf> {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let stderr_layer = fmt::layer().with_target(false).with_filter(level);

    let log_path = match open_log_file() {
        Some((path, file)) => {
            let file_layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(level);
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .init();
            eprintln!("Check logging results at '{}'\n", path.display());
            Some(path)
        }
        None => {
            tracing_subscriber::registry().with(stderr_layer).init();
            None
        }
    };

    info!(
        "Log beginning at {} with PID {}, started with arguments {:?}",
        chrono::Local::now().format("%d %b %Y (%a) %I:%M:%S %p %Z"),
        std::process::id(),
        std::env::args().collect::<Vec<_>>()
    );

    log_path
}

fn open_log_file() -> Option<(PathBuf, File)> {
    let log_dir = dirs::data_local_dir()?
        .join("transcode-mover")
        .join("logs");

    if let Err(error) = std::fs::create_dir_all(&log_dir) {
        eprintln!(
            "No permission to write log files at '{}': {}",
            log_dir.display(),
            error
        );
        return None;
    }

    let file_name = format!(
        "transcode-mover-{}.log",
        chrono::Local::now().format("%Y%m%d%H%M%S")
    );
    let path = log_dir.join(file_name);

    match File::create(&path) {
        Ok(file) => Some((path, file)),
        Err(error) => {
            eprintln!("Could not open log file '{}': {}", path.display(), error);
            None
        }
    }
}
