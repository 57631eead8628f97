//! # Batch Coordinator Module
//!
//! Drives a whole run across the dispatcher, path planner and relocation
//! engine.
//!
//! ## Directory runs:
//! 1. Verify or create the destination head directory (fatal on failure)
//! 2. Optional counting pre-pass: the dispatcher in progress-only mode,
//!    retaining nothing but the eligible headcount
//! 3. Transcode pass over the same tree (skipped for move-only runs)
//! 4. Relocation pass plus empty-directory cleanup, both skipped entirely
//!    when source and destination coincide (in-place mode)
//!
//! ## Single-file runs:
//! One dispatch, one relocation, no counting, no cleanup. The relocation
//! follows the transcoded output when one was produced.
//!
//! Individual file failures never abort a run; only the missing or
//! uncreatable destination head does, before any per-file work.

use crate::batch::dispatcher::{TranscodeDispatcher, TranscodeOutcome};
use crate::batch::path_planner;
use crate::batch::relocator::{RelocateAction, RelocationEngine};
use crate::config::Config;
use crate::error::TranscodeError;
use crate::platform::Platform;
use crate::progress::TranscodeProgress;
use crate::stats::{self, FailureLedger, RunStats};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};
use walkdir::WalkDir;

/// Orchestrates one batch run
pub struct BatchCoordinator {
    config: Config,
    dispatcher: Option<TranscodeDispatcher>,
    engine: RelocationEngine,
    stats: RunStats,
    ledger: FailureLedger,
    relocation_ran: bool,
}

impl BatchCoordinator {
    pub fn new(config: Config, platform: Platform) -> Self {
        let dispatcher = config
            .operation
            .map(|operation| TranscodeDispatcher::new(platform, operation, config.format));
        let engine = RelocationEngine::new(config.format);

        Self {
            dispatcher,
            engine,
            config,
            stats: RunStats::new(),
            ledger: FailureLedger::new(),
            relocation_ran: false,
        }
    }

    /// Run to completion. The returned error is always a fatal
    /// precondition; per-file trouble lands in the log and the ledger.
    pub fn run(&mut self) -> Result<(), TranscodeError> {
        if self.config.source.is_dir() {
            self.run_directory()
        } else {
            self.run_single_file()
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn ledger(&self) -> &FailureLedger {
        &self.ledger
    }

    /// End-of-run summary: ledger, transcode totals, relocation totals.
    pub fn print_summary(&self) {
        stats::print_summary(
            &self.stats,
            &self.ledger,
            self.dispatcher.is_some(),
            self.relocation_ran,
        );
    }

    fn run_directory(&mut self) -> Result<(), TranscodeError> {
        let head = path_planner::head_directory(&self.config.source, &self.config.destination);
        self.ensure_destination(&head)?;

        if self.config.show_percentage {
            self.counting_pass();
        }

        self.transcode_pass();

        // Nothing to relocate when the tree already is its own destination
        if self.config.source != head {
            self.relocate_pass(&head);
            let original_destination = self.config.destination.clone();
            self.cleanup(&original_destination);
        }

        Ok(())
    }

    fn run_single_file(&mut self) -> Result<(), TranscodeError> {
        let destination = self.config.destination.clone();
        self.ensure_destination(&destination)?;

        let mut file = self.config.source.clone();
        if let Some(dispatcher) = self.dispatcher.as_mut() {
            match dispatcher.dispatch(&file, false, &mut self.stats, &mut self.ledger) {
                TranscodeOutcome::Transcoded(output)
                | TranscodeOutcome::SkippedExisting(output) => {
                    // relocate the transcoded file, fresh or from before
                    if output.exists() {
                        file = output;
                    }
                }
                _ => {}
            }
        }

        if file.parent() == Some(destination.as_path()) {
            info!(
                "Source and destination coincide; leaving '{}' in place",
                file.display()
            );
            return Ok(());
        }

        info!(
            "Relocating '{}' to the destination '{}'...",
            file.display(),
            destination.display()
        );
        self.relocation_ran = true;

        let started = Instant::now();
        self.engine.relocate(&file, &destination, &mut self.stats);
        self.stats.relocate_elapsed += started.elapsed();

        Ok(())
    }

    fn ensure_destination(&self, head: &Path) -> Result<(), TranscodeError> {
        path_planner::create_directory(head).map_err(|source| {
            error!("No such target directory '{}'. Aborting.", head.display());
            TranscodeError::DestinationUncreatable {
                path: head.to_path_buf(),
                source,
            }
        })
    }

    /// Walk the tree once with the dispatcher in progress-only mode. All
    /// per-file results are discarded; only the eligible headcount
    /// survives.
    fn counting_pass(&mut self) {
        let Some(dispatcher) = self.dispatcher.as_mut() else {
            return;
        };

        let spinner = TranscodeProgress::counting();
        for file in walk_files(&self.config.source) {
            dispatcher.dispatch(&file, true, &mut self.stats, &mut self.ledger);
        }
        spinner.finish(&format!(
            "{} files eligible for transcoding",
            self.stats.eligible_count
        ));
    }

    fn transcode_pass(&mut self) {
        let Some(dispatcher) = self.dispatcher.as_mut() else {
            return;
        };

        info!(
            "Commencing transcoding by recursing into source path '{}'...",
            self.config.source.display()
        );

        let bar = (self.config.show_percentage && self.stats.eligible_count > 0)
            .then(|| TranscodeProgress::queue(self.stats.eligible_count));

        for file in walk_files(&self.config.source) {
            let outcome = dispatcher.dispatch(&file, false, &mut self.stats, &mut self.ledger);
            if let (Some(bar), TranscodeOutcome::Transcoded(_)) = (bar.as_ref(), &outcome) {
                bar.advance(&file.file_name().unwrap_or_default().to_string_lossy());
            }
        }

        if let Some(bar) = bar {
            bar.finish("transcode pass complete");
        }
    }

    fn relocate_pass(&mut self, head: &Path) {
        info!(
            "Relocating transcoded files to the destination '{}'...",
            head.display()
        );
        self.relocation_ran = true;

        for file in walk_files(&self.config.source) {
            let action = self.engine.classify(&file);
            if action == RelocateAction::Ignore {
                continue;
            }

            let started = Instant::now();
            let file_dir = file.parent().unwrap_or(Path::new(""));
            let destination_dir =
                path_planner::plan_destination_dir(&self.config.source, file_dir, head);

            if let Err(error) = path_planner::create_directory(&destination_dir) {
                error!(
                    "Error creating target directory path '{}': {}",
                    destination_dir.display(),
                    error
                );
            }

            self.engine
                .execute(action, &file, &destination_dir, &mut self.stats);
            self.stats.relocate_elapsed += started.elapsed();
        }
    }

    /// Prune directories the move pass emptied out. A directory still
    /// holding copied companions refuses removal; that is expected and
    /// stays silent.
    fn cleanup(&self, destination: &Path) {
        info!(
            "Cleaning up '{}' by recursively deleting empty directories created to match the source path...",
            destination.display()
        );

        for entry in WalkDir::new(destination)
            .contents_first(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
        {
            if entry.file_type().is_dir() {
                let _ = std::fs::remove_dir(entry.path());
            }
        }

        info!("Done cleaning up '{}'", destination.display());
    }
}

fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
}
