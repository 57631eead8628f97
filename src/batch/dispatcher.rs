//! # Transcode Dispatcher Module
//!
//! Per-file transcode dispatch: decides whether a file is a candidate for
//! the requested target format, runs the external tool when it is, and
//! reports the outcome.
//!
//! ## Behavior:
//! - Eligibility by case-normalized extension against the registry's
//!   valid-source set; ineligible files short-circuit without any tool
//!   invocation
//! - Never overwrites: an already-present output path is a skip
//! - Progress-only mode performs the eligibility and existence checks,
//!   bumps the eligible headcount, and returns before any invocation
//! - Consecutive files sharing an extension reuse the previous resolution
//!   instead of re-querying the registry; a differing extension recomputes
//!   the whole entry
//! - After each eligible file of the real pass, the floor-rounded
//!   completion percentage is logged, switching to a closing line when
//!   the counters meet
//!
//! The external tool call blocks until the child exits and carries no
//! timeout; a hung codec hangs the batch. That is a documented limitation
//! of the execution model, not something papered over here.

use crate::error::TranscodeError;
use crate::notify;
use crate::platform::{self, Platform};
use crate::registry::{FormatRegistry, Operation, TargetFormat, ToolSpec};
use crate::stats::{FailureLedger, RunStats};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Fixed remediation hint recorded in the failure ledger. The raw tool
/// diagnostic goes to the log instead; the ledger stays format-agnostic.
const FAILURE_HINT: &str = "If the source is in wav format, transcode to flac. Else, if the \
     source is in flac, transcode to wav, and then back to flac. This is most likely an error \
     due to an incompatible PCM format, or due to the OS character set encoding.";

/// What dispatching one file amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodeOutcome {
    /// The tool ran and exited cleanly; the output path now exists
    Transcoded(PathBuf),
    /// The output path already existed, nothing was invoked
    SkippedExisting(PathBuf),
    /// The extension is not a valid source for this format and operation
    SkippedIneligible,
    /// Progress-only pass counted this file as eligible
    Counted,
    /// The configured tool binary is not reachable
    ToolMissing,
    /// The tool ran and failed; the ledger holds the remediation hint
    Failed,
}

/// Last-resolved lookup, reused while consecutive files share an
/// extension. Valid within a single run only; platform and operation
/// cannot change mid-run, so the extension is the only cache key.
struct ResolutionCache {
    extension: String,
    valid_source: bool,
    tool_exists: bool,
    tool: ToolSpec,
    output_extension: &'static str,
}

/// Dispatches one file at a time against the external transcode tool
pub struct TranscodeDispatcher {
    registry: FormatRegistry,
    format: TargetFormat,
    cache: Option<ResolutionCache>,
}

impl TranscodeDispatcher {
    pub fn new(platform: Platform, operation: Operation, format: TargetFormat) -> Self {
        Self {
            registry: FormatRegistry::resolve(platform, operation),
            format,
            cache: None,
        }
    }

    /// Process one source file. In progress-only mode this stops after
    /// the eligibility and existence checks and only maintains the
    /// headcount.
    pub fn dispatch(
        &mut self,
        source: &Path,
        progress_only: bool,
        stats: &mut RunStats,
        ledger: &mut FailureLedger,
    ) -> TranscodeOutcome {
        let extension = source
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let entry = self.resolve(&extension);
        let (valid_source, tool_exists, tool, output_extension) = (
            entry.valid_source,
            entry.tool_exists,
            entry.tool,
            entry.output_extension,
        );

        if !valid_source {
            return TranscodeOutcome::SkippedIneligible;
        }

        let output_path = source.with_extension(output_extension);

        if progress_only {
            if output_path.exists() {
                return TranscodeOutcome::SkippedExisting(output_path);
            }
            stats.eligible_count += 1;
            return TranscodeOutcome::Counted;
        }

        let outcome = if output_path.exists() {
            warn!(
                "Skipping '{}' as transcoded file '{}' already exists",
                source.display(),
                output_path.display()
            );
            TranscodeOutcome::SkippedExisting(output_path)
        } else if !tool_exists {
            error!(
                "No such transcode tool as '{}'. Is its path correct?",
                tool.tool
            );
            TranscodeOutcome::ToolMissing
        } else {
            self.invoke_tool(tool, source, &output_path, output_extension, stats, ledger)
        };

        report_percentage(stats);
        outcome
    }

    /// Reuse the cached resolution while the extension repeats; anything
    /// else rebuilds the whole entry.
    fn resolve(&mut self, extension: &str) -> &ResolutionCache {
        let entry = match self.cache.take() {
            Some(entry) if entry.extension == extension => entry,
            _ => self.compute_entry(extension),
        };
        self.cache.insert(entry)
    }

    fn compute_entry(&self, extension: &str) -> ResolutionCache {
        let valid_source = self.registry.valid_sources(self.format).contains(&extension);
        let tool = self.registry.tool_spec(self.format);
        let tool_exists = platform::tool_exists(Path::new(tool.tool));
        let output_extension = self.registry.output_extension(self.format);

        debug!(
            "Resolved '.{}': valid source {}, tool '{}' (present: {})",
            extension, valid_source, tool.tool, tool_exists
        );

        ResolutionCache {
            extension: extension.to_string(),
            valid_source,
            tool_exists,
            tool,
            output_extension,
        }
    }

    fn invoke_tool(
        &self,
        tool: ToolSpec,
        source: &Path,
        output_path: &Path,
        output_extension: &str,
        stats: &mut RunStats,
        ledger: &mut FailureLedger,
    ) -> TranscodeOutcome {
        info!(
            "Transcoding '{}' to '{}' format...",
            source.display(),
            capitalize(output_extension)
        );

        let started = Instant::now();
        match run_tool(tool, source, output_path) {
            Ok(stdout) => {
                stats.transcode_count += 1;
                stats.transcode_elapsed += started.elapsed();
                if !stdout.trim().is_empty() {
                    debug!("{}", stdout.trim_end());
                }
                TranscodeOutcome::Transcoded(output_path.to_path_buf())
            }
            Err(failure) => {
                error!("Error transcoding '{}': {}", source.display(), failure);
                ledger.record(source, FAILURE_HINT);
                notify::show_toast("Error", "Failed to convert one or more files. Check the log.");
                TranscodeOutcome::Failed
            }
        }
    }

    #[cfg(test)]
    fn cached_extension(&self) -> Option<&str> {
        self.cache.as_ref().map(|entry| entry.extension.as_str())
    }
}

/// Run the external tool. Argument order is a hard contract: tool,
/// source, fixed option template, output. Stdout and stderr are captured;
/// any diagnostics surface in the log on failure.
pub(crate) fn run_tool(
    spec: ToolSpec,
    source: &Path,
    output_path: &Path,
) -> Result<String, TranscodeError> {
    let output = Command::new(spec.tool)
        .arg(source)
        .args(spec.args)
        .arg(output_path)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stderr.trim().is_empty() {
            error!("{}", stderr.trim_end());
        }
        if !stdout.trim().is_empty() {
            error!("{}", stdout.trim_end());
        }
        error!(
            "Command that resulted in the failure: {} '{}' {} '{}'",
            spec.tool,
            source.display(),
            spec.args.join(" "),
            output_path.display()
        );
        return Err(TranscodeError::ToolInvocation {
            tool: spec.tool.to_string(),
            status: output.status,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Floor-rounded completion percentage. None unless both counters are
/// positive: a run that found nothing eligible reports no percentage at
/// all.
pub fn percent_complete(transcoded: u64, eligible: u64) -> Option<u64> {
    if transcoded == 0 || eligible == 0 {
        return None;
    }
    Some(transcoded * 100 / eligible)
}

fn report_percentage(stats: &RunStats) {
    let Some(percent) = percent_complete(stats.transcode_count, stats.eligible_count) else {
        return;
    };

    if stats.transcode_count < stats.eligible_count {
        info!("{}% of files in queue transcoded", percent);
    } else {
        info!("All files in queue transcoded");
    }
}

fn capitalize(extension: &str) -> String {
    let mut chars = extension.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn dispatcher() -> TranscodeDispatcher {
        TranscodeDispatcher::new(Platform::Linux, Operation::Encode, TargetFormat::Opus)
    }

    #[test]
    fn ineligible_extension_short_circuits() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("track.mp3");
        fs::write(&source, b"mp3").unwrap();

        let mut stats = RunStats::new();
        let mut ledger = FailureLedger::new();
        let outcome = dispatcher().dispatch(&source, false, &mut stats, &mut ledger);

        assert_eq!(outcome, TranscodeOutcome::SkippedIneligible);
        assert_eq!(stats.transcode_count, 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn existing_output_is_never_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("track.wav");
        let output = temp_dir.path().join("track.opus");
        fs::write(&source, b"wav").unwrap();
        fs::write(&output, b"already-transcoded").unwrap();

        let mut stats = RunStats::new();
        let mut ledger = FailureLedger::new();
        let mut dispatcher = dispatcher();

        // twice in a row: same outcome, output bytes untouched
        for _ in 0..2 {
            let outcome = dispatcher.dispatch(&source, false, &mut stats, &mut ledger);
            assert_eq!(outcome, TranscodeOutcome::SkippedExisting(output.clone()));
        }
        assert_eq!(fs::read(&output).unwrap(), b"already-transcoded");
        assert_eq!(stats.transcode_count, 0);
    }

    #[test]
    fn progress_only_counts_eligible_files_without_invoking() {
        let temp_dir = TempDir::new().unwrap();
        let pending = temp_dir.path().join("pending.wav");
        let done = temp_dir.path().join("done.wav");
        fs::write(&pending, b"wav").unwrap();
        fs::write(&done, b"wav").unwrap();
        fs::write(temp_dir.path().join("done.opus"), b"opus").unwrap();

        let mut stats = RunStats::new();
        let mut ledger = FailureLedger::new();
        let mut dispatcher = dispatcher();

        assert_eq!(
            dispatcher.dispatch(&pending, true, &mut stats, &mut ledger),
            TranscodeOutcome::Counted
        );
        // output already present: not part of the pending headcount
        assert!(matches!(
            dispatcher.dispatch(&done, true, &mut stats, &mut ledger),
            TranscodeOutcome::SkippedExisting(_)
        ));
        assert_eq!(stats.eligible_count, 1);
        assert_eq!(stats.transcode_count, 0);
    }

    #[test]
    fn cache_follows_the_extension() {
        let temp_dir = TempDir::new().unwrap();
        let wav = temp_dir.path().join("a.wav");
        let mp3 = temp_dir.path().join("b.mp3");
        fs::write(&wav, b"wav").unwrap();
        fs::write(&mp3, b"mp3").unwrap();

        let mut stats = RunStats::new();
        let mut ledger = FailureLedger::new();
        let mut dispatcher = dispatcher();

        dispatcher.dispatch(&wav, true, &mut stats, &mut ledger);
        assert_eq!(dispatcher.cached_extension(), Some("wav"));
        dispatcher.dispatch(&mp3, true, &mut stats, &mut ledger);
        assert_eq!(dispatcher.cached_extension(), Some("mp3"));
    }

    #[test]
    fn percentage_floors_and_tops_out_exactly() {
        assert_eq!(percent_complete(0, 10), None);
        assert_eq!(percent_complete(1, 0), None);
        assert_eq!(percent_complete(1, 3), Some(33));
        assert_eq!(percent_complete(2, 3), Some(66));
        assert_eq!(percent_complete(3, 3), Some(100));

        // monotone over successive completions
        let reported: Vec<_> = (1..=7)
            .filter_map(|transcoded| percent_complete(transcoded, 7))
            .collect();
        assert!(reported.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(reported.last(), Some(&100));
    }

    #[cfg(unix)]
    #[test]
    fn run_tool_surfaces_exit_status() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("in.wav");
        let output = temp_dir.path().join("out.opus");
        fs::write(&source, b"wav").unwrap();

        let ok = ToolSpec {
            tool: "/bin/true",
            args: &[],
        };
        assert!(run_tool(ok, &source, &output).is_ok());

        let failing = ToolSpec {
            tool: "/bin/false",
            args: &[],
        };
        assert!(matches!(
            run_tool(failing, &source, &output),
            Err(TranscodeError::ToolInvocation { .. })
        ));

        let missing = ToolSpec {
            tool: "/nonexistent/transcoder",
            args: &[],
        };
        assert!(matches!(
            run_tool(missing, &source, &output),
            Err(TranscodeError::Io(_))
        ));
    }

    #[test]
    fn capitalize_matches_log_style() {
        assert_eq!(capitalize("opus"), "Opus");
        assert_eq!(capitalize("wav"), "Wav");
        assert_eq!(capitalize(""), "");
    }
}
