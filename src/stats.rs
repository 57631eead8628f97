//! # Run Statistics Module
//!
//! Counters and the failure ledger for one batch run, plus the helpers
//! that format them for the end-of-run summary.
//!
//! ## Tracked:
//! - **files_processed / files_moved**: relocation counters; the copied
//!   count is derived by subtraction
//! - **bytes_relocated**: byte sum of everything moved or copied
//! - **transcode_count / eligible_count**: completed transcodes and the
//!   pre-pass headcount driving percentage reporting
//! - **transcode_elapsed / relocate_elapsed**: accumulated wall time
//!
//! All state is run-scoped and owned by the coordinator; the components
//! that mutate it receive it by `&mut` reference. Nothing here persists
//! across runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Counters for one batch run
#[derive(Debug, Default)]
pub struct RunStats {
    pub files_processed: u64,
    pub files_moved: u64,
    pub bytes_relocated: u64,
    pub transcode_count: u64,
    pub eligible_count: u64,
    pub transcode_elapsed: Duration,
    pub relocate_elapsed: Duration,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only transcoded audio is moved; everything else relevant is
    /// copied, so the difference yields the copied count.
    pub fn files_copied(&self) -> u64 {
        self.files_processed - self.files_moved
    }

    pub fn record_move(&mut self, size: u64) {
        self.files_moved += 1;
        self.files_processed += 1;
        self.bytes_relocated += size;
    }

    pub fn record_copy(&mut self, size: u64) {
        self.files_processed += 1;
        self.bytes_relocated += size;
    }
}

/// Files that failed to transcode, with the remediation hint to show at
/// exit. Append-only for the duration of a run; the ordered map keeps the
/// summary stable.
#[derive(Debug, Default)]
pub struct FailureLedger {
    failures: BTreeMap<PathBuf, String>,
}

impl FailureLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, source: &Path, reason: &str) {
        self.failures
            .insert(source.to_path_buf(), reason.to_string());
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &String)> {
        self.failures.iter()
    }
}

/// Human-readable size with binary unit prefixes
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Elapsed time as hours/minutes/seconds. Quanta under a second keep two
/// decimals, under a minute round to whole seconds; zero-valued hour and
/// minute parts are omitted.
pub fn format_duration(elapsed: Duration) -> String {
    let raw_seconds = elapsed.as_secs_f64();
    if raw_seconds > 0.0 && raw_seconds < 1.0 {
        return format!("{:.2} seconds", raw_seconds);
    }

    let total = raw_seconds.round() as u64;
    if total < 60 {
        return format!("{} seconds", total);
    }

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{} hour(s) ", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{} minutes ", minutes));
    }
    out.push_str(&format!("{} seconds", seconds));
    out
}

/// End-of-run report: the failure ledger with hints, then the transcode
/// and relocation totals for the passes that actually ran.
pub fn print_summary(
    stats: &RunStats,
    ledger: &FailureLedger,
    transcode_ran: bool,
    relocation_ran: bool,
) {
    if !ledger.is_empty() {
        info!(
            "Here's a list of {} files that failed to transcode, with the reason below:",
            ledger.len()
        );
        for (file, reason) in ledger.iter() {
            info!("{}", file.display());
            info!("Reason for failure: {}", reason);
        }
    }

    if transcode_ran {
        info!(
            "Total time taken for successfully transcoding {} files: {}",
            stats.transcode_count,
            format_duration(stats.transcode_elapsed)
        );
    }

    if relocation_ran {
        info!(
            "Moved ({}) and/or copied ({}) a total of {} from {} files in {}",
            stats.files_moved,
            stats.files_copied(),
            format_size(stats.bytes_relocated),
            stats.files_processed,
            format_duration(stats.relocate_elapsed)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processed_is_always_moved_plus_copied() {
        let mut stats = RunStats::new();
        stats.record_move(1000);
        stats.record_copy(200);
        stats.record_move(50);

        assert_eq!(stats.files_processed, 3);
        assert_eq!(stats.files_moved, 2);
        assert_eq!(stats.files_copied(), 1);
        assert_eq!(stats.bytes_relocated, 1250);
        assert_eq!(
            stats.files_processed,
            stats.files_moved + stats.files_copied()
        );
    }

    #[test]
    fn format_size_uses_binary_prefixes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KiB");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.0 GiB");
    }

    #[test]
    fn format_duration_switches_resolution_by_magnitude() {
        assert_eq!(format_duration(Duration::from_millis(250)), "0.25 seconds");
        assert_eq!(format_duration(Duration::from_secs(0)), "0 seconds");
        assert_eq!(format_duration(Duration::from_secs(42)), "42 seconds");
        assert_eq!(
            format_duration(Duration::from_secs(60)),
            "1 minutes 0 seconds"
        );
        assert_eq!(
            format_duration(Duration::from_secs(3723)),
            "1 hour(s) 2 minutes 3 seconds"
        );
        assert_eq!(
            format_duration(Duration::from_secs(3600)),
            "1 hour(s) 0 seconds"
        );
    }

    #[test]
    fn ledger_iterates_in_stable_path_order() {
        let mut ledger = FailureLedger::new();
        ledger.record(Path::new("/b/second.wav"), "hint");
        ledger.record(Path::new("/a/first.wav"), "hint");

        let order: Vec<_> = ledger.iter().map(|(path, _)| path.clone()).collect();
        assert_eq!(
            order,
            [PathBuf::from("/a/first.wav"), PathBuf::from("/b/second.wav")]
        );
        assert_eq!(ledger.len(), 2);
    }
}
