//! # Progress Display Module
//!
//! Visual feedback for the two pass shapes: an indeterminate spinner
//! while the counting pre-pass walks the tree, and a bar sized to the
//! eligible-file count during the real transcode pass. The percentage
//! *log lines* come from the dispatcher; this is display only.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress display for a transcode queue
pub struct TranscodeProgress {
    bar: ProgressBar,
}

impl TranscodeProgress {
    /// Bar for the real pass, sized to the pre-pass headcount.
    pub fn queue(total_eligible: u64) -> Self {
        let bar = ProgressBar::new(total_eligible);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        Self { bar }
    }

    /// Spinner for the counting pre-pass, which has no known total.
    pub fn counting() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );

        bar.set_message("Counting files eligible for transcoding...");
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    pub fn advance(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}
