//! Failure notification collaborator. Linux goes through `notify-send`;
//! elsewhere the message only lands in the log.

use std::process::Command;
use tracing::warn;

/// Fire a one-shot desktop notification.
pub fn show_toast(title: &str, message: &str) {
    let message = format!("transcode-mover: {}", message);

    if cfg!(target_os = "linux") {
        if let Err(error) = Command::new("notify-send")
            .arg(title)
            .arg(&message)
            .output()
        {
            warn!("Could not display notification: {}", error);
        }
    } else {
        warn!("{}: {}", title, message);
    }
}
