//! Progress bar utilities for matching runs.

use crate::constants::PROGRESS_MAX;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a percentage progress bar for a matching run.
pub fn create_run_progress(total_sequences: usize, enabled: bool) -> Option<ProgressBar> {
    if !enabled || total_sequences == 0 {
        return None;
    }

    let pb = ProgressBar::new(u64::from(PROGRESS_MAX));
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "[{{elapsed_precise}}] {{bar:40.cyan/blue}} {{pos}}% of {total_sequences} sequences ({{eta}})"
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    Some(pb)
}

/// Move a progress bar to the given percentage.
pub fn set_progress(pb: Option<&ProgressBar>, percent: u8) {
    if let Some(pb) = pb {
        pb.set_position(u64::from(percent));
    }
}

/// Finish a progress bar with a message.
pub fn finish_progress(pb: Option<ProgressBar>, message: &str) {
    if let Some(pb) = pb {
        pb.finish_with_message(message.to_string());
    }
}
