use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use pldl_fetch::{FetchPhase, Progress};

const PB_STYLE: &str = "{spinner:.blue} {msg} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    let pb_style = match ProgressStyle::with_template(PB_STYLE) {
        Ok(pb_style) => pb_style.tick_chars(TICK).progress_chars(PB_CHARS),
        Err(_) => return None,
    };

    Some(pb_style)
});

/// Terminal progress bar for one video, fed by fetch progress events.
pub struct ProgressTracker {
    pb: ProgressBar,
}

impl ProgressTracker {
    pub fn new(title: &str) -> Self {
        let pb = ProgressBar::no_length();
        if let Some(pb_style) = PB_TEMPLATE.as_ref() {
            pb.set_style(pb_style.clone());
        }
        pb.set_message(title.to_string());

        ProgressTracker { pb }
    }

    /// Callback for [`pldl_fetch::FetchOptions::on_progress`].
    pub fn callback(&self) -> Arc<dyn Fn(&Progress) + Send + Sync> {
        let pb = self.pb.clone();
        Arc::new(move |progress: &Progress| apply(&pb, progress))
    }

    /// Leave the bar where it stopped, e.g. after a failed download.
    pub fn abandon(&self) {
        if !self.pb.is_finished() {
            self.pb.abandon();
        }
    }
}

fn apply(pb: &ProgressBar, progress: &Progress) {
    match progress.phase {
        FetchPhase::Connecting => {
            if let Some(total) = progress.total_bytes {
                pb.set_length(total);
            }
            pb.set_position(progress.bytes_downloaded);
        }
        FetchPhase::Downloading => pb.set_position(progress.bytes_downloaded),
        FetchPhase::Committing => {
            pb.set_position(progress.bytes_downloaded);
            pb.finish();
        }
        FetchPhase::Completed => {}
    }
}
