mod prompt;
mod tracker;

pub use prompt::TermPrompt;
pub use tracker::ProgressTracker;
