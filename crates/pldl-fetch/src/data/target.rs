use std::path::{Path, PathBuf};

/// What to download and what to call it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    /// Source locator of the byte stream.
    pub url: String,
    /// Unsanitized title; becomes the file stem.
    pub title: String,
    /// Container subtype, used as the file extension (e.g. `mp4`).
    pub extension: String,
    /// Declared size of the whole stream, if known.
    pub expected_size: Option<u64>,
}

/// Result of a successful [`crate::ResumableFetcher::fetch`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The artifact was (re)built from the network and placed at `path`.
    Downloaded { path: PathBuf, bytes: u64 },
    /// The artifact already existed; nothing was requested.
    Skipped { path: PathBuf },
}

impl FetchOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FetchOutcome::Downloaded { path, .. } | FetchOutcome::Skipped { path } => path,
        }
    }
}
