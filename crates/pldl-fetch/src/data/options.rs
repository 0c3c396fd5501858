use std::fmt;
use std::sync::Arc;

use super::progress::Progress;

/// Bytes appended to the staging file per write.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Phases of a download operation.
///
/// Downloads progress through these phases in order:
/// Connecting → Downloading → Committing → Completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Resume offset is known, request is being sent.
    ///
    /// The first event of a download carries the resume offset in
    /// `bytes_downloaded`, so a progress display can start part-way.
    #[default]
    Connecting,

    /// Actively appending data to the staging file.
    Downloading,

    /// Body exhausted; the staging file is about to be renamed into place.
    ///
    /// Progress displays should close here.
    Committing,

    /// Download completed successfully.
    Completed,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPhase::Connecting => write!(f, "Connecting"),
            FetchPhase::Downloading => write!(f, "Downloading"),
            FetchPhase::Committing => write!(f, "Committing"),
            FetchPhase::Completed => write!(f, "Completed"),
        }
    }
}

/// Configuration for resumable fetching.
///
/// # Examples
///
/// ```
/// use pldl_fetch::FetchOptions;
///
/// let options = FetchOptions::default()
///     .verify_size(true)
///     .header("Referer", "https://www.youtube.com/");
/// ```
#[derive(Clone)]
pub struct FetchOptions {
    /// Extra HTTP headers sent with the request.
    ///
    /// The `Range` header is always added by the fetcher and must not be
    /// set here.
    ///
    /// Default: empty
    pub headers: Arc<[(String, String)]>,

    /// Size of each append to the staging file, in bytes.
    ///
    /// Default: [`DEFAULT_CHUNK_SIZE`]
    pub chunk_size: usize,

    /// Fail with [`crate::FetchError::SizeMismatch`] when the finished byte
    /// count differs from the expected size.
    ///
    /// Servers that ignore `Range` append a full body after the resume
    /// offset; this catches that, at the cost of rejecting sizes the
    /// resolver only estimated.
    ///
    /// Default: false
    pub verify_size: bool,

    /// Progress callback invoked on phase transitions and chunk writes.
    ///
    /// Default: None
    pub on_progress: Option<Arc<dyn Fn(&Progress) + Send + Sync>>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("headers", &self.headers)
            .field("chunk_size", &self.chunk_size)
            .field("verify_size", &self.verify_size)
            .field("on_progress", &"{ ... }")
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            headers: Arc::new([]),
            chunk_size: DEFAULT_CHUNK_SIZE,
            verify_size: false,
            on_progress: None,
        }
    }
}

impl FetchOptions {
    /// Add a single custom HTTP header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers: Vec<_> = self.headers.iter().cloned().collect();
        headers.push((key.into(), value.into()));
        self.headers = Arc::from(headers);
        self
    }

    /// Set the write chunk size. Zero is clamped to one byte.
    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    #[must_use]
    pub fn verify_size(mut self, verify_size: bool) -> Self {
        self.verify_size = verify_size;
        self
    }

    /// Set the progress callback.
    ///
    /// # Examples
    ///
    /// ```
    /// use pldl_fetch::{FetchOptions, FetchPhase};
    /// use std::sync::Arc;
    ///
    /// let options = FetchOptions::default()
    ///     .on_progress(Arc::new(|progress| {
    ///         if progress.phase == FetchPhase::Completed {
    ///             println!("Done!");
    ///         }
    ///     }));
    /// ```
    #[must_use]
    pub fn on_progress(mut self, on_progress: Arc<dyn Fn(&Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(on_progress);
        self
    }
}
