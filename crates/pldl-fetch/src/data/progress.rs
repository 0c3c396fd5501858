use super::options::FetchPhase;

/// Current state of a download, passed to progress callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Current phase of the download.
    pub phase: FetchPhase,

    /// Bytes in the staging file, counting any resumed prefix.
    pub bytes_downloaded: u64,

    /// Total expected bytes, if the resolver reported a size.
    pub total_bytes: Option<u64>,
}
