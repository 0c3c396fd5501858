//! Error types for pldl-fetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("file I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("failed to encode progress marker: {0}")]
    Marker(#[from] serde_json::Error),
}

impl FetchError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| FetchError::Io { path, source }
    }

    pub(crate) fn network<E: std::error::Error>(e: E) -> Self {
        FetchError::Network(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
