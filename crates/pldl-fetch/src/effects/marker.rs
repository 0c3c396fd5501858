//! Progress marker written next to the staging file.
//!
//! The marker holds the final byte count as a JSON number. Nothing reads it:
//! resume always uses the staging file's length.

use std::path::Path;

use tokio::fs;

use crate::error::{FetchError, Result};

pub(crate) async fn write(path: &Path, bytes: u64) -> Result<()> {
    let encoded = serde_json::to_vec(&bytes)?;
    fs::write(path, encoded).await.map_err(FetchError::io(path))
}

pub(crate) async fn remove(path: &Path) -> Result<()> {
    fs::remove_file(path).await.map_err(FetchError::io(path))
}
