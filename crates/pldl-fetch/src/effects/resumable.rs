//! Resumable download functionality.
//!
//! A download appends to `<name>.temp` using an HTTP Range request that
//! starts at the staging file's current length, then renames the staging
//! file into place. A finished artifact short-circuits everything.

use std::io;
use std::path::Path;

use bytes::Bytes;
use futures_util::TryStreamExt;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::http::{BoxStream, HttpClient};
use super::marker;
use crate::core::{ArtifactPaths, range_header};
use crate::data::{FetchOptions, FetchOutcome, FetchPhase, FetchTarget, Progress};
use crate::error::{FetchError, Result};

/// Resumable fetcher implementation.
pub struct ResumableFetcher<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> ResumableFetcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Download `target` into `output_dir`, resuming any staged prefix.
    ///
    /// Returns [`FetchOutcome::Skipped`] without touching the network when
    /// the artifact already exists. On error the staging file is left in
    /// place so the next call resumes from it.
    ///
    /// A staging file that already holds `expected_size` bytes is committed
    /// without a request.
    ///
    /// A server that ignores the `Range` header sends the whole body, which
    /// gets appended after the staged prefix. That is only caught when
    /// [`FetchOptions::verify_size`] is on; an oversized staging file is then
    /// discarded so the next call starts from zero.
    pub async fn fetch(
        &self,
        target: &FetchTarget,
        output_dir: &Path,
        options: &FetchOptions,
    ) -> Result<FetchOutcome> {
        let paths = ArtifactPaths::new(output_dir, &target.title, &target.extension);

        if fs::try_exists(&paths.final_path)
            .await
            .map_err(FetchError::io(&paths.final_path))?
        {
            tracing::info!(path = %paths.final_path.display(), "artifact exists, skipping");
            return Ok(FetchOutcome::Skipped {
                path: paths.final_path,
            });
        }

        let resume_offset = staged_len(&paths.temp_path).await?;
        tracing::info!(
            url = %target.url,
            path = %paths.temp_path.display(),
            resume_offset,
            "starting download"
        );

        self.report_progress(options, FetchPhase::Connecting, resume_offset, target);

        let downloaded = if resume_offset > 0 && target.expected_size == Some(resume_offset) {
            tracing::info!(bytes = resume_offset, "staged file already complete");
            resume_offset
        } else {
            self.download(target, &paths, resume_offset, options).await?
        };

        marker::write(&paths.marker_path, downloaded).await?;
        self.report_progress(options, FetchPhase::Committing, downloaded, target);

        if options.verify_size
            && let Some(expected) = target.expected_size
            && expected != downloaded
        {
            if downloaded > expected {
                // Longer than the stream: the prefix was sent twice, so resuming can't fix it.
                tracing::warn!(expected, actual = downloaded, "size mismatch, discarding staged file");
                fs::remove_file(&paths.temp_path)
                    .await
                    .map_err(FetchError::io(&paths.temp_path))?;
                marker::remove(&paths.marker_path).await?;
            } else {
                tracing::warn!(expected, actual = downloaded, "size mismatch, keeping staged file");
            }
            return Err(FetchError::SizeMismatch {
                expected,
                actual: downloaded,
            });
        }

        fs::rename(&paths.temp_path, &paths.final_path)
            .await
            .map_err(FetchError::io(&paths.final_path))?;
        marker::remove(&paths.marker_path).await?;

        self.report_progress(options, FetchPhase::Completed, downloaded, target);
        tracing::info!(path = %paths.final_path.display(), bytes = downloaded, "download complete");

        Ok(FetchOutcome::Downloaded {
            path: paths.final_path,
            bytes: downloaded,
        })
    }

    /// Request the bytes after `resume_offset` and append them to the
    /// staging file. Returns the staged length.
    async fn download(
        &self,
        target: &FetchTarget,
        paths: &ArtifactPaths,
        resume_offset: u64,
        options: &FetchOptions,
    ) -> Result<u64> {
        let mut headers: Vec<(String, String)> = options.headers.iter().cloned().collect();
        headers.push(("Range".to_string(), range_header(resume_offset)));

        let stream = self
            .client
            .stream(&target.url, &headers)
            .await
            .map_err(FetchError::network)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&paths.temp_path)
            .await
            .map_err(FetchError::io(&paths.temp_path))?;

        let copied = self
            .append_stream(stream, &mut file, &paths.temp_path, resume_offset, target, options)
            .await;

        // Flush on the error path too: the next run sizes this file to resume.
        let flushed = file.flush().await.map_err(FetchError::io(&paths.temp_path));
        drop(file);
        let downloaded = copied?;
        flushed?;

        Ok(downloaded)
    }

    /// Append every body chunk to `file`, `chunk_size` bytes per write.
    ///
    /// Returns the staged length, resume offset included.
    async fn append_stream(
        &self,
        mut stream: BoxStream<'static, std::result::Result<Bytes, C::Error>>,
        file: &mut File,
        path: &Path,
        resume_offset: u64,
        target: &FetchTarget,
        options: &FetchOptions,
    ) -> Result<u64> {
        let chunk_size = options.chunk_size.max(1);
        let mut bytes_downloaded = resume_offset;

        while let Some(chunk) = stream.try_next().await.map_err(FetchError::network)? {
            for piece in chunk.chunks(chunk_size) {
                file.write_all(piece).await.map_err(FetchError::io(path))?;
                bytes_downloaded += piece.len() as u64;
                self.report_progress(options, FetchPhase::Downloading, bytes_downloaded, target);
            }
        }

        Ok(bytes_downloaded)
    }

    fn report_progress(
        &self,
        options: &FetchOptions,
        phase: FetchPhase,
        bytes_downloaded: u64,
        target: &FetchTarget,
    ) {
        if let Some(ref callback) = options.on_progress {
            callback(&Progress {
                phase,
                bytes_downloaded,
                total_bytes: target.expected_size,
            });
        }
    }
}

async fn staged_len(path: &Path) -> Result<u64> {
    match fs::metadata(path).await {
        Ok(meta) => Ok(meta.len()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(FetchError::io(path)(e)),
    }
}
