//! Turning playlist and video URLs into descriptors.
//!
//! [`Resolver`] is the seam; [`YtDlpResolver`] is the production
//! implementation, which runs `yt-dlp -J` and reads its JSON.

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;

use crate::error::ResolveError;
use crate::model::{StreamDescriptor, VideoDescriptor};

/// Capability that resolves playlists and videos.
pub trait Resolver: Send + Sync {
    /// Video URLs of a playlist, in playlist order.
    fn resolve_playlist(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Vec<String>, ResolveError>> + Send;

    /// Title and stream options of one video.
    fn resolve_video(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<VideoDescriptor, ResolveError>> + Send;
}

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Resolver backed by the `yt-dlp` executable.
#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    program: PathBuf,
}

impl Default for YtDlpResolver {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl YtDlpResolver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn dump_json(&self, args: &[&str], url: &str) -> Result<Vec<u8>, ResolveError> {
        tracing::debug!(program = %self.program.display(), ?args, url, "running resolver");

        let output = Command::new(&self.program)
            .args(args)
            .arg(url)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ResolveError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ResolveError::Exited {
                status: output.status.code(),
                stderr: stderr.trim().lines().last().unwrap_or_default().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

impl Resolver for YtDlpResolver {
    async fn resolve_playlist(&self, url: &str) -> Result<Vec<String>, ResolveError> {
        let json = self
            .dump_json(&["--no-warnings", "--flat-playlist", "-J"], url)
            .await?;
        parse_playlist(&json)
    }

    async fn resolve_video(&self, url: &str) -> Result<VideoDescriptor, ResolveError> {
        let json = self
            .dump_json(&["--no-warnings", "--no-playlist", "-J"], url)
            .await?;
        parse_video(&json)
    }
}

#[derive(Debug, Deserialize)]
struct PlaylistInfo {
    #[serde(default)]
    entries: Vec<Option<PlaylistEntry>>,
}

#[derive(Debug, Deserialize)]
struct PlaylistEntry {
    id: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoInfo {
    title: String,
    #[serde(default)]
    formats: Vec<FormatInfo>,
}

#[derive(Debug, Deserialize)]
struct FormatInfo {
    url: Option<String>,
    ext: Option<String>,
    vcodec: Option<String>,
    acodec: Option<String>,
    height: Option<u32>,
    filesize: Option<u64>,
    filesize_approx: Option<u64>,
    protocol: Option<String>,
}

impl FormatInfo {
    fn has(codec: &Option<String>) -> bool {
        codec.as_deref().is_some_and(|c| c != "none")
    }

    fn is_direct(&self) -> bool {
        matches!(self.protocol.as_deref(), None | Some("http" | "https"))
    }

    fn into_stream(self) -> Option<StreamDescriptor> {
        let progressive = Self::has(&self.vcodec) && Self::has(&self.acodec) && self.is_direct();
        let resolution = match self.height {
            Some(h) if Self::has(&self.vcodec) => Some(format!("{h}p")),
            _ => None,
        };

        Some(StreamDescriptor {
            resolution,
            subtype: self.ext?,
            filesize: self.filesize.or(self.filesize_approx),
            url: self.url?,
            progressive,
        })
    }
}

/// Video URLs from `yt-dlp --flat-playlist -J` output.
///
/// Entries yt-dlp could not list (`null`) or without any locator are dropped.
pub fn parse_playlist(json: &[u8]) -> Result<Vec<String>, ResolveError> {
    let info: PlaylistInfo = serde_json::from_slice(json)?;

    Ok(info
        .entries
        .into_iter()
        .flatten()
        .filter_map(|entry| match (entry.url, entry.id) {
            (Some(url), _) if url.starts_with("http") => Some(url),
            (_, Some(id)) => Some(format!("{WATCH_URL}{id}")),
            (url, None) => {
                tracing::warn!(?url, "playlist entry without a usable locator");
                None
            }
        })
        .collect())
}

/// Video descriptor from `yt-dlp -J` output.
pub fn parse_video(json: &[u8]) -> Result<VideoDescriptor, ResolveError> {
    let info: VideoInfo = serde_json::from_slice(json)?;

    Ok(VideoDescriptor {
        title: info.title,
        streams: info
            .formats
            .into_iter()
            .filter_map(FormatInfo::into_stream)
            .collect(),
    })
}
