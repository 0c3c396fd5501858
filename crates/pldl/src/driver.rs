//! Walks a playlist and downloads each video in order.
//!
//! A failure on one video is reported and counted, never propagated; only
//! resolving the playlist itself can abort a run.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;
use pldl_fetch::{
    FetchError, FetchOptions, FetchOutcome, FetchTarget, HttpClient, ResumableFetcher,
};
use pldl_media::{
    Prompt, QualitySelector, ResolveError, Resolver, SelectError, available_qualities,
    select_stream,
};
use thiserror::Error;

use crate::ui::ProgressTracker;

/// Why a single video was not downloaded.
#[derive(Debug, Error)]
pub enum VideoError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

enum VideoOutcome {
    Downloaded { title: String, quality: String },
    AlreadyPresent { name: String },
}

/// Per-run tally.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub downloaded: usize,
    pub already_present: usize,
    /// Videos passed over by quality selection.
    pub skipped: usize,
    pub failed: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} videos: {} downloaded, {} already present, {} skipped, {} failed",
            self.total, self.downloaded, self.already_present, self.skipped, self.failed
        )
    }
}

pub struct Driver<R, C: HttpClient, P> {
    resolver: R,
    fetcher: ResumableFetcher<C>,
    prompt: P,
    selector: QualitySelector,
    output_dir: PathBuf,
    options: FetchOptions,
    show_progress: bool,
}

impl<R: Resolver, C: HttpClient, P: Prompt> Driver<R, C, P> {
    pub fn new(resolver: R, client: C, prompt: P, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            resolver,
            fetcher: ResumableFetcher::new(client),
            prompt,
            selector: QualitySelector::new(),
            output_dir: output_dir.into(),
            options: FetchOptions::default(),
            show_progress: false,
        }
    }

    #[must_use]
    pub fn with_selector(mut self, selector: QualitySelector) -> Self {
        self.selector = selector;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn show_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn run(&mut self, playlist_url: &str) -> Result<RunSummary> {
        let video_urls = self
            .resolver
            .resolve_playlist(playlist_url)
            .await
            .with_context(|| format!("failed to resolve playlist {playlist_url}"))?;

        println!("Total videos in playlist: {}", video_urls.len());
        tracing::info!(playlist = playlist_url, count = video_urls.len(), "playlist resolved");

        let mut summary = RunSummary {
            total: video_urls.len(),
            ..RunSummary::default()
        };

        for video_url in &video_urls {
            match self.download_video(video_url).await {
                Ok(VideoOutcome::Downloaded { title, quality }) => {
                    summary.downloaded += 1;
                    println!("{} {title} - Quality: {quality}", style("Downloaded:").green());
                }
                Ok(VideoOutcome::AlreadyPresent { name }) => {
                    summary.already_present += 1;
                    println!("Skipping download: '{name}' already exists.");
                }
                Err(e @ VideoError::Select(_)) => {
                    summary.skipped += 1;
                    tracing::info!(video = %video_url, error = %e, "video skipped");
                    println!("{}", style(failure_line(video_url, &e)).yellow());
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(video = %video_url, error = %e, "video failed");
                    eprintln!("{}", style(failure_line(video_url, &e)).red());
                }
            }
        }

        Ok(summary)
    }

    async fn download_video(&mut self, video_url: &str) -> Result<VideoOutcome, VideoError> {
        let video = self.resolver.resolve_video(video_url).await?;
        let available = available_qualities(&video);
        let quality = self.selector.ensure_selected(&available, &mut self.prompt)?;

        let stream = select_stream(&video, &quality).ok_or_else(|| SelectError::NoStream {
            quality: quality.clone(),
        })?;
        let target = FetchTarget {
            url: stream.url.clone(),
            title: video.title.clone(),
            extension: stream.subtype.clone(),
            expected_size: stream.filesize,
        };

        let tracker = self.show_progress.then(|| ProgressTracker::new(&video.title));
        let options = match &tracker {
            Some(tracker) => self.options.clone().on_progress(tracker.callback()),
            None => self.options.clone(),
        };

        let outcome = self.fetcher.fetch(&target, &self.output_dir, &options).await;
        if let Some(tracker) = &tracker {
            tracker.abandon();
        }

        let outcome = outcome?;
        match outcome {
            FetchOutcome::Downloaded { .. } => Ok(VideoOutcome::Downloaded {
                title: video.title,
                quality,
            }),
            FetchOutcome::Skipped { .. } => Ok(VideoOutcome::AlreadyPresent {
                name: outcome
                    .path()
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            }),
        }
    }
}

/// One line naming the video and why it was not downloaded.
fn failure_line(video_url: &str, error: &VideoError) -> String {
    match error {
        VideoError::Select(e) => format!("Skipping {video_url}: {e}"),
        e => format!("Error downloading {video_url}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::io;
    use std::path::Path;
    use std::sync::Mutex;

    use bytes::Bytes;
    use pldl_fetch::BoxStream;
    use pldl_media::{StreamDescriptor, VideoDescriptor};
    use tempfile::TempDir;

    const PLAYLIST: &str = "https://www.youtube.com/playlist?list=PLtest";

    /// Playlist of video ids; each id maps to a descriptor or a resolver error.
    #[derive(Default)]
    struct FakeResolver {
        playlist: Option<Vec<String>>,
        videos: HashMap<String, Result<VideoDescriptor, String>>,
    }

    impl FakeResolver {
        fn video(mut self, url: &str, title: &str, qualities: &[&str]) -> Self {
            let streams = qualities
                .iter()
                .map(|q| StreamDescriptor {
                    resolution: Some(q.to_string()),
                    subtype: "mp4".to_string(),
                    filesize: Some(body_for(&format!("{url}/{q}")).len() as u64),
                    url: format!("{url}/{q}"),
                    progressive: true,
                })
                .collect();
            self.playlist.get_or_insert_with(Vec::new).push(url.to_string());
            self.videos.insert(
                url.to_string(),
                Ok(VideoDescriptor {
                    title: title.to_string(),
                    streams,
                }),
            );
            self
        }

        fn broken(mut self, url: &str) -> Self {
            self.playlist.get_or_insert_with(Vec::new).push(url.to_string());
            self.videos
                .insert(url.to_string(), Err("Video unavailable".to_string()));
            self
        }
    }

    impl Resolver for FakeResolver {
        async fn resolve_playlist(&self, _url: &str) -> Result<Vec<String>, ResolveError> {
            self.playlist.clone().ok_or_else(|| ResolveError::Exited {
                status: Some(1),
                stderr: "ERROR: playlist does not exist".to_string(),
            })
        }

        async fn resolve_video(&self, url: &str) -> Result<VideoDescriptor, ResolveError> {
            match self.videos.get(url) {
                Some(Ok(video)) => Ok(video.clone()),
                Some(Err(msg)) => Err(ResolveError::Exited {
                    status: Some(1),
                    stderr: msg.clone(),
                }),
                None => panic!("unexpected video {url}"),
            }
        }
    }

    fn body_for(stream_url: &str) -> Vec<u8> {
        stream_url.as_bytes().repeat(40)
    }

    #[derive(Debug)]
    struct FakeError;

    impl fmt::Display for FakeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "fake transport error")
        }
    }

    impl std::error::Error for FakeError {}

    /// Serves `body_for(url)` honouring the Range offset; logs every URL.
    #[derive(Default)]
    struct FakeClient {
        requested: Mutex<Vec<String>>,
    }

    impl HttpClient for FakeClient {
        type Error = FakeError;

        fn stream(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> impl Future<Output = Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error>> + Send {
            self.requested.lock().unwrap().push(url.to_string());
            let offset: usize = headers
                .iter()
                .find(|(k, _)| k == "Range")
                .and_then(|(_, v)| v.strip_prefix("bytes=")?.strip_suffix('-')?.parse().ok())
                .unwrap_or(0);
            let body = Bytes::from(body_for(url)).slice(offset..);

            async move {
                let stream: BoxStream<'static, Result<Bytes, FakeError>> =
                    Box::pin(futures_util::stream::iter(vec![Ok(body)]));
                Ok(stream)
            }
        }
    }

    #[derive(Default)]
    struct ScriptedPrompt {
        answers: VecDeque<String>,
        asked: usize,
    }

    impl ScriptedPrompt {
        fn answering(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                asked: 0,
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn choose(&mut self, _options: &[String]) -> io::Result<String> {
            self.asked += 1;
            self.answers
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no answer"))
        }
    }

    fn driver(
        resolver: FakeResolver,
        prompt: ScriptedPrompt,
        dir: &Path,
    ) -> Driver<FakeResolver, FakeClient, ScriptedPrompt> {
        Driver::new(resolver, FakeClient::default(), prompt, dir)
    }

    #[tokio::test]
    async fn test_quality_asked_once_and_reused() {
        let dir = TempDir::new().unwrap();
        let resolver = FakeResolver::default()
            .video("v1", "First", &["480p", "720p"])
            .video("v2", "Second", &["480p", "720p", "1080p"])
            .video("v3", "Third", &["480p", "1080p"]);
        let mut driver = driver(resolver, ScriptedPrompt::answering(&["2"]), dir.path());

        let summary = driver.run(PLAYLIST).await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                total: 3,
                downloaded: 2,
                already_present: 0,
                skipped: 1,
                failed: 0,
            }
        );
        assert_eq!(driver.prompt.asked, 1);
        assert_eq!(driver.selector.selected(), Some("720p"));
        assert_eq!(
            *driver.fetcher.client().requested.lock().unwrap(),
            vec!["v1/720p".to_string(), "v2/720p".to_string()]
        );
        assert_eq!(std::fs::read(dir.path().join("First.mp4")).unwrap(), body_for("v1/720p"));
        assert!(!dir.path().join("Third.mp4").exists());
    }

    #[tokio::test]
    async fn test_invalid_choice_reprompts_next_video() {
        let dir = TempDir::new().unwrap();
        let resolver = FakeResolver::default()
            .video("v1", "First", &["480p", "720p"])
            .video("v2", "Second", &["480p", "720p"]);
        let mut driver = driver(resolver, ScriptedPrompt::answering(&["5", "1"]), dir.path());

        let summary = driver.run(PLAYLIST).await.unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.downloaded, 1);
        assert_eq!(driver.prompt.asked, 2);
        assert_eq!(driver.selector.selected(), Some("480p"));
        assert!(!dir.path().join("First.mp4").exists());
        assert!(dir.path().join("Second.mp4").exists());
    }

    #[tokio::test]
    async fn test_resolution_failure_is_isolated() {
        let dir = TempDir::new().unwrap();
        let resolver = FakeResolver::default()
            .video("v1", "First", &["720p"])
            .broken("v2")
            .video("v3", "Third", &["720p"]);
        let mut driver = driver(resolver, ScriptedPrompt::default(), dir.path())
            .with_selector(QualitySelector::preset("720p"));

        let summary = driver.run(PLAYLIST).await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.downloaded, 2);
        assert!(dir.path().join("First.mp4").exists());
        assert!(dir.path().join("Third.mp4").exists());
    }

    #[tokio::test]
    async fn test_second_run_skips_finished_files() {
        let dir = TempDir::new().unwrap();
        let resolver = FakeResolver::default()
            .video("v1", "Part 1: Intro", &["360p"])
            .video("v2", "Part 2: More", &["360p"]);
        let mut driver = driver(resolver, ScriptedPrompt::default(), dir.path())
            .with_selector(QualitySelector::preset("360p"));

        let first = driver.run(PLAYLIST).await.unwrap();
        let second = driver.run(PLAYLIST).await.unwrap();

        assert_eq!(first.downloaded, 2);
        assert_eq!(second.already_present, 2);
        assert_eq!(second.downloaded, 0);
        assert_eq!(driver.fetcher.client().requested.lock().unwrap().len(), 2);
        assert!(dir.path().join("Part 1 Intro.mp4").exists());

        match driver.download_video("v1").await {
            Ok(VideoOutcome::AlreadyPresent { name }) => assert_eq!(name, "Part 1 Intro"),
            _ => panic!("expected the finished file to be reported"),
        }
    }

    #[tokio::test]
    async fn test_staged_file_is_resumed() {
        let dir = TempDir::new().unwrap();
        let full = body_for("v1/720p");
        std::fs::write(dir.path().join("First.mp4.temp"), &full[..100]).unwrap();
        let resolver = FakeResolver::default().video("v1", "First", &["720p"]);
        let mut driver = driver(resolver, ScriptedPrompt::default(), dir.path())
            .with_selector(QualitySelector::preset("720p"));

        let summary = driver.run(PLAYLIST).await.unwrap();

        assert_eq!(summary.downloaded, 1);
        assert_eq!(std::fs::read(dir.path().join("First.mp4")).unwrap(), full);
    }

    #[tokio::test]
    async fn test_playlist_failure_aborts() {
        let dir = TempDir::new().unwrap();
        let mut driver = driver(FakeResolver::default(), ScriptedPrompt::default(), dir.path());

        let err = driver.run(PLAYLIST).await.unwrap_err();
        assert!(err.to_string().contains("failed to resolve playlist"));
    }

    #[tokio::test]
    async fn test_missing_output_dir_fails_each_video() {
        let dir = TempDir::new().unwrap();
        let resolver = FakeResolver::default()
            .video("v1", "First", &["720p"])
            .video("v2", "Second", &["720p"]);
        let mut driver = driver(resolver, ScriptedPrompt::default(), &dir.path().join("missing"))
            .with_selector(QualitySelector::preset("720p"));

        let summary = driver.run(PLAYLIST).await.unwrap();
        assert_eq!(summary.failed, 2);
    }

    #[test]
    fn test_failure_line_names_video() {
        let skipped = VideoError::Select(SelectError::QualityUnavailable {
            selected: "720p".to_string(),
            available: vec!["480p".to_string()],
        });
        assert_eq!(
            failure_line("https://youtu.be/v2", &skipped),
            "Skipping https://youtu.be/v2: Selected quality '720p' is not available. Available options: 480p"
        );

        let failed = VideoError::Fetch(FetchError::SizeMismatch {
            expected: 10,
            actual: 12,
        });
        assert_eq!(
            failure_line("https://youtu.be/v3", &failed),
            "Error downloading https://youtu.be/v3: size mismatch: expected 10 bytes, got 12"
        );
    }

    #[test]
    fn test_summary_display() {
        let summary = RunSummary {
            total: 4,
            downloaded: 1,
            already_present: 1,
            skipped: 1,
            failed: 1,
        };
        assert_eq!(
            summary.to_string(),
            "4 videos: 1 downloaded, 1 already present, 1 skipped, 1 failed"
        );
    }
}
