use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Clone, Debug, Parser)]
#[command(name = "pldl", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub struct App {
    /// Playlist URL; asked for interactively when omitted
    pub playlist: Option<String>,

    /// Directory to download into; asked for when omitted
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Resolution label to use for every video (e.g. 720p) instead of asking
    #[arg(short, long, value_name = "LABEL")]
    pub quality: Option<String>,

    /// Fail a video whose downloaded size differs from the declared size
    #[arg(long)]
    pub verify_size: bool,

    /// yt-dlp executable used to resolve playlists and videos
    #[arg(long, value_name = "PATH")]
    pub ytdlp: Option<PathBuf>,

    /// Config file (default: ~/.config/pldl/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output; repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
