mod cli;
mod config;
mod driver;
mod logging;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use console::Term;
use pldl_fetch::{FetchOptions, ReqwestClient};
use pldl_media::{QualitySelector, YtDlpResolver};

use crate::cli::App;
use crate::config::Config;
use crate::driver::Driver;
use crate::ui::TermPrompt;

const DEFAULT_OUTPUT: &str = "./";

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();
    logging::init_tracing(app.verbose);

    let mut config = Config::load(app.config.as_deref())?;
    config.apply_cli(&app);
    tracing::debug!(?config, "configuration loaded");

    let prompt = TermPrompt::new();

    let playlist_url = match app.playlist {
        Some(url) => url,
        None => prompt
            .ask("Enter YouTube playlist URL: ")
            .context("failed to read playlist URL")?
            .trim()
            .to_string(),
    };
    if playlist_url.is_empty() {
        bail!("no playlist URL given");
    }

    let output_dir = match config.output.clone() {
        Some(dir) => dir,
        None => {
            let answer = prompt
                .ask("Enter output path (press Enter for current directory): ")
                .context("failed to read output path")?;
            match answer.trim() {
                "" => PathBuf::from(DEFAULT_OUTPUT),
                path => PathBuf::from(path),
            }
        }
    };
    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let client = ReqwestClient::with_setting(config.client_setting())
        .context("failed to build HTTP client")?;
    let resolver = YtDlpResolver::new(config.ytdlp.clone());
    let selector = match &config.quality {
        Some(quality) => QualitySelector::preset(quality.clone()),
        None => QualitySelector::new(),
    };

    let mut driver = Driver::new(resolver, client, prompt, output_dir)
        .with_selector(selector)
        .with_options(FetchOptions::default().verify_size(config.verify_size))
        .show_progress(Term::stdout().is_term());

    let summary = driver.run(&playlist_url).await?;
    tracing::info!(%summary, "run finished");
    println!("{summary}");

    Ok(())
}
