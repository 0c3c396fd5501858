use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use pldl_fetch::ClientSetting;
use serde::{Deserialize, Serialize};

use crate::cli::App;

const ENV_PREFIX: &str = "PLDL_";

/// Settings merged from defaults, the config file, `PLDL_*` variables and
/// the command line, in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: Option<PathBuf>,
    pub quality: Option<String>,
    pub verify_size: bool,
    pub ytdlp: PathBuf,
    pub proxies: Vec<String>,
    pub user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: None,
            quality: None,
            verify_size: false,
            ytdlp: PathBuf::from("yt-dlp"),
            proxies: Vec::new(),
            user_agent: None,
        }
    }
}

impl Config {
    // ~/.config/pldl/config.toml
    const CONFIG_DIR: &str = ".config/pldl";
    const CONFIG_FILE: &str = "config.toml";

    pub fn default_path() -> Option<PathBuf> {
        home::home_dir().map(|h| h.join(Self::CONFIG_DIR).join(Self::CONFIG_FILE))
    }

    /// Load from `explicit` if given (it must exist), else from the default
    /// path if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let file = match explicit {
            Some(path) if !path.exists() => bail!("config file {} not found", path.display()),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path(),
        };

        Self::figment(file.as_deref())
            .extract()
            .context("failed to load configuration")
    }

    fn figment(file: Option<&Path>) -> Figment {
        let mut fig = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            tracing::debug!(path = %file.display(), "reading config file");
            fig = fig.merge(Toml::file(file));
        }
        fig.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Command-line flags override everything loaded so far.
    pub fn apply_cli(&mut self, app: &App) {
        if let Some(output) = &app.output {
            self.output = Some(output.clone());
        }
        if let Some(quality) = &app.quality {
            self.quality = Some(quality.clone());
        }
        if let Some(ytdlp) = &app.ytdlp {
            self.ytdlp = ytdlp.clone();
        }
        self.verify_size |= app.verify_size;
    }

    pub fn client_setting(&self) -> ClientSetting {
        ClientSetting {
            proxies: (!self.proxies.is_empty()).then(|| self.proxies.clone()),
            user_agent: self.user_agent.clone(),
        }
    }
}
