use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Branch archived when neither `-b` nor the config names one.
pub const DEFAULT_BRANCH: &str = "master";

/// HTTP deadlines and limits (optional `[http]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connect timeout in seconds, applied to both the API call and the download.
    pub connect_timeout_secs: u64,
    /// Total timeout in seconds for the archive-link API call.
    pub api_timeout_secs: u64,
    /// Abort the download if throughput stays below this many bytes/sec...
    pub low_speed_limit_bytes: u32,
    /// ...for this many seconds.
    pub low_speed_time_secs: u64,
    /// Hard wall-clock limit in seconds for the whole download.
    pub download_timeout_secs: u64,
    /// Maximum redirects followed while downloading the archive.
    pub max_redirections: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            api_timeout_secs: 30,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            download_timeout_secs: 3600,
            max_redirections: 10,
        }
    }
}

/// Global configuration loaded from `~/.config/ghtar/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GhtarConfig {
    /// Root of the GitHub REST API (override for GitHub Enterprise).
    pub api_base_url: String,
    /// `User-Agent` sent with every request; GitHub rejects requests without one.
    pub user_agent: String,
    /// Branch used when `-b` is not given.
    pub default_branch: String,
    /// Delay between spinner frames in milliseconds.
    pub spinner_interval_ms: u64,
    /// Optional HTTP limits; if missing, built-in defaults are used.
    pub http: Option<HttpConfig>,
}

impl Default for GhtarConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".to_string(),
            user_agent: concat!("ghtar/", env!("CARGO_PKG_VERSION")).to_string(),
            default_branch: DEFAULT_BRANCH.to_string(),
            spinner_interval_ms: 30,
            http: None,
        }
    }
}

impl GhtarConfig {
    /// HTTP settings, falling back to defaults when the section is absent.
    pub fn http(&self) -> HttpConfig {
        self.http.clone().unwrap_or_default()
    }

    pub fn spinner_interval(&self) -> Duration {
        Duration::from_millis(self.spinner_interval_ms)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ghtar")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GhtarConfig> {
    load_or_init_at(&config_path()?)
}

/// [`load_or_init`] for an explicit path. Parse errors are reported on one line.
pub fn load_or_init_at(path: &Path) -> Result<GhtarConfig> {
    if !path.exists() {
        let default_cfg = GhtarConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: GhtarConfig = toml::from_str(&data)
        .map_err(|e| anyhow::anyhow!("parse {}: {}", path.display(), e.message().trim()))?;
    Ok(cfg)
}
