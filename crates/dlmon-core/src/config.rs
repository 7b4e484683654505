use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::tail::DEFAULT_MAX_CHUNK_BYTES;

/// Which evidence makes a staging subdirectory an active item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    /// The staging directory holds at least one file.
    NonEmpty,
    /// The staging directory holds a file, or the manifest carries a progress key.
    #[default]
    NonEmptyOrManifest,
}

/// Log keyword scan distinguishing "paused" from "idle" (optional section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauseHeuristicConfig {
    pub enabled: bool,
    /// How many trailing lines of the content log to inspect.
    pub scan_lines: usize,
}

impl Default for PauseHeuristicConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scan_lines: 200,
        }
    }
}

/// Global configuration loaded from `~/.config/dlmon/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between polls; also the elapsed time used for delta rates.
    pub interval_secs: u64,
    /// Number of polls per `watch` run.
    pub cycles: u32,
    /// Log silence after which the log-derived rate is forced to zero.
    pub stale_secs: u64,
    #[serde(default)]
    pub eligibility: Eligibility,
    /// If set, staging directories not modified within this window are ignored.
    #[serde(default)]
    pub recent_activity_secs: Option<u64>,
    /// Upper bound on log bytes consumed per file per poll.
    #[serde(default = "default_max_log_chunk_bytes")]
    pub max_log_chunk_bytes: usize,
    /// Installation root; overridden by `STEAM_ROOT` and `--root`.
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub pause_heuristic: PauseHeuristicConfig,
}

fn default_max_log_chunk_bytes() -> usize {
    DEFAULT_MAX_CHUNK_BYTES
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            cycles: 5,
            stale_secs: 10,
            eligibility: Eligibility::default(),
            recent_activity_secs: None,
            max_log_chunk_bytes: DEFAULT_MAX_CHUNK_BYTES,
            root: None,
            pause_heuristic: PauseHeuristicConfig::default(),
        }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn stale_window(&self) -> Duration {
        Duration::from_secs(self.stale_secs)
    }

    pub fn recent_activity(&self) -> Option<Duration> {
        self.recent_activity_secs.map(Duration::from_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dlmon")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MonitorConfig> {
    load_or_init_at(&config_path()?)
}

/// Like `load_or_init`, for an explicit config file path.
pub fn load_or_init_at(path: &Path) -> Result<MonitorConfig> {
    if !path.exists() {
        let default_cfg = MonitorConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: MonitorConfig = toml::from_str(&data)?;
    Ok(cfg)
}

/// Load configuration, falling back to defaults when the file is unusable.
/// A broken config is never fatal; only a missing installation root is.
pub fn load_or_default() -> MonitorConfig {
    match config_path() {
        Ok(path) => load_or_default_at(&path),
        Err(err) => {
            tracing::warn!(error = %err, "no config location; using defaults");
            MonitorConfig::default()
        }
    }
}

pub fn load_or_default_at(path: &Path) -> MonitorConfig {
    load_or_init_at(path).unwrap_or_else(|err| {
        tracing::warn!(
            path = %path.display(),
            error = %format!("{err:#}"),
            "unusable config; using defaults"
        );
        MonitorConfig::default()
    })
}
