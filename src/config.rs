use crate::dispatch::ShortcutMode;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub log_level: String,
    pub request_timeout_secs: Option<u64>,
    pub notice_ttl_secs: u64,
    pub shortcuts: ShortcutMode,
    pub report: bool,
}

#[derive(Debug, Clone)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_url: "http://localhost:8080".into(),
            log_level: "info".into(),
            request_timeout_secs: None,
            notice_ttl_secs: 3,
            shortcuts: ShortcutMode::Global,
            report: false,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_ttl_secs)
    }
}

impl ConfigLocation {
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("notecal.log")
    }

    pub fn report_path(&self) -> PathBuf {
        self.data_dir.join("activity.jsonl")
    }
}

pub fn locate_config(explicit: Option<PathBuf>) -> Result<ConfigLocation> {
    let dirs = ProjectDirs::from("", "", "notecal").context("locating config directory")?;
    let path = explicit.unwrap_or_else(|| dirs.config_dir().join("config.yml"));
    Ok(ConfigLocation {
        path,
        data_dir: dirs.data_dir().to_path_buf(),
    })
}

/// Reads the config file, writing the defaults out first if there is none.
pub fn load_config(location: &ConfigLocation) -> Result<Config> {
    if location.path.exists() {
        let data = fs::read_to_string(&location.path)
            .with_context(|| format!("reading {:?}", location.path))?;
        parse_config(&data)
    } else {
        let config = Config::default();
        save_config(&location.path, &config)?;
        Ok(config)
    }
}

pub fn parse_config(data: &str) -> Result<Config> {
    if data.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(data).context("parsing config file")
}

pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let serialized = serde_yaml::to_string(config).context("serializing config")?;
    fs::write(path, serialized).with_context(|| format!("writing {:?}", path))?;
    Ok(())
}
