use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::lookup::TomlLookup;

/// Global configuration loaded from `~/.config/fetchr/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchrConfig {
    /// Root of the download cache (None = `$XDG_CACHE_HOME/fetchr/downloads`).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    pub connect_timeout_secs: u64,
    /// Abort a transfer slower than this many bytes/s for `low_speed_time_secs`.
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
    /// Optional hard limit per transfer (None = no limit).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    pub max_redirections: u32,
    /// Fallback SFTP credentials (`username`, `password`, `hostChecking`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sftp: Option<toml::Table>,
    /// Fallback SMB credentials (`domain`, `username`, `password`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smb: Option<toml::Table>,
    /// Fallback HTTP credentials (`username`, `password`, `ignoreSSL`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<toml::Table>,
}

impl Default for FetchrConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            connect_timeout_secs: 30,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            timeout_secs: None,
            max_redirections: 10,
            sftp: None,
            smb: None,
            http: None,
        }
    }
}

impl FetchrConfig {
    /// Configured download root, or the XDG cache default.
    pub fn download_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.download_dir {
            return Ok(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("fetchr")?;
        Ok(xdg_dirs.get_cache_home().join("fetchr").join("downloads"))
    }

    /// Credential tables as a lookup keyed `sftp.username`, `http.ignoreSSL`, ...
    pub fn lookup(&self) -> TomlLookup {
        let mut root = toml::Table::new();
        for (name, table) in [("sftp", &self.sftp), ("smb", &self.smb), ("http", &self.http)] {
            if let Some(table) = table {
                root.insert(name.to_string(), toml::Value::Table(table.clone()));
            }
        }
        TomlLookup::from_table(&root)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fetchr")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchrConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchrConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: FetchrConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
