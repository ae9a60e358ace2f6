//! Application configuration management utilities.

use camino::Utf8PathBuf;
use ltk_wwise::ContainerKind;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;

/// Application-wide configuration stored in config.toml.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// String table used when `--strings` is not given.
    pub strings_path: Option<Utf8PathBuf>,
    /// Container format written when `--format` is not given.
    pub output_format: Option<ContainerKind>,
}

/// Returns the directory where the current executable resides.
pub fn install_dir() -> Option<Utf8PathBuf> {
    let exe = env::current_exe().ok()?;
    let parent = exe.parent()?;
    Utf8PathBuf::from_path_buf(parent.to_path_buf()).ok()
}

/// Returns the default configuration file path (config.toml).
pub fn default_config_path() -> Option<Utf8PathBuf> {
    install_dir().map(|dir| dir.join("config.toml"))
}

/// Loads the application configuration from config.toml.
/// Returns default configuration if file doesn't exist or cannot be parsed.
pub fn load_config() -> AppConfig {
    default_config_path()
        .and_then(|path| fs::read_to_string(path).ok())
        .and_then(|content| parse_config(&content))
        .unwrap_or_default()
}

fn parse_config(content: &str) -> Option<AppConfig> {
    match toml::from_str(content) {
        Ok(cfg) => Some(cfg),
        Err(err) => {
            tracing::warn!("Ignoring unreadable config.toml: {}", err);
            None
        }
    }
}

/// Saves the application configuration to config.toml.
pub fn save_config(cfg: &AppConfig) -> io::Result<()> {
    let path = default_config_path().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Could not determine config path")
    })?;
    let content = toml::to_string_pretty(cfg).map_err(io::Error::other)?;
    fs::write(path, content)
}
