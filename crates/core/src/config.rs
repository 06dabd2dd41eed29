//! Config file parsing for `~/.config/bookvibe/config.toml`.
//!
//! Missing or unreadable files fall back to defaults. `BOOKVIBE_CONFIG` points
//! at a different file. `BOOKVIBE_API_URL` and `BOOKVIBE_DATA_DIR` override the
//! file when set (see [`apply_env`]).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::{DEFAULT_BASE_URL, ITEMS_PER_PAGE};
use crate::error::ConfigError;

pub const ENV_API_URL: &str = "BOOKVIBE_API_URL";
pub const ENV_DATA_DIR: &str = "BOOKVIBE_DATA_DIR";
pub const ENV_CONFIG: &str = "BOOKVIBE_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub download: DownloadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout. Unset leaves the transport default in place.
    pub timeout_ms: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_user_agent() -> String {
    format!("bookvibe/{}", env!("CARGO_PKG_VERSION"))
}
fn default_items_per_page() -> u32 {
    ITEMS_PER_PAGE
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: None,
            user_agent: default_user_agent(),
            items_per_page: ITEMS_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where preferences are kept. Defaults to the platform data dir.
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_download_template")]
    pub template: String,
    pub output_dir: Option<String>,
}

fn default_download_template() -> String {
    "{title}.{ext}".to_string()
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            template: default_download_template(),
            output_dir: None,
        }
    }
}

/// Load config from [`config_path`].
pub fn load_config() -> AppConfig {
    let path = match config_path() {
        Some(p) => p,
        None => return AppConfig::default(),
    };

    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return AppConfig::default(),
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
            AppConfig::default()
        }
    }
}

/// Config file path: `BOOKVIBE_CONFIG` if set, else the platform config dir.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(ENV_CONFIG).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|mut p| {
        p.push("bookvibe");
        p.push("config.toml");
        p
    })
}

/// Apply environment overrides on top of a loaded config.
pub fn apply_env(cfg: &mut AppConfig) {
    if let Ok(url) = std::env::var(ENV_API_URL) {
        cfg.api.base_url = url;
    }
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        cfg.storage.data_dir = Some(dir);
    }
}

/// Directory holding the preference files.
pub fn data_dir(storage: &StorageConfig) -> Option<PathBuf> {
    match &storage.data_dir {
        Some(dir) => Some(PathBuf::from(dir)),
        None => dirs::data_local_dir().map(|p| p.join("bookvibe")),
    }
}

/// Set a dot-separated key (e.g. `api.timeout_ms`) from its string form.
pub fn set_config_key(cfg: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    };
    let parts: Vec<&str> = key.splitn(2, '.').collect();
    match parts.as_slice() {
        ["api", sub] => match *sub {
            "base_url" => cfg.api.base_url = value.to_string(),
            "timeout_ms" => cfg.api.timeout_ms = Some(value.parse().map_err(|_| invalid())?),
            "user_agent" => cfg.api.user_agent = value.to_string(),
            "items_per_page" => {
                let n: u32 = value.parse().map_err(|_| invalid())?;
                if n == 0 {
                    return Err(invalid());
                }
                cfg.api.items_per_page = n;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        },
        ["storage", "data_dir"] => cfg.storage.data_dir = Some(value.to_string()),
        ["download", sub] => match *sub {
            "template" => cfg.download.template = value.to_string(),
            "output_dir" => cfg.download.output_dir = Some(value.to_string()),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        },
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    }
    Ok(())
}
