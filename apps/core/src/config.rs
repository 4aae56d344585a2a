use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::hotkey::{parse_hotkey, DEFAULT_PALETTE_HOTKEY};

const APP_DIR_NAME: &str = "lexsearch";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub hotkey: String,
    pub debounce_ms: u64,
    pub cache_capacity: u64,
    pub cache_ttl_secs: Option<u64>,
    pub recent_limit: usize,
    pub remote_endpoint: String,
    pub remote_timeout_ms: u64,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hotkey: DEFAULT_PALETTE_HOTKEY.to_string(),
            debounce_ms: 300,
            cache_capacity: 100,
            cache_ttl_secs: None,
            recent_limit: 5,
            remote_endpoint: String::new(),
            remote_timeout_ms: 5_000,
            config_path: default_config_path(),
        }
    }
}

impl Config {
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub fn stable_app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("LEXSEARCH_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    let base = std::env::var_os("APPDATA")
        .or_else(|| std::env::var_os("XDG_DATA_HOME"))
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share")))
        .unwrap_or_else(std::env::temp_dir);
    base.join(APP_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    stable_app_data_dir().join(CONFIG_FILE_NAME)
}

/// Reads TOML, or JSON5 for `.json`/`.json5` files. A missing file yields
/// defaults bound to that path.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Config {
                config_path: path,
                ..Config::default()
            });
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };

    let mut cfg: Config = match extension(&path).as_deref() {
        Some("json") | Some("json5") => json5::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?,
        _ => toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?,
    };
    cfg.config_path = path;
    validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = cfg.config_path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let encoded = toml::to_string_pretty(cfg)?;
    fs::write(&cfg.config_path, encoded).map_err(|source| ConfigError::Io {
        path: cfg.config_path.clone(),
        source,
    })
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if !(50..=2_000).contains(&cfg.debounce_ms) {
        return Err("debounce_ms must be between 50 and 2000".into());
    }

    if !(1..=10_000).contains(&cfg.cache_capacity) {
        return Err("cache_capacity must be between 1 and 10000".into());
    }

    if cfg.cache_ttl_secs == Some(0) {
        return Err("cache_ttl_secs must be positive when set".into());
    }

    if !(1..=50).contains(&cfg.recent_limit) {
        return Err("recent_limit must be between 1 and 50".into());
    }

    if !(100..=60_000).contains(&cfg.remote_timeout_ms) {
        return Err("remote_timeout_ms must be between 100 and 60000".into());
    }

    let endpoint = cfg.remote_endpoint.trim();
    if !endpoint.is_empty() && !endpoint.starts_with("http://") && !endpoint.starts_with("https://")
    {
        return Err("remote_endpoint must be an http(s) URL".into());
    }

    parse_hotkey(&cfg.hotkey).map_err(|e| format!("hotkey: {e}"))?;

    if cfg.config_path.as_os_str().is_empty() {
        return Err("config_path is required".into());
    }

    Ok(())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
