//! Client configuration.
//!
//! Reads/writes `~/.quill/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::DEFAULT_PAGE_SIZE;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config encode: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("config invalid: {0}")]
    Invalid(String),
}

/// Client configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL (e.g. "https://blog.example.com/api").
    #[serde(default = "default_server")]
    pub server: String,

    /// Directory holding the local cache and the session store.
    /// Defaults to `~/.quill/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Items requested per page for paged listings.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// HTTP request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_server() -> String {
    "http://localhost:8080".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            data_dir: None,
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Default config file path: ~/.quill/config.toml.
    pub fn default_path() -> PathBuf {
        home_dir().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        if config.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".into()));
        }
        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the data directory, falling back to `~/.quill/data`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| home_dir().join("data"))
    }

    /// SQLite file holding cached posts, saved posts, likes and drafts.
    pub fn resolve_cache_path(&self) -> PathBuf {
        self.resolve_data_dir().join("cache.sqlite")
    }

    /// redb file holding the current session.
    pub fn resolve_session_path(&self) -> PathBuf {
        self.resolve_data_dir().join("session.redb")
    }
}

/// Return the Quill config directory (~/.quill).
fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".quill")
}
