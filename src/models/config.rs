//! Application configuration structures.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable naming the base working directory for the cache.
pub const BASE_DIR_ENV: &str = "HOOPSYNC_DIR";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Sync behavior settings
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        if !path.as_ref().exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.http.base_url)
            .map_err(|e| AppError::config(format!("http.base_url is invalid: {e}")))?;
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::config("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::config("http.timeout_secs must be > 0"));
        }
        if self.sync.start_season < 1947 {
            return Err(AppError::config("sync.start_season predates the league"));
        }
        if self.sync.db_file.trim().is_empty() {
            return Err(AppError::config("sync.db_file is empty"));
        }
        Ok(())
    }

    /// Base working directory, taken from `HOOPSYNC_DIR` (default: `.`).
    pub fn base_dir() -> PathBuf {
        env::var_os(BASE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Full path of the cache database file.
    pub fn db_path(&self) -> PathBuf {
        Self::base_dir().join(&self.sync.db_file)
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Root URL of the statistics site
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Sync behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// First season to pull when the cache is empty
    #[serde(default = "defaults::start_season")]
    pub start_season: i32,

    /// Cache database file name, relative to the base directory
    #[serde(default = "defaults::db_file")]
    pub db_file: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            start_season: defaults::start_season(),
            db_file: defaults::db_file(),
        }
    }
}

/// Season in progress as of today.
///
/// Seasons are labeled by their ending year: from October onward the
/// current season is the next calendar year.
pub fn current_season() -> i32 {
    let today = Local::now().date_naive();
    if today.month() >= 10 {
        today.year() + 1
    } else {
        today.year()
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://www.basketball-reference.com".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; hoopsync/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn start_season() -> i32 {
        2003
    }
    pub fn db_file() -> String {
        "nba.db".into()
    }
}
