//! Configuration management for devfeed.
//!
//! Configuration is read from `~/.config/devfeed/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::fetcher::DEFAULT_PAGE_SIZE;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub bookmarks: BookmarkConfig,
}

/// Content API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub page_size: u32,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dev.to/api".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 10,
            user_agent: "devfeed/0.1.0".to_string(),
        }
    }
}

/// Local bookmark storage settings.
///
/// The bookmark limit is fixed and not configurable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookmarkConfig {
    /// Database file. Defaults to `<data dir>/devfeed/devfeed.db`.
    pub database: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate(path)?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/devfeed/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("devfeed").join("config.toml"))
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        if self.api.page_size == 0 {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                reason: "api.page_size must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> String {
        r##"# devfeed configuration

[api]
# Root of the dev.to REST API
base_url = "https://dev.to/api"

# Items requested per page
page_size = 10

# Request timeout in seconds
timeout_secs = 10

user_agent = "devfeed/0.1.0"

[bookmarks]
# Database file (defaults to the platform data directory)
# database = "/path/to/devfeed.db"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config at {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}
