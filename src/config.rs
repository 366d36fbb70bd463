//! Configuration module for ArchDrive.

use serde::Deserialize;
use std::path::Path;

use crate::{DriveError, Result};

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "ARCHDRIVE_API_URL";

/// Remote storage API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the storage service (the `/api/files` prefix is appended).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_timeout() -> u64 {
    120
}

fn default_user_agent() -> String {
    concat!("ArchDrive-Client/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    /// Create an API configuration for the given base URL with default timeouts.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Download configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadsConfig {
    /// Directory where downloaded files are saved.
    #[serde(default = "default_download_dir")]
    pub directory: String,
}

fn default_download_dir() -> String {
    "downloads".to_string()
}

impl Default for DownloadsConfig {
    fn default() -> Self {
        Self {
            directory: default_download_dir(),
        }
    }
}

/// Locale configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    /// Language code (uk / en).
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    crate::i18n::DEFAULT_LOCALE.to_string()
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/archdrive.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Storage API configuration.
    #[serde(default)]
    pub api: ApiConfig,
    /// Download configuration.
    #[serde(default)]
    pub downloads: DownloadsConfig,
    /// Locale configuration.
    #[serde(default)]
    pub locale: LocaleConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DriveError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DriveError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `ARCHDRIVE_API_URL`: Override the storage API base URL
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(API_URL_ENV) {
            if !base_url.is_empty() {
                self.api.base_url = base_url;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the API base URL does not parse or is not http(s).
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.api.base_url).map_err(|e| {
            DriveError::Config(format!("invalid api.base_url '{}': {e}", self.api.base_url))
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(DriveError::Config(format!(
                "unsupported api.base_url scheme: {scheme}"
            ))),
        }
    }
}
