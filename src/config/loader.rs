use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::codec::MAX_PAGE_SIZE;
use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },

    #[error("API key missing: environment variable {env_var} is not set")]
    MissingApiKey { env_var: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/tcg-browser/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("tcg-browser").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The API base URL is absolute and ends with `/`
    /// - Timeouts are non-zero
    /// - The default page size is within what the API serves
    /// - The bind address is a socket address
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = &self.api.base_url;
        if reqwest::Url::parse(base_url).is_err() {
            return Err(validation(format!("api.base_url '{}' is not a valid URL", base_url)));
        }
        if !base_url.ends_with('/') {
            return Err(validation(format!("api.base_url '{}' must end with '/'", base_url)));
        }

        if self.api.timeout_seconds == 0 || self.api.connect_timeout_seconds == 0 {
            return Err(validation("api timeouts must be greater than zero".to_string()));
        }

        let revalidate = self.cache.revalidate_seconds;
        if revalidate == 0 || revalidate > MAX_REVALIDATE_SECONDS {
            return Err(validation(format!(
                "cache.revalidate_seconds {} is out of range 1..={}",
                revalidate, MAX_REVALIDATE_SECONDS
            )));
        }

        let page_size = self.search.default_page_size;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(validation(format!(
                "search.default_page_size {} is out of range 1..={}",
                page_size, MAX_PAGE_SIZE
            )));
        }

        if self.server.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(validation(format!(
                "server.bind_addr '{}' is not a socket address",
                self.server.bind_addr
            )));
        }

        Ok(())
    }
}

/// One year.
const MAX_REVALIDATE_SECONDS: u64 = 365 * 86_400;

fn validation(message: String) -> ConfigError {
    ConfigError::ValidationError { message }
}
