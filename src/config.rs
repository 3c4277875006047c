//! Configuration module for feedrelay.

use serde::Deserialize;
use std::path::Path;

use crate::{RelayError, Result};

/// Rendering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Maximum message content length in characters.
    #[serde(default = "default_content_length_limit")]
    pub content_length_limit: usize,
    /// Deliver entries as forwarded-message bundles instead of inline.
    #[serde(default = "default_deliver_as_forward")]
    pub deliver_as_forward: bool,
}

fn default_content_length_limit() -> usize {
    1024
}

fn default_deliver_as_forward() -> bool {
    false
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            content_length_limit: default_content_length_limit(),
            deliver_as_forward: default_deliver_as_forward(),
        }
    }
}

/// HTTP client configuration shared by feed and media fetching.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum feed size in bytes.
    #[serde(default = "default_max_feed_size")]
    pub max_feed_size_bytes: u64,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    20
}

fn default_total_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

fn default_user_agent() -> String {
    "feedrelay/0.1 (RSS Relay)".to_string()
}

fn default_max_feed_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            total_timeout_secs: default_total_timeout(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            max_feed_size_bytes: default_max_feed_size(),
        }
    }
}

/// Media cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Directory for cached inline images.
    #[serde(default = "default_image_dir")]
    pub image_dir: String,
    /// Directory for cached torrent files.
    #[serde(default = "default_torrent_dir")]
    pub torrent_dir: String,
}

fn default_image_dir() -> String {
    "data/image".to_string()
}

fn default_torrent_dir() -> String {
    "data/torrent".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            image_dir: default_image_dir(),
            torrent_dir: default_torrent_dir(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path. Empty disables file logging.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/feedrelay.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Rendering configuration.
    #[serde(default)]
    pub render: RenderConfig,
    /// HTTP client configuration.
    #[serde(default)]
    pub http: HttpConfig,
    /// Media cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(RelayError::Io)?;
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
        toml::from_str(s).map_err(|e| RelayError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FEEDRELAY_LOG_LEVEL`: Override the log level
    /// - `FEEDRELAY_CACHE_DIR`: Override the image cache directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("FEEDRELAY_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
        if let Ok(dir) = std::env::var("FEEDRELAY_CACHE_DIR") {
            if !dir.is_empty() {
                self.cache.image_dir = dir;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the content length limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.render.content_length_limit == 0 {
            return Err(RelayError::Validation(
                "content_length_limit must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.render.content_length_limit, 1024);
        assert!(!config.render.deliver_as_forward);

        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.http.read_timeout_secs, 20);
        assert_eq!(config.http.total_timeout_secs, 30);
        assert_eq!(config.http.max_redirects, 5);
        assert_eq!(config.http.max_feed_size_bytes, 5 * 1024 * 1024);

        assert_eq!(config.cache.image_dir, "data/image");
        assert_eq!(config.cache.torrent_dir, "data/torrent");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/feedrelay.log");
    }

    #[test]
    fn test_parse_partial_config() {
        let config = Config::parse(
            r#"
[render]
content_length_limit = 500
deliver_as_forward = true

[cache]
image_dir = "/tmp/images"
"#,
        )
        .unwrap();

        assert_eq!(config.render.content_length_limit, 500);
        assert!(config.render.deliver_as_forward);
        assert_eq!(config.cache.image_dir, "/tmp/images");
        // Untouched sections fall back to defaults
        assert_eq!(config.http.max_redirects, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_invalid_config() {
        assert!(Config::parse("render = 42").is_err());
        assert!(Config::parse("[render]\ncontent_length_limit = \"big\"").is_err());
    }

    #[test]
    fn test_validate_zero_limit() {
        let config = Config::parse("[render]\ncontent_length_limit = 0").unwrap();
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        std::env::set_var("FEEDRELAY_LOG_LEVEL", "debug");
        config.apply_env_overrides();
        std::env::remove_var("FEEDRELAY_LOG_LEVEL");
        assert_eq!(config.logging.level, "debug");
    }
}
