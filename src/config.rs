//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::client::ClientConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            api_prefix: self.api_prefix.clone(),
            request_timeout_ms: self.request_timeout_secs.saturating_mul(1000),
        }
    }
}

/// Where the login token is kept between runs
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_file")]
    pub file: PathBuf,
}

fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("trackle").join("session.json"))
        .unwrap_or_else(|| PathBuf::from("./.trackle_session.json"))
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: default_session_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let discovery = Self::discover();
        discovery.log();
        discovery.config
    }

    /// Like [`Config::load_default`], but hands back what happened instead
    /// of logging it, for callers whose subscriber depends on the result.
    pub fn discover() -> Discovery {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("trackle").join("config.toml")),
            Some(PathBuf::from("./trackle.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::discover_in(&config_paths)
    }

    fn discover_in(config_paths: &[PathBuf]) -> Discovery {
        let mut skipped = Vec::new();

        for path in config_paths {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        return Discovery {
                            config,
                            source: Some(path.clone()),
                            skipped,
                        };
                    }
                    Err(e) => skipped.push(e),
                }
            }
        }

        Discovery {
            config: Self::from_env(),
            source: None,
            skipped,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(url) = var("TRACKLE_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(prefix) = var("TRACKLE_API_PREFIX") {
            self.api.api_prefix = prefix;
        }
        if let Some(timeout) = var("TRACKLE_REQUEST_TIMEOUT") {
            match timeout.parse() {
                Ok(secs) => self.api.request_timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid TRACKLE_REQUEST_TIMEOUT: {}", timeout),
            }
        }

        // Session overrides
        if let Some(file) = var("TRACKLE_SESSION_FILE") {
            self.session.file = PathBuf::from(file);
        }

        // Logging overrides
        if let Some(level) = var("TRACKLE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("TRACKLE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Outcome of [`Config::discover`]
#[derive(Debug)]
pub struct Discovery {
    pub config: Config,
    /// File the config came from; `None` means defaults plus environment
    pub source: Option<PathBuf>,
    /// Files that exist but could not be loaded
    pub skipped: Vec<ConfigError>,
}

impl Discovery {
    pub fn log(&self) {
        for e in &self.skipped {
            tracing::warn!("Failed to load config: {}", e);
        }
        match &self.source {
            Some(path) => tracing::debug!("Loaded config from {:?}", path),
            None => tracing::debug!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Trackle Configuration
#
# Environment variables override these settings:
# - TRACKLE_API_BASE_URL
# - TRACKLE_API_PREFIX
# - TRACKLE_REQUEST_TIMEOUT
# - TRACKLE_SESSION_FILE
# - TRACKLE_LOG_LEVEL
# - TRACKLE_LOG_FORMAT

[api]
# Trackle backend origin
base_url = "http://localhost:8080"

# Prefix for resource routes (login, register and the auth check are served without it)
api_prefix = "/api/v1"

# Request timeout in seconds
request_timeout_secs = 30

[session]
# Where the login token is stored between runs
# file = "~/.config/trackle/session.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.api_prefix, "/api/v1");
        assert_eq!(config.api.client_config().request_timeout_ms, 30_000);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.session.file.ends_with("session.json"));
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trackle.toml");
        std::fs::write(&path, "[api]\nbase_url = \"https://trackle.example\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.base_url, "https://trackle.example");
        assert_eq!(config.api.api_prefix, "/api/v1");
        assert_eq!(config.api.request_timeout_secs, 30);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[api\nbase_url = 1").unwrap();
        assert!(matches!(Config::load(&broken), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_discovery_skips_broken_files() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let missing = dir.path().join("missing.toml");
        let good = dir.path().join("trackle.toml");
        std::fs::write(&broken, "[logging\nlevel = ").unwrap();
        std::fs::write(&good, "[logging]\nlevel = \"debug\"\n").unwrap();

        let discovery = Config::discover_in(&[broken, missing, good.clone()]);
        assert_eq!(discovery.source, Some(good));
        assert_eq!(discovery.skipped.len(), 1);
        assert!(matches!(discovery.skipped[0], ConfigError::Parse { .. }));

        let nothing = Config::discover_in(&[dir.path().join("nope.toml")]);
        assert_eq!(nothing.source, None);
        assert!(nothing.skipped.is_empty());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TRACKLE_API_BASE_URL", "http://backend:9000"),
            ("TRACKLE_REQUEST_TIMEOUT", "not-a-number"),
            ("TRACKLE_SESSION_FILE", "/tmp/trackle-session.json"),
            ("TRACKLE_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://backend:9000");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.session.file, PathBuf::from("/tmp/trackle-session.json"));
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }
}
