//! Configuration loading, validation, and management for Parley.
//!
//! Loads configuration from `~/.parley/config.toml` with environment
//! variable overrides. Validates all settings at startup. The core only
//! consumes values — all loading mechanics live here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The root configuration structure.
///
/// Maps directly to `~/.parley/config.toml`.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Session store settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Knowledge retrieval settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// HTTP gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Weather collaborator settings
    #[serde(default)]
    pub weather: WeatherConfig,
}

/// Session store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum messages retained per session; oldest are dropped first.
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,

    /// Sessions idle longer than this are eligible for eviction.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u64,

    /// How many recent messages to feed into the prompt context.
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
}

fn default_max_messages() -> usize {
    50
}
fn default_retention_hours() -> u64 {
    24
}
fn default_recent_window() -> usize {
    2
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
            retention_hours: default_retention_hours(),
            recent_window: default_recent_window(),
        }
    }
}

/// Knowledge retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks returned per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Embedding vector dimension.
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,

    /// Directory of markdown documents to index at startup.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// Paragraphs shorter than this many characters are discarded.
    #[serde(default = "default_min_chunk_chars")]
    pub min_chunk_chars: usize,
}

fn default_top_k() -> usize {
    3
}
fn default_embedding_dim() -> usize {
    1536
}
fn default_docs_dir() -> String {
    "docs".into()
}
fn default_min_chunk_chars() -> usize {
    50
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            embedding_dim: default_embedding_dim(),
            docs_dir: default_docs_dir(),
            min_chunk_chars: default_min_chunk_chars(),
        }
    }
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Weather collaborator configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// API key for the weather service. When absent, the weather plugin
    /// answers with fixed demo data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Weather API base URL.
    #[serde(default = "default_weather_api_url")]
    pub api_url: String,

    /// Upper bound on how long one lookup may wait.
    #[serde(default = "default_weather_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_weather_api_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".into()
}
fn default_weather_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_weather_api_url(),
            timeout_secs: default_weather_timeout_secs(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("session", &self.session)
            .field("retrieval", &self.retrieval)
            .field("gateway", &self.gateway)
            .field("weather", &self.weather)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (`~/.parley/config.toml`),
    /// or from `PARLEY_CONFIG` when set.
    ///
    /// Environment overrides applied after file load:
    /// - `WEATHER_API_KEY` — weather collaborator credential
    /// - `PARLEY_PORT` — gateway port
    /// - `PARLEY_DOCS_DIR` — knowledge corpus directory
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("PARLEY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::config_dir().join("config.toml"));
        let mut config = Self::load_from(&config_path)?;

        if config.weather.api_key.is_none() {
            config.weather.api_key = std::env::var("WEATHER_API_KEY").ok();
        }

        if let Ok(port) = std::env::var("PARLEY_PORT") {
            config.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("PARLEY_PORT is not a port number: {port}"))
            })?;
        }

        if let Ok(dir) = std::env::var("PARLEY_DOCS_DIR") {
            config.retrieval.docs_dir = dir;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".parley")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.max_messages == 0 {
            return Err(ConfigError::ValidationError(
                "session.max_messages must be at least 1".into(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.top_k must be at least 1".into(),
            ));
        }

        if self.retrieval.embedding_dim == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.embedding_dim must be at least 1".into(),
            ));
        }

        if self.gateway.port == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.port must be nonzero".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}
