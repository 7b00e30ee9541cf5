//! Configuration file parser for ~/.config/civicfeed/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are accepted but logged as warnings, since they are usually
//! typos. Values are validated after parsing and after CLI overrides.
use crate::media::MediaConfig;
use crate::query::DEFAULT_PAGE_SIZE;
use crate::util::validate_base_url;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides `api_token`.
pub const API_TOKEN_ENV: &str = "CIVICFEED_API_TOKEN";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// Every key is optional. `api_token` is masked in `Debug` output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the platform API, e.g. `http://localhost:5000`.
    pub api_base_url: String,

    /// Root of the web frontend, used to build "open in browser" links.
    pub web_base_url: Option<String>,

    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Items per page, 1..=100.
    pub page_size: u32,

    /// Quiet period before a typed search is applied.
    pub search_debounce_ms: u64,

    /// Maximum suggestions from the location typeahead.
    pub location_limit: u32,

    /// Transport-level timeout for every request.
    pub request_timeout_secs: u64,

    /// Bearer token for the API. `CIVICFEED_API_TOKEN` takes precedence.
    pub api_token: Option<String>,

    /// Media URL resolution.
    pub media: MediaConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            web_base_url: None,
            theme: "dark".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: 350,
            location_limit: 10,
            request_timeout_secs: 30,
            api_token: None,
            media: MediaConfig::default(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url)
            .field("web_base_url", &self.web_base_url)
            .field("theme", &self.theme)
            .field("page_size", &self.page_size)
            .field("search_debounce_ms", &self.search_debounce_ms)
            .field("location_limit", &self.location_limit)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("media", &self.media)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 9] = [
        "api_base_url",
        "web_base_url",
        "theme",
        "page_size",
        "search_debounce_ms",
        "location_limit",
        "request_timeout_secs",
        "api_token",
        "media",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing or empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line information
    /// - Out-of-range values → `Err(ConfigError::Invalid)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let config = Self::from_toml(&content)?;
        tracing::info!(
            path = %path.display(),
            api = %config.api_base_url,
            theme = %config.theme,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and URL shapes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.page_size) {
            return Err(ConfigError::Invalid(format!(
                "page_size must be between 1 and 100 (got {})",
                self.page_size
            )));
        }
        if self.search_debounce_ms > 5_000 {
            return Err(ConfigError::Invalid(format!(
                "search_debounce_ms must be at most 5000 (got {})",
                self.search_debounce_ms
            )));
        }
        if self.location_limit == 0 {
            return Err(ConfigError::Invalid("location_limit must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        validate_base_url(&self.api_base_url)
            .map_err(|e| ConfigError::Invalid(format!("api_base_url: {e}")))?;
        if let Some(web) = &self.web_base_url {
            validate_base_url(web).map_err(|e| ConfigError::Invalid(format!("web_base_url: {e}")))?;
        }
        self.media.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// API token, with the environment variable taking precedence.
    pub fn api_token(&self) -> Option<SecretString> {
        Self::pick_token(std::env::var(API_TOKEN_ENV).ok(), self.api_token.as_deref())
    }

    fn pick_token(env: Option<String>, file: Option<&str>) -> Option<SecretString> {
        env.filter(|t| !t.trim().is_empty())
            .or_else(|| file.filter(|t| !t.trim().is_empty()).map(str::to_string))
            .map(|t| SecretString::from(t.trim().to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
