//! Configuration management for the AlphaESS client
//!
//! This module handles loading, validation, and management of the client
//! configuration from YAML files with support for environment variable
//! overrides of the API credentials.

use crate::error::{AlphaEssError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default Open API origin
pub const DEFAULT_BASE_URL: &str = "https://openapi.alphaess.com/api";

/// Environment variable overriding `api.app_id`
pub const APP_ID_ENV: &str = "ALPHAESS_APP_ID";

/// Environment variable overriding `api.app_secret`
pub const APP_SECRET_ENV: &str = "ALPHAESS_APP_SECRET";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Open API credentials and endpoint
    pub api: ApiConfig,

    /// Aggregation pass settings
    pub aggregation: AggregationConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// IANA timezone used to determine "today" for date-based queries.
    /// Empty means the system local timezone.
    pub timezone: String,
}

/// Open API connection parameters
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Application ID issued by the AlphaESS developer portal
    pub app_id: String,

    /// Application secret paired with the ID
    pub app_secret: String,

    /// Base URL all endpoint paths are appended to
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Aggregation pass settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Also fetch the intraday power curve for each system
    pub include_power_curve: bool,

    /// Delay between consecutive calls for one system, in milliseconds
    pub inter_call_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file (its directory receives the rolling files)
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_secret: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            include_power_curve: false,
            inter_call_delay_ms: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: "/tmp/alphaess.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            aggregation: AggregationConfig::default(),
            logging: LoggingConfig::default(),
            timezone: String::new(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl AggregationConfig {
    /// Inter-call delay as a duration
    pub fn inter_call_delay(&self) -> Duration {
        Duration::from_millis(self.inter_call_delay_ms)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        let default_paths = ["alphaess_config.yaml", "/etc/alphaess/config.yaml"];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        let mut config = Config::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Replace credentials with values from the environment when set
    pub fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var(APP_ID_ENV)
            && !id.trim().is_empty()
        {
            self.api.app_id = id.trim().to_string();
        }
        if let Ok(secret) = std::env::var(APP_SECRET_ENV)
            && !secret.trim().is_empty()
        {
            self.api.app_secret = secret.trim().to_string();
        }
    }

    /// Parse the configured timezone; `None` means system local time
    pub fn timezone(&self) -> Result<Option<chrono_tz::Tz>> {
        let name = self.timezone.trim();
        if name.is_empty() {
            return Ok(None);
        }
        name.parse::<chrono_tz::Tz>()
            .map(Some)
            .map_err(|_| AlphaEssError::validation("timezone", format!("Unknown timezone: {}", name)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.app_id.trim().is_empty() {
            return Err(AlphaEssError::validation(
                "api.app_id",
                "Application ID cannot be empty",
            ));
        }

        // Sent verbatim as a header value
        if !self.api.app_id.chars().all(|c| c.is_ascii_graphic()) {
            return Err(AlphaEssError::validation(
                "api.app_id",
                "Application ID must be visible ASCII without spaces",
            ));
        }

        if self.api.app_secret.trim().is_empty() {
            return Err(AlphaEssError::validation(
                "api.app_secret",
                "Application secret cannot be empty",
            ));
        }

        if !(self.api.base_url.starts_with("https://") || self.api.base_url.starts_with("http://"))
        {
            return Err(AlphaEssError::validation(
                "api.base_url",
                "Must be an http(s) URL",
            ));
        }

        if self.api.timeout_seconds == 0 {
            return Err(AlphaEssError::validation(
                "api.timeout_seconds",
                "Must be greater than 0",
            ));
        }

        self.timezone()?;
        crate::logging::parse_log_level(&self.logging.level)
            .map_err(|_| AlphaEssError::validation("logging.level", "Unknown log level"))?;

        Ok(())
    }
}
