//! Configuration schema types
//!
//! This module defines the configuration structure for Courier.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main Courier configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional in the file and falls back to its defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CourierConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export service connection
    #[serde(default)]
    pub service: ServiceConfig,

    /// Poll cadence and timeout
    #[serde(default)]
    pub polling: PollingConfig,

    /// Share link settings used by result decorators
    #[serde(default)]
    pub share: ShareConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CourierConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        // A dry run never contacts the service
        if !self.application.dry_run {
            self.service.validate()?;
        }
        self.polling.validate()?;
        self.share.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (export against in-memory collaborators)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// Delay before the attempt following attempt number `attempt` (1-based)
    pub fn delay_for(&self, attempt: usize) -> u64 {
        let exponent = attempt.saturating_sub(1) as i32;
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        (delay as u64).min(self.max_delay_ms)
    }

    fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("service.retry.max_retries must be > 0".to_string());
        }
        if self.backoff_multiplier < 1.0 {
            return Err("service.retry.backoff_multiplier must be >= 1.0".to_string());
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(
                "service.retry.initial_delay_ms cannot exceed service.retry.max_delay_ms"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Export service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the export service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for the export service (optional)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry policy for configuration requests
    #[serde(default)]
    pub retry: RetryConfig,
}

impl ServiceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("service.base_url cannot be empty".to_string());
        }

        let url = url::Url::parse(&self.base_url).map_err(|e| {
            format!("service.base_url '{}' is not a valid URL: {}", self.base_url, e)
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err("service.base_url must start with http:// or https://".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("service.timeout_seconds must be > 0".to_string());
        }

        self.retry.validate()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
            retry: RetryConfig::default(),
        }
    }
}

/// Polling configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Delay between checks of the output listing
    #[serde(default = "default_output_interval_ms")]
    pub output_interval_ms: u64,

    /// Delay between checks of the error listing
    #[serde(default = "default_error_interval_ms")]
    pub error_interval_ms: u64,

    /// How long a listing is polled before giving up
    #[serde(default = "default_poll_timeout_ms")]
    pub timeout_ms: u64,
}

impl PollingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_interval_ms == 0 || self.error_interval_ms == 0 {
            return Err("polling intervals must be > 0".to_string());
        }
        if self.timeout_ms < self.output_interval_ms {
            return Err("polling.timeout_ms must be >= polling.output_interval_ms".to_string());
        }
        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            output_interval_ms: default_output_interval_ms(),
            error_interval_ms: default_error_interval_ms(),
            timeout_ms: default_poll_timeout_ms(),
        }
    }
}

/// Share link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Facebook application id; the Facebook decorator is off without it
    #[serde(default)]
    pub facebook_app_id: Option<String>,

    /// Where the Facebook share dialog returns to
    #[serde(default = "default_facebook_redirect_uri")]
    pub facebook_redirect_uri: String,
}

impl ShareConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(app_id) = &self.facebook_app_id {
            if app_id.trim().is_empty() {
                return Err("share.facebook_app_id cannot be blank".to_string());
            }
        }
        Ok(())
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            facebook_app_id: None,
            facebook_redirect_uri: default_facebook_redirect_uri(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://export.mindmup.com".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_output_interval_ms() -> u64 {
    2500
}

fn default_error_interval_ms() -> u64 {
    15000
}

fn default_poll_timeout_ms() -> u64 {
    120_000
}

fn default_facebook_redirect_uri() -> String {
    "https://www.mindmup.com/fb".to_string()
}

fn default_local_path() -> String {
    "/var/log/courier".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
