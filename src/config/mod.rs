//! Configuration management for Courier.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Courier uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `COURIER_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use courier::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("courier.toml")?;
//!
//! println!("Export service: {}", config.service.base_url);
//! println!("Output poll every {} ms", config.polling.output_interval_ms);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run switch
//! - [`ServiceConfig`] - Export service URL, API key, timeout and retry policy
//! - [`PollingConfig`] - Output/error poll cadence and timeout
//! - [`ShareConfig`] - Share link settings for result decorators
//! - [`LoggingConfig`] - Local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [service]
//! base_url = "https://export.example.com"
//! api_key = "${COURIER_API_KEY}"
//! timeout_seconds = 30
//!
//! [polling]
//! output_interval_ms = 2500
//! error_interval_ms = 15000
//! timeout_ms = 120000
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, CourierConfig, LoggingConfig, PollingConfig, RetryConfig, ServiceConfig,
    ShareConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
