//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Courier configuration file.

use crate::config::load_config;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// `load_config` already validates, so a loaded file is a valid one.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let api_key = match &config.service.api_key {
            Some(key) if !key.expose_secret().is_empty() => "set",
            _ => "not set",
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Export Service: {}", config.service.base_url);
        println!("  API Key: {api_key}");
        println!("  Request Timeout: {}s", config.service.timeout_seconds);
        println!("  Max Retries: {}", config.service.retry.max_retries);
        println!(
            "  Polling: output every {}ms, errors every {}ms, timeout {}ms",
            config.polling.output_interval_ms,
            config.polling.error_interval_ms,
            config.polling.timeout_ms
        );
        println!(
            "  Facebook Sharing: {}",
            if config.share.facebook_app_id.is_some() {
                "enabled"
            } else {
                "disabled"
            }
        );
        println!();
        Ok(0)
    }
}
