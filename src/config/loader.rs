//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::CourierConfig;
use super::secret_string;
use crate::domain::errors::CourierError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into CourierConfig
/// 4. Applies environment variable overrides (COURIER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use courier::config::loader::load_config;
///
/// let config = load_config("courier.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CourierConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CourierError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CourierError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text the same way [`load_config`] parses a file
pub fn parse_config(contents: &str) -> Result<CourierConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: CourierConfig = toml::from_str(&contents)
        .map_err(|e| CourierError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        CourierError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied unchanged.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_pattern();
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    cap[0].to_string()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(CourierError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(val) => val.trim().parse().map(Some).map_err(|_| {
            CourierError::Configuration(format!("Invalid value for {name}: '{val}'"))
        }),
        Err(_) => Ok(None),
    }
}

/// Applies environment variable overrides using COURIER_* prefix
///
/// Environment variables follow the pattern: COURIER_<SECTION>_<KEY>
/// For example: COURIER_SERVICE_BASE_URL, COURIER_POLLING_TIMEOUT_MS
fn apply_env_overrides(config: &mut CourierConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("COURIER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(dry_run) = env_parse("COURIER_APPLICATION_DRY_RUN")? {
        config.application.dry_run = dry_run;
    }

    // Service overrides
    if let Ok(val) = std::env::var("COURIER_SERVICE_BASE_URL") {
        config.service.base_url = val;
    }
    if let Ok(val) = std::env::var("COURIER_SERVICE_API_KEY") {
        config.service.api_key = Some(secret_string(val));
    }
    if let Some(timeout) = env_parse("COURIER_SERVICE_TIMEOUT_SECONDS")? {
        config.service.timeout_seconds = timeout;
    }
    if let Some(retries) = env_parse("COURIER_SERVICE_RETRY_MAX_RETRIES")? {
        config.service.retry.max_retries = retries;
    }

    // Polling overrides
    if let Some(interval) = env_parse("COURIER_POLLING_OUTPUT_INTERVAL_MS")? {
        config.polling.output_interval_ms = interval;
    }
    if let Some(interval) = env_parse("COURIER_POLLING_ERROR_INTERVAL_MS")? {
        config.polling.error_interval_ms = interval;
    }
    if let Some(timeout) = env_parse("COURIER_POLLING_TIMEOUT_MS")? {
        config.polling.timeout_ms = timeout;
    }

    // Share overrides
    if let Ok(val) = std::env::var("COURIER_SHARE_FACEBOOK_APP_ID") {
        config.share.facebook_app_id = Some(val);
    }

    // Logging overrides
    if let Some(enabled) = env_parse("COURIER_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = enabled;
    }
    if let Ok(val) = std::env::var("COURIER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
