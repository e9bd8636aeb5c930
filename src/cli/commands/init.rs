//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "courier.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Put COURIER_API_KEY in your environment or a .env file");
                println!("  3. Validate configuration: courier validate-config");
                println!("  4. Try a dry run: courier export --dry-run --format pdf --input map.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    fn generate_minimal_config() -> &'static str {
        r#"# Courier Configuration File

[application]
log_level = "info"
dry_run = false

[service]
base_url = "https://export.mindmup.com"
api_key = "${COURIER_API_KEY}"
timeout_seconds = 30

[polling]
output_interval_ms = 2500
error_interval_ms = 15000
timeout_ms = 120000

[logging]
local_enabled = false
local_path = "/var/log/courier"
local_rotation = "daily"
"#
    }

    fn generate_config_with_examples() -> &'static str {
        r#"# Courier Configuration File
#
# Values may reference environment variables as ${NAME}. Every setting can
# also be overridden with a COURIER_<SECTION>_<KEY> variable, for example
# COURIER_POLLING_TIMEOUT_MS=60000.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (run exports against in-memory collaborators)
dry_run = false

# ============================================================================
# Export Service
# ============================================================================
[service]
# Service issuing signed export configurations
base_url = "https://export.mindmup.com"

# Bearer token (use an environment variable)
api_key = "${COURIER_API_KEY}"

# Request timeout in seconds
timeout_seconds = 30

# Retry policy for configuration requests (connection errors and 5xx only)
[service.retry]
max_retries = 3
initial_delay_ms = 500
max_delay_ms = 10000
backoff_multiplier = 2.0

# ============================================================================
# Polling
# ============================================================================
[polling]
# Delay between checks of the output listing
output_interval_ms = 2500

# Delay between checks of the error listing
error_interval_ms = 15000

# Give up on an output that never appears
timeout_ms = 120000

# ============================================================================
# Share Links
# ============================================================================
[share]
# Facebook share links are only added when an app id is set
# facebook_app_id = "${COURIER_FACEBOOK_APP_ID}"
facebook_redirect_uri = "https://www.mindmup.com/fb"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging
local_enabled = false

# Log directory
local_path = "/var/log/courier"

# Log rotation (daily, hourly or never)
local_rotation = "daily"
"#
    }
}
