//! Export configuration client
//!
//! Asks the export service for a fresh set of signed URLs. Connection
//! failures, timeouts and 5xx responses are retried with exponential backoff;
//! anything else rejects immediately.

use super::{build_client, check_status, send_error};
use crate::adapters::traits::ConfigurationGenerator;
use crate::config::{RetryConfig, SecretString, ServiceConfig};
use crate::domain::{ExportConfiguration, ExportFormat, Rejection, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct ConfigurationRequest<'a> {
    format: &'a str,
}

/// Configuration generator backed by the export service
///
/// # Example
///
/// ```no_run
/// use courier::adapters::http::HttpConfigurationGenerator;
/// use courier::adapters::traits::ConfigurationGenerator;
/// use courier::config::ServiceConfig;
/// use courier::domain::ExportFormat;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let generator = HttpConfigurationGenerator::new(&ServiceConfig::default())?;
/// let config = generator
///     .generate_export_configuration(&ExportFormat::new("pdf")?)
///     .await?;
/// println!("upload to {}", config.upload_destination.url);
/// # Ok(())
/// # }
/// ```
pub struct HttpConfigurationGenerator {
    endpoint: String,
    api_key: Option<SecretString>,
    retry: RetryConfig,
    client: Client,
}

impl HttpConfigurationGenerator {
    /// Create a generator for the `[service]` section
    pub fn new(config: &ServiceConfig) -> crate::domain::Result<Self> {
        let client = build_client(Duration::from_secs(config.timeout_seconds))?;
        Ok(Self {
            endpoint: format!(
                "{}/exports/configuration",
                config.base_url.trim_end_matches('/')
            ),
            api_key: config.api_key.clone(),
            retry: config.retry.clone(),
            client,
        })
    }

    async fn request_once(
        &self,
        format: &ExportFormat,
    ) -> Result<ExportConfiguration, TransportError> {
        let mut request = self.client.post(&self.endpoint).json(&ConfigurationRequest {
            format: format.as_str(),
        });
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret().as_str());
        }

        let response = check_status(request.send().await.map_err(send_error)?).await?;
        let body = response.text().await.map_err(send_error)?;

        serde_json::from_str(&body).map_err(|e| {
            TransportError::InvalidResponse(format!("export configuration: {e}"))
        })
    }

    /// Retry a request with exponential backoff
    async fn retry_request(
        &self,
        format: &ExportFormat,
    ) -> Result<ExportConfiguration, TransportError> {
        let max_retries = self.retry.max_retries.max(1);
        let mut attempt = 0;

        loop {
            match self.request_once(format).await {
                Ok(config) => return Ok(config),
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_retries || !e.is_retryable() {
                        return Err(e);
                    }

                    let delay_ms = self.retry.delay_for(attempt);
                    tracing::warn!(
                        attempt = attempt,
                        max_retries = max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Retrying configuration request after error"
                    );

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}

#[async_trait]
impl ConfigurationGenerator for HttpConfigurationGenerator {
    async fn generate_export_configuration(
        &self,
        format: &ExportFormat,
    ) -> Result<ExportConfiguration, Rejection> {
        tracing::debug!(
            format = %format,
            endpoint = %self.endpoint,
            "Requesting export configuration"
        );

        self.retry_request(format).await.map_err(|e| {
            tracing::error!(format = %format, error = %e, "Export configuration request failed");
            Rejection::from(e)
        })
    }
}
