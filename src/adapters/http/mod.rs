//! HTTP collaborators for the remote export service
//!
//! - [`HttpConfigurationGenerator`] - requests signed export configurations
//! - [`HttpStorage`] - uploads payloads and polls signed S3 listings
//! - [`FetchResultProcessor`] - replaces the bare output URL with the JSON
//!   document published at it
//!
//! Every failure is mapped to a [`TransportError`] first and then to a
//! [`Rejection`](crate::domain::Rejection) with a stable reason code.

pub mod config_client;
pub mod fetch;
pub mod storage;

pub use config_client::HttpConfigurationGenerator;
pub use fetch::FetchResultProcessor;
pub use storage::HttpStorage;

use crate::domain::{CourierError, TransportError};
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;

/// Builds the shared HTTP client
pub(crate) fn build_client(timeout: Duration) -> Result<Client, CourierError> {
    ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(30)))
        .user_agent(concat!("courier/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CourierError::Configuration(format!("Failed to build HTTP client: {e}")))
}

/// Maps a failed send to a transport error
pub(crate) fn send_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else {
        TransportError::ConnectionFailed(e.to_string())
    }
}

/// Passes successful responses through and maps error statuses
pub(crate) async fn check_status(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    if status.is_server_error() {
        Err(TransportError::ServerError {
            status: status.as_u16(),
            message,
        })
    } else {
        Err(TransportError::ClientError {
            status: status.as_u16(),
            message,
        })
    }
}
