//! Signed-URL storage transport
//!
//! Uploads go out as a single PUT to the signed destination. Polling issues a
//! GET against a signed S3 bucket listing every `sleep_period`; the listing
//! counts as filled once it holds at least one `Contents/Key`.

use super::{build_client, check_status, send_error};
use crate::adapters::traits::{PollOptions, PollOutcome, StorageTransport, UploadProgress};
use crate::config::{PollingConfig, ServiceConfig};
use crate::domain::{ExportFailure, Rejection, TransportError, UploadDestination, UploadOptions};
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use tokio::time::Instant;

/// Storage transport talking to signed S3 URLs
pub struct HttpStorage {
    client: Client,
    poll_timeout: Duration,
}

impl HttpStorage {
    pub fn new(client: Client, poll_timeout: Duration) -> Self {
        Self {
            client,
            poll_timeout,
        }
    }

    /// Create a transport for the `[service]` and `[polling]` sections
    pub fn from_config(
        service: &ServiceConfig,
        polling: &PollingConfig,
    ) -> crate::domain::Result<Self> {
        let client = build_client(Duration::from_secs(service.timeout_seconds))?;
        Ok(Self::new(client, Duration::from_millis(polling.timeout_ms)))
    }

    fn upload_headers(
        destination: &UploadDestination,
        options: UploadOptions,
    ) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("x-amz-acl"),
            HeaderValue::from_static(if options.is_private {
                "private"
            } else {
                "public-read"
            }),
        );

        for (name, value) in &destination.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                TransportError::InvalidResponse(format!("upload header '{name}': {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                TransportError::InvalidResponse(format!("upload header value: {e}"))
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    async fn check_listing(&self, url: &str) -> Result<bool, TransportError> {
        let response = check_status(self.client.get(url).send().await.map_err(send_error)?).await?;
        let body = response.text().await.map_err(send_error)?;
        listing_has_contents(&body)
    }
}

#[async_trait]
impl StorageTransport for HttpStorage {
    async fn upload(
        &self,
        content: String,
        destination: &UploadDestination,
        options: UploadOptions,
        on_progress: UploadProgress<'_>,
    ) -> Result<(), Rejection> {
        let headers = Self::upload_headers(destination, options)?;
        let size = content.len();

        on_progress("0%");
        let response = self
            .client
            .put(&destination.url)
            .headers(headers)
            .body(content)
            .send()
            .await
            .map_err(send_error)?;
        check_status(response).await?;
        on_progress("100%");

        tracing::debug!(bytes = size, private = options.is_private, "Upload finished");
        Ok(())
    }

    async fn poll(&self, url: &str, options: PollOptions) -> Result<PollOutcome, Rejection> {
        let started = Instant::now();
        let mut checks = 0u32;

        loop {
            if options.is_stopped() {
                tracing::debug!(checks, "Poll stopped");
                return Ok(PollOutcome::Stopped);
            }
            if started.elapsed() >= self.poll_timeout {
                tracing::debug!(checks, "Poll timed out");
                return Err(Rejection::new(ExportFailure::POLLING_TIMEOUT));
            }

            checks += 1;
            match self.check_listing(url).await {
                Ok(true) => return Ok(PollOutcome::Found),
                Ok(false) => {}
                // Transient listing failures are retried until the timeout
                Err(e) => tracing::warn!(checks, error = %e, "Listing check failed"),
            }

            tokio::time::sleep(options.sleep_period).await;
        }
    }
}

/// Whether an S3 `ListBucketResult` holds at least one object key
pub fn listing_has_contents(xml: &str) -> Result<bool, TransportError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_contents = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"Contents" => in_contents = true,
                b"Key" if in_contents => return Ok(true),
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"Contents" => in_contents = false,
            Ok(Event::Eof) => return Ok(false),
            Err(e) => {
                return Err(TransportError::InvalidResponse(format!(
                    "bucket listing: {e}"
                )))
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    const EMPTY_LISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>exports</Name><Prefix>out/F1</Prefix><KeyCount>0</KeyCount><IsTruncated>false</IsTruncated>
</ListBucketResult>"#;

    const FILLED_LISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>exports</Name><Prefix>out/F1</Prefix><KeyCount>1</KeyCount>
  <Contents><Key>out/F1.pdf</Key><Size>2048</Size></Contents>
</ListBucketResult>"#;

    fn storage(timeout: Duration) -> HttpStorage {
        HttpStorage::new(Client::new(), timeout)
    }

    #[test]
    fn test_listing_detection() {
        assert!(!listing_has_contents(EMPTY_LISTING).unwrap());
        assert!(listing_has_contents(FILLED_LISTING).unwrap());
    }

    #[test]
    fn test_prefix_key_outside_contents_is_ignored() {
        let xml = "<ListBucketResult><Key>stray</Key></ListBucketResult>";
        assert!(!listing_has_contents(xml).unwrap());
    }

    #[test]
    fn test_malformed_listing() {
        assert!(listing_has_contents("<ListBucketResult><Contents></ListBucketResult>").is_err());
    }

    #[tokio::test]
    async fn test_upload_sends_signed_headers_and_acl() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/in/F1.json")
            .match_header("x-amz-acl", "private")
            .match_header("x-amz-meta-owner", "courier")
            .match_body(Matcher::Exact("{\"a\":1}".to_string()))
            .with_status(200)
            .create_async()
            .await;

        let mut destination = UploadDestination {
            url: format!("{}/in/F1.json", server.url()),
            headers: Default::default(),
        };
        destination
            .headers
            .insert("x-amz-meta-owner".to_string(), "courier".to_string());
        let progress = Mutex::new(Vec::new());
        let on_progress = |detail: &str| progress.lock().unwrap().push(detail.to_string());

        storage(Duration::from_secs(1))
            .upload(
                "{\"a\":1}".to_string(),
                &destination,
                UploadOptions { is_private: true },
                &on_progress,
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(*progress.lock().unwrap(), vec!["0%", "100%"]);
    }

    #[tokio::test]
    async fn test_upload_rejection_reason() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/in/F1.json")
            .with_status(403)
            .create_async()
            .await;

        let destination = UploadDestination {
            url: format!("{}/in/F1.json", server.url()),
            headers: Default::default(),
        };

        let result = storage(Duration::from_secs(1))
            .upload(
                "{}".to_string(),
                &destination,
                UploadOptions { is_private: false },
                &|_: &str| {},
            )
            .await;

        assert_eq!(result, Err(Rejection::new("http-403")));
    }

    #[tokio::test]
    async fn test_poll_finds_filled_listing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bucket")
            .match_query(Matcher::UrlEncoded("prefix".into(), "out/F1".into()))
            .with_status(200)
            .with_body(FILLED_LISTING)
            .create_async()
            .await;

        let outcome = storage(Duration::from_secs(5))
            .poll(
                &format!("{}/bucket?prefix=out/F1", server.url()),
                PollOptions::new(Duration::from_millis(10)),
            )
            .await;

        assert_eq!(outcome, Ok(PollOutcome::Found));
    }

    #[tokio::test]
    async fn test_poll_times_out_on_empty_listing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bucket")
            .with_status(200)
            .with_body(EMPTY_LISTING)
            .create_async()
            .await;

        let outcome = storage(Duration::from_millis(50))
            .poll(
                &format!("{}/bucket", server.url()),
                PollOptions::new(Duration::from_millis(10)),
            )
            .await;

        assert_eq!(outcome, Err(Rejection::new("polling-timeout")));
    }

    #[tokio::test]
    async fn test_poll_keeps_going_through_server_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bucket")
            .with_status(500)
            .create_async()
            .await;

        let outcome = storage(Duration::from_millis(50))
            .poll(
                &format!("{}/bucket", server.url()),
                PollOptions::new(Duration::from_millis(10)),
            )
            .await;

        assert_eq!(outcome, Err(Rejection::new("polling-timeout")));
    }

    #[tokio::test]
    async fn test_poll_stops_without_checking() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/bucket")
            .expect(0)
            .create_async()
            .await;

        let stopped = Arc::new(AtomicBool::new(true));
        let flag = stopped.clone();
        let options = PollOptions::new(Duration::from_millis(10))
            .with_stop(Arc::new(move || flag.load(Ordering::SeqCst)));

        let outcome = storage(Duration::from_secs(5))
            .poll(&format!("{}/bucket", server.url()), options)
            .await;

        mock.assert_async().await;
        assert_eq!(outcome, Ok(PollOutcome::Stopped));
    }
}
