//! Result processor that fetches the generated JSON document

use super::{build_client, check_status, send_error};
use crate::core::process::ResultProcessor;
use crate::domain::{ExportResult, Rejection, TransportError, OUTPUT_URL};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Fetches `output-url` and merges the returned object over the result
///
/// Used for formats whose output is a JSON manifest (for example a published
/// map with `index-html` and `archive-zip` links). Keys of the fetched object
/// replace keys already in the result.
pub struct FetchResultProcessor {
    client: Client,
}

impl FetchResultProcessor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> crate::domain::Result<Self> {
        Ok(Self::new(build_client(timeout)?))
    }

    async fn fetch(&self, url: &str) -> Result<ExportResult, TransportError> {
        let response = check_status(self.client.get(url).send().await.map_err(send_error)?).await?;
        let body = response.text().await.map_err(send_error)?;

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(TransportError::InvalidResponse(
                "output document is not a JSON object".to_string(),
            )),
            Err(e) => Err(TransportError::InvalidResponse(format!("output document: {e}"))),
        }
    }
}

#[async_trait]
impl ResultProcessor for FetchResultProcessor {
    async fn process(&self, mut result: ExportResult) -> Result<ExportResult, Rejection> {
        let url = result
            .get(OUTPUT_URL)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Rejection::new("missing-output-url"))?;

        let fetched = self.fetch(&url).await.map_err(|e| {
            let rejection = Rejection::from(e);
            crate::log_rejection!("fetch-result", &rejection);
            rejection
        })?;

        result.extend(fetched);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seed(url: String) -> ExportResult {
        json!({OUTPUT_URL: url, "export": {"title": "T"}, "index-html": "stale"})
            .as_object()
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetched_keys_win() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/out/F1.json")
            .with_status(200)
            .with_body(r#"{"index-html": "https://pub/F1/index.html", "archive-zip": "https://pub/F1.zip"}"#)
            .create_async()
            .await;

        let url = format!("{}/out/F1.json", server.url());
        let result = FetchResultProcessor::new(Client::new())
            .process(seed(url.clone()))
            .await
            .unwrap();

        assert_eq!(result[OUTPUT_URL], json!(url));
        assert_eq!(result["index-html"], json!("https://pub/F1/index.html"));
        assert_eq!(result["archive-zip"], json!("https://pub/F1.zip"));
        assert_eq!(result["export"], json!({"title": "T"}));
    }

    #[tokio::test]
    async fn test_non_object_output_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/out/F1.json")
            .with_status(200)
            .with_body("[1, 2]")
            .create_async()
            .await;

        let result = FetchResultProcessor::new(Client::new())
            .process(seed(format!("{}/out/F1.json", server.url())))
            .await;

        assert_eq!(result, Err(Rejection::new("invalid-response")));
    }

    #[tokio::test]
    async fn test_missing_output_url() {
        let result = FetchResultProcessor::new(Client::new())
            .process(ExportResult::new())
            .await;

        assert_eq!(result, Err(Rejection::new("missing-output-url")));
    }
}
