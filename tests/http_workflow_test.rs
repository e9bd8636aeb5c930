//! End-to-end workflow tests against a mock export service
//!
//! The configuration endpoint, the signed upload URL, both bucket listings
//! and the published manifest are all served by one mockito server.

use courier::adapters::http::{FetchResultProcessor, HttpConfigurationGenerator, HttpStorage};
use courier::config::{secret_string, RetryConfig, ServiceConfig, ShareConfig};
use courier::core::decorate::{
    DecoratedProcessor, DecoratorChain, EmailDecorator, FacebookShareDecorator,
    TwitterIntentDecorator,
};
use courier::core::export::{ExportOrchestrator, PollIntervals};
use courier::core::registry::{ExporterRegistry, StaticExporter};
use courier::domain::{ExportFormat, ExportRequest, FailureKind, ARCHIVE_ZIP, INDEX_HTML};
use courier::logging::RecordingActivityLog;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const EMPTY_LISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>exports</Name><KeyCount>0</KeyCount><IsTruncated>false</IsTruncated>
</ListBucketResult>"#;

const FILLED_LISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>exports</Name><KeyCount>1</KeyCount>
  <Contents><Key>out/F9.json</Key><Size>512</Size></Contents>
</ListBucketResult>"#;

fn service(server: &ServerGuard) -> ServiceConfig {
    ServiceConfig {
        base_url: server.url(),
        api_key: Some(secret_string("token-abc".to_string())),
        timeout_seconds: 5,
        retry: RetryConfig {
            max_retries: 2,
            initial_delay_ms: 1,
            max_delay_ms: 5,
            backoff_multiplier: 2.0,
        },
    }
}

async fn mock_configuration(server: &mut ServerGuard, format: &str) {
    let base = server.url();
    server
        .mock("POST", "/exports/configuration")
        .match_header("authorization", "Bearer token-abc")
        .match_body(Matcher::Json(json!({"format": format})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "uploadIdentifier": "F9",
                "uploadDestination": {"url": format!("{base}/in/F9.json"), "headers": {}},
                "signedOutputUrl": format!("{base}/out/F9.json"),
                "signedErrorListUrl": format!("{base}/errors"),
                "signedOutputListUrl": format!("{base}/outputs"),
            })
            .to_string(),
        )
        .create_async()
        .await;
}

fn intervals() -> PollIntervals {
    PollIntervals {
        output: Duration::from_millis(20),
        error: Duration::from_millis(50),
    }
}

#[tokio::test]
async fn test_publish_workflow_over_http() {
    let mut server = Server::new_async().await;
    mock_configuration(&mut server, "publish").await;

    let upload = server
        .mock("PUT", "/in/F9.json")
        .match_header("x-amz-acl", "private")
        .match_body(Matcher::Json(json!({
            "id": "root",
            "export": {"title": "Launch plan"}
        })))
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("GET", "/errors")
        .with_status(200)
        .with_body(EMPTY_LISTING)
        .create_async()
        .await;
    server
        .mock("GET", "/outputs")
        .with_status(200)
        .with_body(FILLED_LISTING)
        .create_async()
        .await;
    server
        .mock("GET", "/out/F9.json")
        .with_status(200)
        .with_body(
            json!({
                INDEX_HTML: "https://pub.example.com/F9/index.html",
                ARCHIVE_ZIP: "https://pub.example.com/F9.zip"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let share = ShareConfig {
        facebook_app_id: Some("4242".to_string()),
        ..Default::default()
    };
    let mut chain = DecoratorChain::new()
        .with(TwitterIntentDecorator)
        .with(EmailDecorator);
    if let Some(facebook) = FacebookShareDecorator::from_config(&share) {
        chain = chain.with(facebook);
    }

    let publish = ExportFormat::new("publish").unwrap();
    let registry = ExporterRegistry::builder()
        .with_processor(
            publish.clone(),
            StaticExporter::new(json!({"id": "root"}).as_object().cloned().unwrap()),
            DecoratedProcessor::new(
                FetchResultProcessor::with_timeout(Duration::from_secs(5)).unwrap(),
                chain,
            ),
        )
        .build();

    let config = service(&server);
    let orchestrator = ExportOrchestrator::new(
        registry,
        Arc::new(HttpConfigurationGenerator::new(&config).unwrap()),
        Arc::new(HttpStorage::new(reqwest::Client::new(), Duration::from_secs(5))),
        Arc::new(RecordingActivityLog::new()),
    )
    .with_intervals(intervals());

    let request = ExportRequest::new(publish)
        .with_properties(json!({"export": {"title": "Launch plan"}}).as_object().cloned().unwrap());
    let (tx, _rx) = mpsc::unbounded_channel();
    let success = orchestrator.run_export(request, tx).await.unwrap();

    upload.assert_async().await;
    assert_eq!(success.file_id.as_str(), "F9");
    assert_eq!(success.output_url(), Some(format!("{}/out/F9.json", server.url()).as_str()));
    assert_eq!(
        success.result[INDEX_HTML],
        json!("https://pub.example.com/F9/index.html")
    );
    assert!(success.result["twitter-url"]
        .as_str()
        .unwrap()
        .starts_with("https://twitter.com/intent/tweet?text=Launch%20plan&url="));
    assert!(success.result.contains_key("email-index-html"));
    assert!(success.result.contains_key("email-archive-zip"));
    assert!(success.result["facebook-url"]
        .as_str()
        .unwrap()
        .contains("app_id=4242"));
}

#[tokio::test]
async fn test_error_listing_over_http_fails_generation() {
    let mut server = Server::new_async().await;
    mock_configuration(&mut server, "pdf").await;
    server
        .mock("PUT", "/in/F9.json")
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("GET", "/errors")
        .with_status(200)
        .with_body(FILLED_LISTING)
        .create_async()
        .await;
    server
        .mock("GET", "/outputs")
        .with_status(200)
        .with_body(EMPTY_LISTING)
        .create_async()
        .await;

    let pdf = ExportFormat::new("pdf").unwrap();
    let registry = ExporterRegistry::builder()
        .simple(
            pdf.clone(),
            StaticExporter::new(json!({"id": "root"}).as_object().cloned().unwrap()),
        )
        .build();
    let config = service(&server);
    let orchestrator = ExportOrchestrator::new(
        registry,
        Arc::new(HttpConfigurationGenerator::new(&config).unwrap()),
        Arc::new(HttpStorage::new(reqwest::Client::new(), Duration::from_secs(5))),
        Arc::new(RecordingActivityLog::new()),
    )
    .with_intervals(intervals());

    let (tx, _rx) = mpsc::unbounded_channel();
    let failure = orchestrator
        .run_export(ExportRequest::new(pdf), tx)
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::Generation);
    assert_eq!(failure.reason, "generation-error");
    assert_eq!(failure.file_id.as_ref().map(|id| id.as_str()), Some("F9"));
}

#[tokio::test]
async fn test_output_listing_timeout_over_http() {
    let mut server = Server::new_async().await;
    mock_configuration(&mut server, "pdf").await;
    server
        .mock("PUT", "/in/F9.json")
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("GET", Matcher::Regex("^/(errors|outputs)$".to_string()))
        .with_status(200)
        .with_body(EMPTY_LISTING)
        .create_async()
        .await;

    let pdf = ExportFormat::new("pdf").unwrap();
    let registry = ExporterRegistry::builder()
        .simple(
            pdf.clone(),
            StaticExporter::new(json!({"id": "root"}).as_object().cloned().unwrap()),
        )
        .build();
    let config = service(&server);
    let orchestrator = ExportOrchestrator::new(
        registry,
        Arc::new(HttpConfigurationGenerator::new(&config).unwrap()),
        Arc::new(HttpStorage::new(reqwest::Client::new(), Duration::from_millis(150))),
        Arc::new(RecordingActivityLog::new()),
    )
    .with_intervals(intervals());

    let (tx, _rx) = mpsc::unbounded_channel();
    let failure = orchestrator
        .run_export(ExportRequest::new(pdf), tx)
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::PollTimeout);
    assert_eq!(failure.reason, "polling-timeout");
}
