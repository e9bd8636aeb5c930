//! Export workflow data model
//!
//! Requests, the signed configuration issued per request, and the result
//! object handed back to callers.

use super::errors::ExportFailure;
use super::ids::{ExportFormat, FileId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Open mapping of caller-supplied export properties
pub type ExportProperties = Map<String, Value>;

/// Content produced by an exporter
pub type ExportContent = Map<String, Value>;

/// Open mapping returned on success; always carries [`OUTPUT_URL`]
pub type ExportResult = Map<String, Value>;

/// Key of the signed output URL in every result
pub const OUTPUT_URL: &str = "output-url";

/// Key of the published HTML index added by result processors
pub const INDEX_HTML: &str = "index-html";

/// Key of the downloadable archive added by result processors
pub const ARCHIVE_ZIP: &str = "archive-zip";

/// Outcome of one export workflow
pub type WorkflowOutcome = std::result::Result<ExportSuccess, ExportFailure>;

/// One export invocation
///
/// Immutable once the workflow starts; discarded when the workflow ends.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    /// Registry key of the exporter
    pub format: ExportFormat,

    /// Properties merged over the exported content
    pub export_properties: ExportProperties,
}

impl ExportRequest {
    /// Creates a request without properties
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            export_properties: ExportProperties::new(),
        }
    }

    /// Sets the export properties
    pub fn with_properties(mut self, properties: ExportProperties) -> Self {
        self.export_properties = properties;
        self
    }

    /// Builds the upload payload from exported content
    ///
    /// Shallow merge: top-level property keys replace content keys wholesale.
    pub fn merge_payload(&self, exported: ExportContent) -> ExportContent {
        let mut payload = exported;
        for (key, value) in &self.export_properties {
            payload.insert(key.clone(), value.clone());
        }
        payload
    }

    /// Builds the post-processor input for a signed output URL
    pub fn result_seed(&self, signed_output_url: &str) -> ExportResult {
        let mut seed = ExportResult::new();
        seed.insert(
            OUTPUT_URL.to_string(),
            Value::String(signed_output_url.to_string()),
        );
        for (key, value) in &self.export_properties {
            seed.insert(key.clone(), value.clone());
        }
        seed
    }
}

/// Where and how the payload is uploaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UploadDestination {
    /// Signed upload URL
    pub url: String,

    /// Headers that are part of the signature
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Signed configuration for one export
///
/// Fetched fresh per request and treated as opaque by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfiguration {
    /// Opaque upload identifier
    pub upload_identifier: FileId,

    /// Upload target
    pub upload_destination: UploadDestination,

    /// URL of the generated output once available
    pub signed_output_url: String,

    /// Listing that becomes non-empty when generation fails
    pub signed_error_list_url: String,

    /// Listing that becomes non-empty when the output is ready
    pub signed_output_list_url: String,
}

/// Options passed to the storage upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadOptions {
    /// Keep the uploaded content private
    pub is_private: bool,
}

/// Successful outcome of an export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSuccess {
    /// Processed (and possibly decorated) result object
    pub result: ExportResult,

    /// Upload identifier
    pub file_id: FileId,
}

impl ExportSuccess {
    /// Signed output URL of the result
    pub fn output_url(&self) -> Option<&str> {
        self.result.get(OUTPUT_URL).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(properties: Value) -> ExportRequest {
        let properties = properties.as_object().cloned().unwrap_or_default();
        ExportRequest::new(ExportFormat::new("pdf").unwrap()).with_properties(properties)
    }

    #[test]
    fn test_merge_payload_properties_win() {
        let exported = json!({"a": 1, "b": 2}).as_object().cloned().unwrap();
        let payload = request(json!({"b": 3, "c": 4})).merge_payload(exported);

        assert_eq!(Value::Object(payload), json!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn test_merge_payload_is_shallow() {
        let exported = json!({"export": {"title": "Map", "theme": "dark"}})
            .as_object()
            .cloned()
            .unwrap();
        let payload =
            request(json!({"export": {"orientation": "landscape"}})).merge_payload(exported);

        assert_eq!(
            Value::Object(payload),
            json!({"export": {"orientation": "landscape"}})
        );
    }

    #[test]
    fn test_result_seed_contains_output_url_and_properties() {
        let seed = request(json!({"export": {"title": "T"}})).result_seed("https://out/x.pdf");

        assert_eq!(seed[OUTPUT_URL], json!("https://out/x.pdf"));
        assert_eq!(seed["export"], json!({"title": "T"}));
    }

    #[test]
    fn test_configuration_wire_names() {
        let config: ExportConfiguration = serde_json::from_value(json!({
            "uploadIdentifier": "F1",
            "uploadDestination": {"url": "https://up", "headers": {"x-amz-meta": "1"}},
            "signedOutputUrl": "https://out",
            "signedErrorListUrl": "https://err-list",
            "signedOutputListUrl": "https://out-list"
        }))
        .unwrap();

        assert_eq!(config.upload_identifier.as_str(), "F1");
        assert_eq!(config.upload_destination.headers.len(), 1);
        assert_eq!(config.signed_output_list_url, "https://out-list");
    }

    #[test]
    fn test_success_output_url() {
        let success = ExportSuccess {
            result: request(json!({})).result_seed("https://out"),
            file_id: FileId::new("F1").unwrap(),
        };
        assert_eq!(success.output_url(), Some("https://out"));
    }
}
