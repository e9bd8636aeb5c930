//! Domain error types
//!
//! This module defines the error hierarchy for Courier.
//! Workflow failures ([`ExportFailure`]) are kept apart from the crate-wide
//! [`CourierError`]: the former is an outcome surfaced to export callers, the
//! latter covers configuration, transport and I/O faults in the ambient code.

use super::ids::FileId;
use std::fmt;
use thiserror::Error;

/// Main Courier error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum CourierError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Export service / storage transport errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// HTTP transport errors
///
/// Errors raised by the HTTP collaborators. These errors don't expose
/// third-party HTTP client types.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to reach the remote endpoint
    #[error("Failed to connect: {0}")]
    ConnectionFailed(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl TransportError {
    /// Whether the request may succeed if attempted again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::ConnectionFailed(_)
                | TransportError::Timeout(_)
                | TransportError::ServerError { .. }
        )
    }

    /// Stable reason code used when this error rejects a workflow stage
    pub fn reason_code(&self) -> String {
        match self {
            TransportError::ConnectionFailed(_) => "network-error".to_string(),
            TransportError::Timeout(_) => "timeout".to_string(),
            TransportError::ServerError { status, .. }
            | TransportError::ClientError { status, .. } => format!("http-{status}"),
            TransportError::InvalidResponse(_) => "invalid-response".to_string(),
        }
    }
}

/// Opaque rejection raised by a collaborator or a result processor
///
/// The orchestrator never inspects the reason; it forwards it to the caller
/// together with the file id known at that point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct Rejection {
    reason: String,
}

impl Rejection {
    /// Creates a rejection carrying the given reason code
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Returns the reason code
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Consumes self and returns the reason code
    pub fn into_reason(self) -> String {
        self.reason
    }
}

impl From<TransportError> for Rejection {
    fn from(err: TransportError) -> Self {
        Rejection::new(err.reason_code())
    }
}

impl From<&str> for Rejection {
    fn from(reason: &str) -> Self {
        Rejection::new(reason)
    }
}

/// Stage at which an export workflow failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// No exporter registered for the requested format
    UnknownFormat,
    /// The exporter produced no content
    EmptyContent,
    /// The configuration generator rejected
    Configuration,
    /// The storage upload rejected
    Upload,
    /// The error-list poll found an error marker
    Generation,
    /// The output-list poll timed out
    PollTimeout,
    /// The output-list poll failed for another reason
    PollTransport,
    /// The registered post-processor rejected
    PostProcess,
    /// The background workflow task was aborted before it finished
    Cancelled,
}

impl FailureKind {
    /// Kebab-case label used in logs and JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::UnknownFormat => "unknown-format",
            FailureKind::EmptyContent => "empty-content",
            FailureKind::Configuration => "configuration",
            FailureKind::Upload => "upload",
            FailureKind::Generation => "generation",
            FailureKind::PollTimeout => "poll-timeout",
            FailureKind::PollTransport => "poll-transport",
            FailureKind::PostProcess => "post-process",
            FailureKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of one export workflow
///
/// `file_id` is present on every failure raised after the export
/// configuration has been obtained, and absent before that point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("export failed at {kind} stage: {reason}")]
pub struct ExportFailure {
    /// Stage that failed
    pub kind: FailureKind,

    /// Reason code (fixed for pre-flight and generation failures, propagated otherwise)
    pub reason: String,

    /// Upload identifier, once known
    pub file_id: Option<FileId>,
}

impl ExportFailure {
    /// Reason code for exporters that produced nothing
    pub const EMPTY: &'static str = "empty";

    /// Reason code for formats missing from the registry
    pub const UNKNOWN_FORMAT: &'static str = "unknown-format";

    /// Reason code for a payload found on the error list
    pub const GENERATION_ERROR: &'static str = "generation-error";

    /// Reason code for an output poll that ran out of time
    pub const POLLING_TIMEOUT: &'static str = "polling-timeout";

    /// Reason code for a workflow stopped before a verdict
    pub const CANCELLED: &'static str = "cancelled";

    /// Creates a failure without a file id
    pub fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
            file_id: None,
        }
    }

    /// Attaches the upload identifier
    pub fn with_file_id(mut self, file_id: FileId) -> Self {
        self.file_id = Some(file_id);
        self
    }

    /// Pre-flight failure for empty exporter output
    pub fn empty() -> Self {
        Self::new(FailureKind::EmptyContent, Self::EMPTY)
    }

    /// Pre-flight failure for an unregistered format
    pub fn unknown_format() -> Self {
        Self::new(FailureKind::UnknownFormat, Self::UNKNOWN_FORMAT)
    }

    /// Whether the workflow failed before any collaborator was contacted
    pub fn is_pre_flight(&self) -> bool {
        matches!(
            self.kind,
            FailureKind::EmptyContent | FailureKind::UnknownFormat
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for CourierError {
    fn from(err: std::io::Error) -> Self {
        CourierError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CourierError {
    fn from(err: serde_json::Error) -> Self {
        CourierError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CourierError {
    fn from(err: toml::de::Error) -> Self {
        CourierError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_courier_error_display() {
        let err = CourierError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_transport_error_conversion() {
        let transport_err = TransportError::ConnectionFailed("Network error".to_string());
        let courier_err: CourierError = transport_err.into();
        assert!(matches!(courier_err, CourierError::Transport(_)));
    }

    #[test]
    fn test_transport_error_reason_codes() {
        assert_eq!(
            TransportError::ConnectionFailed("reset".into()).reason_code(),
            "network-error"
        );
        assert_eq!(
            TransportError::ServerError {
                status: 503,
                message: "busy".into()
            }
            .reason_code(),
            "http-503"
        );
        assert_eq!(
            TransportError::InvalidResponse("not json".into()).reason_code(),
            "invalid-response"
        );
    }

    #[test]
    fn test_transport_error_retryable() {
        assert!(TransportError::Timeout("30s".into()).is_retryable());
        assert!(!TransportError::ClientError {
            status: 403,
            message: "forbidden".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_rejection_from_transport_error() {
        let rejection: Rejection = TransportError::Timeout("slow".into()).into();
        assert_eq!(rejection.reason(), "timeout");
        assert_eq!(rejection.to_string(), "timeout");
    }

    #[test]
    fn test_export_failure_builder() {
        let failure = ExportFailure::new(FailureKind::Upload, "network-error")
            .with_file_id(FileId::new("F2").unwrap());

        assert_eq!(failure.kind, FailureKind::Upload);
        assert_eq!(failure.reason, "network-error");
        assert_eq!(failure.file_id.as_ref().map(FileId::as_str), Some("F2"));
        assert!(!failure.is_pre_flight());
    }

    #[test]
    fn test_pre_flight_failures_have_no_file_id() {
        assert!(ExportFailure::empty().file_id.is_none());
        assert!(ExportFailure::empty().is_pre_flight());
        assert_eq!(ExportFailure::unknown_format().reason, "unknown-format");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let courier_err: CourierError = io_err.into();
        assert!(matches!(courier_err, CourierError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let courier_err: CourierError = json_err.into();
        assert!(matches!(courier_err, CourierError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let courier_err: CourierError = toml_err.into();
        assert!(matches!(courier_err, CourierError::Configuration(_)));
        assert!(courier_err.to_string().contains("TOML parse error"));
    }
}
