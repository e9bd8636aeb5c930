//! Domain models and types for Courier.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`FileId`], [`ExportFormat`])
//! - **Workflow data** ([`ExportRequest`], [`ExportConfiguration`], [`ExportSuccess`])
//! - **Error types** ([`CourierError`], [`TransportError`], [`ExportFailure`], [`Rejection`])
//! - **Result type alias** ([`Result`])
//!
//! # Workflow Outcome
//!
//! Every export produces exactly one [`WorkflowOutcome`]:
//!
//! ```rust
//! use courier::domain::{ExportFailure, FailureKind, FileId, WorkflowOutcome};
//!
//! let outcome: WorkflowOutcome = Err(
//!     ExportFailure::new(FailureKind::Upload, "network-error")
//!         .with_file_id(FileId::new("F2").unwrap()),
//! );
//! assert!(outcome.is_err());
//! ```

pub mod errors;
pub mod export;
pub mod ids;
pub mod pdf;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{CourierError, ExportFailure, FailureKind, Rejection, TransportError};
pub use export::{
    ExportConfiguration, ExportContent, ExportProperties, ExportRequest, ExportResult,
    ExportSuccess, UploadDestination, UploadOptions, WorkflowOutcome, ARCHIVE_ZIP, INDEX_HTML,
    OUTPUT_URL,
};
pub use ids::{ExportFormat, FileId};
pub use pdf::{Orientation, PageSize, PdfOptions};
pub use result::Result;
