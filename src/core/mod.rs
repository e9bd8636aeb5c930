//! Core business logic for Courier.
//!
//! This module contains the export engine and its pluggable parts.
//!
//! # Modules
//!
//! - [`export`] - Export orchestration, dual polling and the completion signal
//! - [`registry`] - Format-keyed exporters and their post-processors
//! - [`process`] - Result post-processors
//! - [`decorate`] - Additive result decorators
//!
//! # Export Workflow
//!
//! 1. **Produce**: Run the registered exporter and merge the caller's properties
//! 2. **Configure**: Request a signed configuration for the format
//! 3. **Upload**: Send the merged payload to the signed destination
//! 4. **Poll**: Race the error listing against the output listing
//! 5. **Process**: Run the registered post-processor (optionally decorated)
//!
//! # Example
//!
//! ```rust
//! use courier::adapters::memory::{MemoryConfigurationGenerator, MemoryStorage};
//! use courier::core::export::ExportOrchestrator;
//! use courier::core::registry::{ExporterRegistry, StaticExporter};
//! use courier::domain::ExportFormat;
//! use courier::logging::activity::TracingActivityLog;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let pdf = ExportFormat::new("pdf").unwrap();
//! let registry = ExporterRegistry::builder()
//!     .simple(pdf.clone(), StaticExporter::new(json!({"title": "T"}).as_object().cloned().unwrap()))
//!     .build();
//!
//! let orchestrator = ExportOrchestrator::new(
//!     registry,
//!     Arc::new(MemoryConfigurationGenerator::new()),
//!     Arc::new(MemoryStorage::succeeding()),
//!     Arc::new(TracingActivityLog),
//! );
//!
//! let mut task = orchestrator.start_export(pdf, None);
//! while let Some(message) = task.next_progress().await {
//!     println!("{message}");
//! }
//! assert!(task.outcome().await.is_ok());
//! # }
//! ```

pub mod decorate;
pub mod export;
pub mod process;
pub mod registry;
