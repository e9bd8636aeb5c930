// Courier - Export workflow orchestrator
// Copyright (c) 2025 Courier Contributors
// Licensed under the MIT License

//! # Courier - export workflow orchestration
//!
//! Courier drives long-running document exports against a remote generation
//! service: it produces the content for a format, asks for a signed export
//! configuration, uploads the payload, then races an error listing against an
//! output listing until one of them decides the outcome.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Producing** export content through a format-keyed [`core::registry`]
//! - **Uploading** the merged payload to a signed destination
//! - **Polling** the error and output listings at independent cadences
//! - **Post-processing** and **decorating** the result with share and mail links
//!
//! ## Architecture
//!
//! Courier follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Orchestration, polling, registry, processors and decorators
//! - [`adapters`] - Collaborators (HTTP export service, signed storage, in-memory)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and the activity log
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use courier::adapters::http::{HttpConfigurationGenerator, HttpStorage};
//! use courier::config::load_config;
//! use courier::core::export::{ExportOrchestrator, PollIntervals};
//! use courier::core::registry::{ExporterRegistry, StaticExporter};
//! use courier::domain::ExportFormat;
//! use courier::logging::TracingActivityLog;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("courier.toml")?;
//!     let pdf = ExportFormat::new("pdf")?;
//!
//!     let registry = ExporterRegistry::builder()
//!         .simple(pdf.clone(), StaticExporter::new(serde_json::Map::new()))
//!         .build();
//!
//!     let orchestrator = ExportOrchestrator::new(
//!         registry,
//!         Arc::new(HttpConfigurationGenerator::new(&config.service)?),
//!         Arc::new(HttpStorage::from_config(&config.service, &config.polling)?),
//!         Arc::new(TracingActivityLog),
//!     )
//!     .with_intervals(PollIntervals::from(&config.polling));
//!
//!     let mut task = orchestrator.start_export(pdf, None);
//!     while let Some(message) = task.next_progress().await {
//!         println!("{message}");
//!     }
//!
//!     match task.outcome().await {
//!         Ok(success) => println!("Ready: {:?}", success.output_url()),
//!         Err(failure) => println!("Failed: {failure}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Workflow failures are values: every export ends in one
//! [`domain::WorkflowOutcome`], and an [`domain::ExportFailure`] names the
//! stage that failed and the collaborator's reason code. Setup errors
//! (configuration, HTTP clients, I/O) use [`domain::CourierError`].
//!
//! ## Logging
//!
//! Courier uses structured logging with the `tracing` crate; the orchestrator
//! additionally reports workflow events and timers to an
//! [`logging::ActivityLog`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
