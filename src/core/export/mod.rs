//! Export orchestration
//!
//! This module provides the export workflow for Courier, including:
//! - The settle-once signal shared by one workflow
//! - The dual poller racing the error and output listings
//! - The orchestrator sequencing every stage
//! - Summary and reporting

pub mod orchestrator;
pub mod poller;
pub mod signal;
pub mod summary;

pub use orchestrator::{ExportOrchestrator, ExportTask, ProgressSender};
pub use poller::{DualPoller, PollIntervals, PollVerdict};
pub use signal::{ExportSignal, SignalState};
pub use summary::ExportSummary;
