//! Export summary and reporting
//!
//! Collects what one export run produced: the progress trail, the outcome and
//! how long it took. The CLI prints it as text or JSON.

use crate::domain::{ExportFormat, ExportResult, WorkflowOutcome};
use serde::Serialize;
use std::time::Duration;

/// Summary of one export run
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// Requested format
    pub format: String,

    /// Upload identifier, once known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,

    /// Whether the export resolved
    pub success: bool,

    /// Final result object (success only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ExportResult>,

    /// Failure stage (failure only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<String>,

    /// Failure reason (failure only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Progress messages in the order they were received
    pub progress: Vec<String>,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl ExportSummary {
    /// Build a summary from a finished workflow
    pub fn from_outcome(
        format: &ExportFormat,
        outcome: &WorkflowOutcome,
        progress: Vec<String>,
        duration: Duration,
    ) -> Self {
        let mut summary = Self {
            format: format.to_string(),
            file_id: None,
            success: outcome.is_ok(),
            result: None,
            failure_kind: None,
            reason: None,
            progress,
            duration_ms: duration.as_millis() as u64,
        };

        match outcome {
            Ok(success) => {
                summary.file_id = Some(success.file_id.to_string());
                summary.result = Some(success.result.clone());
            }
            Err(failure) => {
                summary.file_id = failure.file_id.as_ref().map(ToString::to_string);
                summary.failure_kind = Some(failure.kind.to_string());
                summary.reason = Some(failure.reason.clone());
            }
        }
        summary
    }

    /// Check if the export was successful
    pub fn is_successful(&self) -> bool {
        self.success
    }

    /// Log the summary
    pub fn log_summary(&self) {
        if self.success {
            tracing::info!(
                format = %self.format,
                file_id = ?self.file_id,
                progress_messages = self.progress.len(),
                duration_ms = self.duration_ms,
                "Export summary: resolved"
            );
        } else {
            tracing::warn!(
                format = %self.format,
                file_id = ?self.file_id,
                kind = ?self.failure_kind,
                reason = ?self.reason,
                duration_ms = self.duration_ms,
                "Export summary: rejected"
            );
        }
    }
}
