//! Logging and observability
//!
//! This module provides:
//! - Structured `tracing` output to the console and optional JSON log files
//! - The [`activity`] log the orchestrator reports workflow events and timers to
//!
//! # Example
//!
//! ```no_run
//! use courier::logging::init_logging;
//! use courier::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(format = "pdf", "Export requested");
//! ```

pub mod activity;
pub mod structured;

// Re-export commonly used items
pub use activity::{ActivityLog, ActivityTimer, RecordingActivityLog, TracingActivityLog};
pub use structured::{init_logging, LoggingGuard};

/// Log a rejected workflow stage with its reason code
///
/// # Example
///
/// ```no_run
/// use courier::log_rejection;
/// use courier::domain::Rejection;
///
/// let rejection = Rejection::new("network-error");
/// log_rejection!("upload", &rejection);
/// ```
#[macro_export]
macro_rules! log_rejection {
    ($stage:expr, $rejection:expr) => {
        tracing::warn!(
            stage = $stage,
            reason = %$rejection,
            "Workflow stage rejected"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::Rejection;

    #[test]
    fn test_log_rejection_borrows_rejection() {
        let rejection = Rejection::new("network-error");
        crate::log_rejection!("upload", &rejection);
        assert_eq!(rejection.reason(), "network-error");
    }
}
