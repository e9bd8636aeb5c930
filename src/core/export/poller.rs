//! Dual poller: races the error-list poll against the output-list poll
//!
//! Both loops run concurrently on the caller's task with their own cadence.
//! They share the workflow's stop predicate, the first decisive result wins,
//! and the losing loop is dropped before it can schedule another check.

use super::signal::ExportSignal;
use crate::adapters::traits::{PollOptions, PollOutcome, StorageTransport};
use crate::config::PollingConfig;
use crate::domain::{ExportConfiguration, Rejection};
use std::sync::Arc;
use std::time::Duration;

/// Check cadence of the two polling loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    /// Delay between checks of the output listing
    pub output: Duration,

    /// Delay between checks of the error listing
    pub error: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            output: Duration::from_millis(2500),
            error: Duration::from_millis(15000),
        }
    }
}

impl From<&PollingConfig> for PollIntervals {
    fn from(config: &PollingConfig) -> Self {
        Self {
            output: Duration::from_millis(config.output_interval_ms),
            error: Duration::from_millis(config.error_interval_ms),
        }
    }
}

/// First decisive result of the race
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollVerdict {
    /// The output listing produced a payload
    OutputReady,
    /// The error listing produced a payload
    GenerationFailed,
    /// The output poll rejected (timeout or transport)
    OutputRejected(Rejection),
    /// The workflow was settled elsewhere while polling
    Stopped,
}

/// Runs the error-list and output-list polls against one storage transport
#[derive(Clone)]
pub struct DualPoller {
    storage: Arc<dyn StorageTransport>,
    intervals: PollIntervals,
}

impl DualPoller {
    pub fn new(storage: Arc<dyn StorageTransport>, intervals: PollIntervals) -> Self {
        Self { storage, intervals }
    }

    pub fn intervals(&self) -> PollIntervals {
        self.intervals
    }

    /// Polls both listings of `config` until one of them decides
    ///
    /// A rejection of the error-list poll is not decisive: the error channel
    /// running out of time says nothing about the output, so the race keeps
    /// waiting on the output poll. When both loops become ready in the same
    /// tick the error listing wins.
    pub async fn race(&self, config: &ExportConfiguration, signal: &ExportSignal) -> PollVerdict {
        let error_options =
            PollOptions::new(self.intervals.error).with_stop(signal.stop_predicate());
        let output_options =
            PollOptions::new(self.intervals.output).with_stop(signal.stop_predicate());

        let error_poll = self
            .storage
            .poll(&config.signed_error_list_url, error_options);
        let output_poll = self
            .storage
            .poll(&config.signed_output_list_url, output_options);
        tokio::pin!(error_poll, output_poll);

        let mut error_open = true;
        loop {
            tokio::select! {
                biased;

                result = &mut error_poll, if error_open => {
                    error_open = false;
                    match result {
                        Ok(PollOutcome::Found) => return PollVerdict::GenerationFailed,
                        Ok(PollOutcome::Stopped) => {
                            tracing::debug!("Error-list poll stopped");
                        }
                        Err(rejection) => {
                            tracing::debug!(
                                reason = %rejection,
                                "Error-list poll ended without finding errors"
                            );
                        }
                    }
                }
                result = &mut output_poll => {
                    return match result {
                        Ok(PollOutcome::Found) => PollVerdict::OutputReady,
                        Ok(PollOutcome::Stopped) => PollVerdict::Stopped,
                        Err(rejection) => PollVerdict::OutputRejected(rejection),
                    };
                }
            }
        }
    }
}
