//! Collaborator contracts consumed by the export orchestrator
//!
//! The orchestrator only talks to the outside world through these traits:
//! a configuration generator issuing signed URLs, and a storage transport
//! that uploads content and polls listings.

use crate::domain::{ExportConfiguration, ExportFormat, Rejection, UploadDestination, UploadOptions};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Predicate consulted by a poller before every check
///
/// Once it returns `true` the poller must not schedule further checks.
pub type StopPredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Callback receiving human-readable upload progress details
pub type UploadProgress<'a> = &'a (dyn Fn(&str) + Send + Sync);

/// Options for one polling loop
#[derive(Clone)]
pub struct PollOptions {
    /// Delay between two checks
    pub sleep_period: Duration,

    /// External stop signal
    pub stopped: StopPredicate,
}

impl PollOptions {
    /// Creates options that never stop on their own
    pub fn new(sleep_period: Duration) -> Self {
        Self {
            sleep_period,
            stopped: Arc::new(|| false),
        }
    }

    /// Sets the stop predicate
    pub fn with_stop(mut self, stopped: StopPredicate) -> Self {
        self.stopped = stopped;
        self
    }

    /// Evaluates the stop predicate
    pub fn is_stopped(&self) -> bool {
        (self.stopped)()
    }
}

impl fmt::Debug for PollOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollOptions")
            .field("sleep_period", &self.sleep_period)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

/// How a polling loop ended without rejecting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A payload appeared at the polled URL
    Found,
    /// The stop predicate turned true before anything was found
    Stopped,
}

/// Issues signed export configurations
#[async_trait]
pub trait ConfigurationGenerator: Send + Sync {
    /// Requests a fresh configuration for `format`
    ///
    /// # Errors
    ///
    /// Rejects with an opaque reason when the service refuses or fails.
    async fn generate_export_configuration(
        &self,
        format: &ExportFormat,
    ) -> Result<ExportConfiguration, Rejection>;
}

/// Remote store used for export input and output
#[async_trait]
pub trait StorageTransport: Send + Sync {
    /// Uploads `content` to `destination`
    ///
    /// Implementations may call `on_progress` zero or more times before
    /// settling.
    async fn upload(
        &self,
        content: String,
        destination: &UploadDestination,
        options: UploadOptions,
        on_progress: UploadProgress<'_>,
    ) -> Result<(), Rejection>;

    /// Checks `url` every `options.sleep_period` until a payload appears
    ///
    /// Resolves with [`PollOutcome::Stopped`] once `options.stopped` turns
    /// true, and rejects on timeout (`polling-timeout`) or an unrecoverable
    /// transport error.
    async fn poll(&self, url: &str, options: PollOptions) -> Result<PollOutcome, Rejection>;
}
