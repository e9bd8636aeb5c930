//! Export orchestrator - drives one export from content to decorated result
//!
//! The workflow runs in a single task: produce content, merge properties,
//! request a signed configuration, upload, race the two listings, then hand
//! the raw result to the registered post-processor.

use super::poller::{DualPoller, PollIntervals, PollVerdict};
use super::signal::{ExportSignal, SignalState};
use crate::adapters::traits::{ConfigurationGenerator, StorageTransport};
use crate::core::registry::{ExporterRegistry, ExporterSpec};
use crate::domain::{
    ExportConfiguration, ExportFailure, ExportFormat, ExportProperties, ExportRequest,
    ExportResult, ExportSuccess, FailureKind, FileId, UploadOptions, WorkflowOutcome,
};
use crate::logging::activity::ActivityLog;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Activity log category of every export event
pub const ACTIVITY_CATEGORY: &str = "Map";

/// First progress message of every export that passes pre-flight
pub const SETTING_UP: &str = "Setting up the export";

/// Progress message sent once the upload finished
pub const PROCESSING: &str = "Processing your export";

/// Sending half of a progress channel
pub type ProgressSender = mpsc::UnboundedSender<String>;

/// Drives export workflows against one set of collaborators
#[derive(Clone)]
pub struct ExportOrchestrator {
    registry: Arc<ExporterRegistry>,
    configuration: Arc<dyn ConfigurationGenerator>,
    storage: Arc<dyn StorageTransport>,
    activity: Arc<dyn ActivityLog>,
    poller: DualPoller,
}

impl ExportOrchestrator {
    /// Create an orchestrator polling at the default cadence
    pub fn new(
        registry: ExporterRegistry,
        configuration: Arc<dyn ConfigurationGenerator>,
        storage: Arc<dyn StorageTransport>,
        activity: Arc<dyn ActivityLog>,
    ) -> Self {
        let poller = DualPoller::new(storage.clone(), PollIntervals::default());
        Self {
            registry: Arc::new(registry),
            configuration,
            storage,
            activity,
            poller,
        }
    }

    /// Replace the polling cadence
    pub fn with_intervals(mut self, intervals: PollIntervals) -> Self {
        self.poller = DualPoller::new(self.storage.clone(), intervals);
        self
    }

    pub fn registry(&self) -> &ExporterRegistry {
        &self.registry
    }

    /// Start an export in the background
    ///
    /// Must be called from within a tokio runtime. The returned task yields
    /// progress messages while the workflow runs and exactly one outcome.
    pub fn start_export(
        &self,
        format: ExportFormat,
        export_properties: Option<ExportProperties>,
    ) -> ExportTask {
        let request =
            ExportRequest::new(format).with_properties(export_properties.unwrap_or_default());
        let (progress_tx, progress_rx) = mpsc::unbounded_channel();
        let signal = ExportSignal::new();
        let state = signal.subscribe();

        let orchestrator = self.clone();
        let handle = tokio::spawn(async move {
            orchestrator.drive(request, progress_tx, signal).await
        });

        ExportTask {
            progress: progress_rx,
            state,
            handle,
        }
    }

    /// Run an export on the caller's task
    ///
    /// Progress messages go to `progress`; a closed receiver is ignored.
    pub async fn run_export(
        &self,
        request: ExportRequest,
        progress: ProgressSender,
    ) -> WorkflowOutcome {
        self.drive(request, progress, ExportSignal::new()).await
    }

    async fn drive(
        &self,
        request: ExportRequest,
        progress: ProgressSender,
        signal: ExportSignal,
    ) -> WorkflowOutcome {
        let outcome = self.execute(&request, &progress, &signal).await;

        match &outcome {
            Ok(success) => {
                signal.resolve();
                tracing::info!(
                    format = %request.format,
                    file_id = %success.file_id,
                    "Export completed"
                );
            }
            Err(failure) => {
                signal.reject();
                tracing::warn!(
                    format = %request.format,
                    kind = %failure.kind,
                    reason = %failure.reason,
                    file_id = ?failure.file_id.as_ref().map(FileId::as_str),
                    "Export failed"
                );
            }
        }
        outcome
    }

    async fn execute(
        &self,
        request: &ExportRequest,
        progress: &ProgressSender,
        signal: &ExportSignal,
    ) -> WorkflowOutcome {
        let spec = self
            .registry
            .get(&request.format)
            .ok_or_else(ExportFailure::unknown_format)?;

        let exported = spec.exporter().export();
        if exported.is_empty() {
            return Err(ExportFailure::empty());
        }
        let payload = request.merge_payload(exported);

        let event_type = request.format.event_type();
        self.activity
            .log(ACTIVITY_CATEGORY, &format!("{event_type} started"), None);
        notify(progress, SETTING_UP);

        let outcome = self
            .export_payload(request, spec, payload, progress, signal, &event_type)
            .await;

        match &outcome {
            Ok(_) => self
                .activity
                .log(ACTIVITY_CATEGORY, &format!("{event_type} completed"), None),
            Err(failure) => self.activity.log(
                ACTIVITY_CATEGORY,
                &format!("{event_type} failed"),
                Some(&failure.reason),
            ),
        }
        outcome
    }

    async fn export_payload(
        &self,
        request: &ExportRequest,
        spec: &ExporterSpec,
        payload: ExportResult,
        progress: &ProgressSender,
        signal: &ExportSignal,
        event_type: &str,
    ) -> WorkflowOutcome {
        let config = self
            .configuration
            .generate_export_configuration(&request.format)
            .await
            .map_err(|rejection| {
                crate::log_rejection!("configuration", &rejection);
                ExportFailure::new(FailureKind::Configuration, rejection.into_reason())
            })?;
        let file_id = config.upload_identifier.clone();
        tracing::debug!(file_id = %file_id, "Export configuration received");

        let content = serde_json::to_string(&payload).map_err(|e| {
            ExportFailure::new(FailureKind::Upload, format!("serialization-error: {e}"))
                .with_file_id(file_id.clone())
        })?;

        let on_progress = |detail: &str| notify(progress, &format!("Uploading {detail}"));
        self.storage
            .upload(
                content,
                &config.upload_destination,
                UploadOptions { is_private: true },
                &on_progress,
            )
            .await
            .map_err(|rejection| {
                crate::log_rejection!("upload", &rejection);
                ExportFailure::new(FailureKind::Upload, rejection.into_reason())
                    .with_file_id(file_id.clone())
            })?;

        notify(progress, PROCESSING);
        self.await_output(&config, signal, event_type)
            .await
            .map_err(|failure| failure.with_file_id(file_id.clone()))?;

        let seed = request.result_seed(&config.signed_output_url);
        let result = match spec.processor() {
            Some(processor) => processor.process(seed).await.map_err(|rejection| {
                crate::log_rejection!("post-process", &rejection);
                ExportFailure::new(FailureKind::PostProcess, rejection.into_reason())
                    .with_file_id(file_id.clone())
            })?,
            None => seed,
        };

        Ok(ExportSuccess { result, file_id })
    }

    /// Races the two listings and maps the verdict
    ///
    /// Each timer is ended only when its verdict is reached.
    async fn await_output(
        &self,
        config: &ExportConfiguration,
        signal: &ExportSignal,
        event_type: &str,
    ) -> Result<(), ExportFailure> {
        let completed = self
            .activity
            .timer(ACTIVITY_CATEGORY, &format!("{event_type}:polling-completed"));
        let timed_out = self
            .activity
            .timer(ACTIVITY_CATEGORY, &format!("{event_type}:polling-timeout"));
        let errored = self
            .activity
            .timer(ACTIVITY_CATEGORY, &format!("{event_type}:polling-error"));

        match self.poller.race(config, signal).await {
            PollVerdict::OutputReady => {
                completed.end();
                Ok(())
            }
            PollVerdict::GenerationFailed => {
                errored.end();
                Err(ExportFailure::new(
                    FailureKind::Generation,
                    ExportFailure::GENERATION_ERROR,
                ))
            }
            PollVerdict::OutputRejected(rejection)
                if rejection.reason() == ExportFailure::POLLING_TIMEOUT =>
            {
                crate::log_rejection!("output-poll", &rejection);
                timed_out.end();
                Err(ExportFailure::new(
                    FailureKind::PollTimeout,
                    rejection.into_reason(),
                ))
            }
            PollVerdict::OutputRejected(rejection) => {
                crate::log_rejection!("output-poll", &rejection);
                Err(ExportFailure::new(
                    FailureKind::PollTransport,
                    rejection.into_reason(),
                ))
            }
            // The signal only settles after the race, so a private signal
            // never stops it early
            PollVerdict::Stopped => Err(ExportFailure::new(
                FailureKind::Cancelled,
                ExportFailure::CANCELLED,
            )),
        }
    }
}

fn notify(progress: &ProgressSender, message: &str) {
    if progress.send(message.to_string()).is_err() {
        tracing::trace!(progress = message, "Progress receiver dropped");
    }
}

/// Handle of one background export
pub struct ExportTask {
    progress: mpsc::UnboundedReceiver<String>,
    state: watch::Receiver<SignalState>,
    handle: JoinHandle<WorkflowOutcome>,
}

impl ExportTask {
    /// Next progress message, or `None` once the workflow has finished
    pub async fn next_progress(&mut self) -> Option<String> {
        self.progress.recv().await
    }

    /// Current completion state
    pub fn state(&self) -> SignalState {
        *self.state.borrow()
    }

    /// Waits for the workflow and returns its outcome
    ///
    /// Progress messages not consumed yet are discarded.
    pub async fn outcome(self) -> WorkflowOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                tracing::warn!(error = %e, "Export task cancelled");
                Err(ExportFailure::new(
                    FailureKind::Cancelled,
                    ExportFailure::CANCELLED,
                ))
            }
        }
    }
}
