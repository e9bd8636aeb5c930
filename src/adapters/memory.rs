//! In-memory collaborators
//!
//! A configuration generator and a storage transport that never leave the
//! process. `courier export --dry-run` drives the real orchestrator against
//! them, and the test suites script their behaviour per URL.

use super::traits::{
    ConfigurationGenerator, PollOptions, PollOutcome, StorageTransport, UploadProgress,
};
use crate::domain::{
    ExportConfiguration, ExportFormat, FileId, Rejection, UploadDestination, UploadOptions,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Configuration generator issuing `mem://` URLs
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigurationGenerator {
    file_id: Option<FileId>,
    rejection: Option<Rejection>,
    requests: Arc<AtomicUsize>,
}

impl MemoryConfigurationGenerator {
    /// Creates a generator issuing a fresh UUID file id per request
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the given file id instead of a random one
    pub fn with_file_id(mut self, file_id: FileId) -> Self {
        self.file_id = Some(file_id);
        self
    }

    /// Rejects every request with `reason`
    pub fn rejecting(mut self, reason: impl Into<String>) -> Self {
        self.rejection = Some(Rejection::new(reason));
        self
    }

    /// Number of configuration requests received
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Configuration issued for `file_id` and `format`
    pub fn configuration_for(file_id: &FileId, format: &ExportFormat) -> ExportConfiguration {
        let base = format!("mem://{}/{}", format, file_id);
        ExportConfiguration {
            upload_identifier: file_id.clone(),
            upload_destination: UploadDestination {
                url: format!("{base}/in.json"),
                headers: Default::default(),
            },
            signed_output_url: format!("{base}/out.{format}"),
            signed_error_list_url: format!("{base}/errors"),
            signed_output_list_url: format!("{base}/outputs"),
        }
    }
}

#[async_trait]
impl ConfigurationGenerator for MemoryConfigurationGenerator {
    async fn generate_export_configuration(
        &self,
        format: &ExportFormat,
    ) -> Result<ExportConfiguration, Rejection> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(rejection) = &self.rejection {
            return Err(rejection.clone());
        }

        let file_id = match &self.file_id {
            Some(file_id) => file_id.clone(),
            None => FileId::new(uuid::Uuid::new_v4().to_string()).map_err(Rejection::new)?,
        };
        Ok(Self::configuration_for(&file_id, format))
    }
}

/// Scripted behaviour of one polled listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollScript {
    /// The n-th check finds a payload
    FoundAfter(usize),
    /// The listing stays empty forever
    Never,
    /// After n empty checks the poll rejects with the reason
    RejectAfter(usize, String),
}

/// One upload received by [`MemoryStorage`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpload {
    pub content: String,
    pub destination: String,
    pub options: UploadOptions,
    pub received_at: DateTime<Utc>,
}

/// Storage transport that keeps uploads in memory and plays poll scripts
///
/// Scripts are matched against the polled URL exactly or as a suffix, so a
/// script for `/outputs` applies to every generated output listing. URLs
/// without a script behave like [`PollScript::Never`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    scripts: Arc<Vec<(String, PollScript)>>,
    upload_rejection: Option<Rejection>,
    uploads: Arc<Mutex<Vec<RecordedUpload>>>,
    checks: Arc<Mutex<HashMap<String, usize>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose output listings fill after the first check
    pub fn succeeding() -> Self {
        Self::new()
            .with_script("/outputs", PollScript::FoundAfter(1))
            .with_script("/errors", PollScript::Never)
    }

    /// Adds a poll script for URLs equal to or ending with `pattern`
    pub fn with_script(mut self, pattern: impl Into<String>, script: PollScript) -> Self {
        Arc::make_mut(&mut self.scripts).push((pattern.into(), script));
        self
    }

    /// Rejects every upload with `reason`
    pub fn rejecting_uploads(mut self, reason: impl Into<String>) -> Self {
        self.upload_rejection = Some(Rejection::new(reason));
        self
    }

    /// Uploads received so far
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads
            .lock()
            .map(|uploads| uploads.clone())
            .unwrap_or_default()
    }

    /// Number of checks issued against `url`
    pub fn checks(&self, url: &str) -> usize {
        self.checks
            .lock()
            .map(|checks| checks.get(url).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Number of checks issued against any URL
    pub fn total_checks(&self) -> usize {
        self.checks
            .lock()
            .map(|checks| checks.values().sum())
            .unwrap_or(0)
    }

    fn script_for(&self, url: &str) -> PollScript {
        self.scripts
            .iter()
            .find(|(pattern, _)| url == pattern || url.ends_with(pattern.as_str()))
            .map(|(_, script)| script.clone())
            .unwrap_or(PollScript::Never)
    }

    fn record_check(&self, url: &str) -> usize {
        match self.checks.lock() {
            Ok(mut checks) => {
                let count = checks.entry(url.to_string()).or_insert(0);
                *count += 1;
                *count
            }
            Err(_) => 0,
        }
    }
}

#[async_trait]
impl StorageTransport for MemoryStorage {
    async fn upload(
        &self,
        content: String,
        destination: &UploadDestination,
        options: UploadOptions,
        on_progress: UploadProgress<'_>,
    ) -> Result<(), Rejection> {
        on_progress("0%");
        if let Some(rejection) = &self.upload_rejection {
            return Err(rejection.clone());
        }

        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(RecordedUpload {
                content,
                destination: destination.url.clone(),
                options,
                received_at: Utc::now(),
            });
        }
        on_progress("100%");
        Ok(())
    }

    async fn poll(&self, url: &str, options: PollOptions) -> Result<PollOutcome, Rejection> {
        let script = self.script_for(url);
        loop {
            if options.is_stopped() {
                return Ok(PollOutcome::Stopped);
            }

            let count = self.record_check(url);
            match &script {
                PollScript::FoundAfter(n) if count >= *n => return Ok(PollOutcome::Found),
                PollScript::RejectAfter(n, reason) if count >= *n => {
                    return Err(Rejection::new(reason.clone()))
                }
                _ => {}
            }

            tokio::time::sleep(options.sleep_period).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_generator_uses_fixed_file_id() {
        let generator =
            MemoryConfigurationGenerator::new().with_file_id(FileId::new("F1").unwrap());
        let format = ExportFormat::new("pdf").unwrap();

        let config = generator.generate_export_configuration(&format).await.unwrap();

        assert_eq!(config.upload_identifier.as_str(), "F1");
        assert_eq!(config.signed_output_list_url, "mem://pdf/F1/outputs");
        assert_eq!(generator.requests(), 1);
    }

    #[tokio::test]
    async fn test_generator_rejection() {
        let generator = MemoryConfigurationGenerator::new().rejecting("quota-exceeded");
        let format = ExportFormat::new("png").unwrap();

        let result = generator.generate_export_configuration(&format).await;

        assert_eq!(result, Err(Rejection::new("quota-exceeded")));
    }

    #[tokio::test]
    async fn test_upload_records_content_and_progress() {
        let storage = MemoryStorage::new();
        let progress = Mutex::new(Vec::new());
        let on_progress = |detail: &str| progress.lock().unwrap().push(detail.to_string());
        let destination = UploadDestination {
            url: "mem://in.json".to_string(),
            headers: Default::default(),
        };

        storage
            .upload(
                "{}".to_string(),
                &destination,
                UploadOptions { is_private: true },
                &on_progress,
            )
            .await
            .unwrap();

        let uploads = storage.uploads();
        assert_eq!(uploads.len(), 1);
        assert!(uploads[0].options.is_private);
        assert_eq!(*progress.lock().unwrap(), vec!["0%", "100%"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_suffix_script() {
        let storage = MemoryStorage::succeeding();
        let outcome = storage
            .poll("mem://pdf/F1/outputs", PollOptions::new(Duration::from_millis(2500)))
            .await;

        assert_eq!(outcome, Ok(PollOutcome::Found));
        assert_eq!(storage.checks("mem://pdf/F1/outputs"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_reject_after() {
        let storage = MemoryStorage::new()
            .with_script("mem://x", PollScript::RejectAfter(3, "polling-timeout".into()));
        let outcome = storage
            .poll("mem://x", PollOptions::new(Duration::from_millis(10)))
            .await;

        assert_eq!(outcome, Err(Rejection::new("polling-timeout")));
        assert_eq!(storage.checks("mem://x"), 3);
    }
}
