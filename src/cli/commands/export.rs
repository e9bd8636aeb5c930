//! Export command implementation
//!
//! This module implements the `export` command: it registers the content read
//! from `--input` under the requested format, runs one export workflow and
//! reports the progress trail and the outcome.

use crate::adapters::http::{FetchResultProcessor, HttpConfigurationGenerator, HttpStorage};
use crate::adapters::memory::{MemoryConfigurationGenerator, MemoryStorage};
use crate::adapters::traits::{ConfigurationGenerator, StorageTransport};
use crate::config::{load_config, CourierConfig, ShareConfig};
use crate::core::decorate::{
    DecoratedProcessor, DecoratorChain, EmailDecorator, EmbedMarkupDecorator,
    FacebookShareDecorator, GmailDecorator, LinkedInShareDecorator, TumblrShareDecorator,
    TwitterIntentDecorator,
};
use crate::core::export::{ExportOrchestrator, ExportSummary, PollIntervals};
use crate::core::process::IdentityProcessor;
use crate::core::registry::{ExporterRegistry, StaticExporter};
use crate::domain::{
    ExportContent, ExportFormat, ExportProperties, Orientation, PageSize, PdfOptions,
};
use crate::logging::TracingActivityLog;
use anyhow::Context;
use clap::Args;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Formats whose output is a JSON manifest that gets fetched and decorated
pub const PUBLISHED_FORMATS: &[&str] = &["publish"];

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export format (registry key, case-sensitive)
    #[arg(short, long)]
    pub format: String,

    /// JSON file holding the content to export
    #[arg(short, long)]
    pub input: PathBuf,

    /// Export property as key=value; dotted keys nest (export.title=Roadmap)
    #[arg(short, long = "property", value_name = "KEY=VALUE")]
    pub properties: Vec<String>,

    /// PDF page orientation
    #[arg(long, value_enum)]
    pub orientation: Option<Orientation>,

    /// PDF page size
    #[arg(long, value_enum)]
    pub page_size: Option<PageSize>,

    /// PDF page margin
    #[arg(long)]
    pub margin: Option<u32>,

    /// Dry run mode - run the workflow against in-memory collaborators
    #[arg(long)]
    pub dry_run: bool,

    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(format = %self.format, "Starting export command");

        let mut config = match self.load(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Configuration loading failed");
                eprintln!("Configuration error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let format = match ExportFormat::new(self.format.as_str()) {
            Ok(format) => format,
            Err(e) => {
                eprintln!("Invalid format: {e}");
                return Ok(2);
            }
        };

        let (content, properties) = match self.request_data() {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "Invalid export input");
                eprintln!("Invalid export input: {e:#}");
                return Ok(2);
            }
        };

        let orchestrator = build_orchestrator(&format, content, &config)?;

        if config.application.dry_run && !self.json {
            println!("DRY RUN MODE - nothing leaves this process");
            println!();
        }

        let started = Instant::now();
        let mut task = orchestrator.start_export(format.clone(), Some(properties));
        let mut progress = Vec::new();

        loop {
            tokio::select! {
                message = task.next_progress() => match message {
                    Some(message) => {
                        if !self.json {
                            println!("  {message}");
                        }
                        progress.push(message);
                    }
                    None => break,
                },
                Ok(()) = shutdown_signal.changed() => {
                    tracing::info!(format = %format, "Export interrupted by user signal");
                    eprintln!("Export interrupted");
                    return Ok(130); // SIGINT exit code (standard Unix convention)
                }
            }
        }

        let outcome = task.outcome().await;
        let summary = ExportSummary::from_outcome(&format, &outcome, progress, started.elapsed());
        summary.log_summary();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }

        Ok(if summary.is_successful() { 0 } else { 1 })
    }

    /// Loads the configuration; a dry run works without a configuration file
    fn load(&self, config_path: &str) -> crate::domain::Result<CourierConfig> {
        if self.dry_run && !Path::new(config_path).exists() {
            tracing::info!(config_path = %config_path, "No configuration file, using defaults");
            return Ok(CourierConfig::default());
        }
        load_config(config_path)
    }

    /// Reads the content file and assembles the export properties
    fn request_data(&self) -> anyhow::Result<(ExportContent, ExportProperties)> {
        let raw = std::fs::read_to_string(&self.input)
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        let content = match serde_json::from_str::<Value>(&raw)
            .with_context(|| format!("failed to parse {}", self.input.display()))?
        {
            Value::Object(map) => map,
            _ => anyhow::bail!("{} must hold a JSON object", self.input.display()),
        };

        let mut properties = ExportProperties::new();
        for property in &self.properties {
            set_property(&mut properties, property)?;
        }

        PdfOptions {
            orientation: self.orientation,
            page_size: self.page_size,
            margin: self.margin,
        }
        .apply(&mut properties);

        Ok((content, properties))
    }
}

/// Builds the orchestrator for one format and its content
///
/// Dry runs use the in-memory collaborators; otherwise the HTTP ones built
/// from the `[service]` and `[polling]` sections.
pub fn build_orchestrator(
    format: &ExportFormat,
    content: ExportContent,
    config: &CourierConfig,
) -> anyhow::Result<ExportOrchestrator> {
    let dry_run = config.application.dry_run;
    let registry = build_registry(format, content, config, dry_run)?;

    let (configuration, storage): (Arc<dyn ConfigurationGenerator>, Arc<dyn StorageTransport>) =
        if dry_run {
            (
                Arc::new(MemoryConfigurationGenerator::new()),
                Arc::new(MemoryStorage::succeeding()),
            )
        } else {
            (
                Arc::new(HttpConfigurationGenerator::new(&config.service)?),
                Arc::new(HttpStorage::from_config(&config.service, &config.polling)?),
            )
        };

    Ok(
        ExportOrchestrator::new(registry, configuration, storage, Arc::new(TracingActivityLog))
            .with_intervals(PollIntervals::from(&config.polling)),
    )
}

/// Registers `content` under `format`
///
/// Published formats get a decorated processor: the real run fetches the
/// generated manifest first, a dry run decorates the bare result.
pub fn build_registry(
    format: &ExportFormat,
    content: ExportContent,
    config: &CourierConfig,
    dry_run: bool,
) -> crate::domain::Result<ExporterRegistry> {
    let exporter = StaticExporter::new(content);
    let builder = ExporterRegistry::builder();

    if !PUBLISHED_FORMATS.contains(&format.as_str()) {
        return Ok(builder.simple(format.clone(), exporter).build());
    }

    let chain = share_chain(&config.share);
    let processor = if dry_run {
        DecoratedProcessor::new(IdentityProcessor, chain)
    } else {
        let fetch = FetchResultProcessor::with_timeout(Duration::from_secs(
            config.service.timeout_seconds,
        ))?;
        DecoratedProcessor::new(fetch, chain)
    };

    Ok(builder
        .with_processor(format.clone(), exporter, processor)
        .build())
}

/// Decorators applied to published results
pub fn share_chain(share: &ShareConfig) -> DecoratorChain {
    let mut chain = DecoratorChain::new()
        .with(TwitterIntentDecorator)
        .with(LinkedInShareDecorator)
        .with(TumblrShareDecorator)
        .with(EmbedMarkupDecorator::default())
        .with(GmailDecorator)
        .with(EmailDecorator);

    if let Some(facebook) = FacebookShareDecorator::from_config(share) {
        chain = chain.with(facebook);
    }
    chain
}

/// Sets one `key=value` property
///
/// Values that parse as JSON are stored as JSON, anything else as a string.
pub fn set_property(properties: &mut ExportProperties, property: &str) -> anyhow::Result<()> {
    let (key, raw) = property
        .split_once('=')
        .with_context(|| format!("property '{property}' is not key=value"))?;

    let path: Vec<&str> = key.split('.').collect();
    if path.iter().any(|segment| segment.trim().is_empty()) {
        anyhow::bail!("property '{property}' has an empty key segment");
    }

    let value =
        serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

    insert_path(properties, &path, value);
    Ok(())
}

fn insert_path(target: &mut ExportProperties, path: &[&str], value: Value) {
    match path {
        [] => {}
        [last] => {
            target.insert(last.to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_path(child, rest, value);
            }
        }
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("Export Summary:");
    println!("  Format: {}", summary.format);
    if let Some(file_id) = &summary.file_id {
        println!("  File ID: {file_id}");
    }
    println!("  Duration: {:.2}s", summary.duration_ms as f64 / 1000.0);

    if let Some(result) = &summary.result {
        println!("  Result:");
        for (key, value) in result {
            match value {
                Value::String(text) => println!("    {key}: {text}"),
                other => println!("    {key}: {other}"),
            }
        }
        println!();
        println!("Export completed successfully!");
    } else {
        println!(
            "  Failure: {} ({})",
            summary.failure_kind.as_deref().unwrap_or("unknown"),
            summary.reason.as_deref().unwrap_or("no reason")
        );
        println!();
        println!("Export failed");
    }
}
