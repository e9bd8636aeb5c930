//! Exporter registry
//!
//! Maps a format name to the content producer for that format and, for
//! formats whose generated output needs more work, a result post-processor.
//! The registry is an explicit value built at startup and owned by the
//! orchestrator.

use crate::core::process::ResultProcessor;
use crate::domain::{ExportContent, ExportFormat};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Produces the content uploaded for one export
pub trait ContentExporter: Send + Sync {
    /// Builds the content; an empty map means there is nothing to export
    fn export(&self) -> ExportContent;
}

impl<F> ContentExporter for F
where
    F: Fn() -> ExportContent + Send + Sync,
{
    fn export(&self) -> ExportContent {
        self()
    }
}

/// Exporter serving content built ahead of time
#[derive(Debug, Clone, Default)]
pub struct StaticExporter {
    content: ExportContent,
}

impl StaticExporter {
    pub fn new(content: ExportContent) -> Self {
        Self { content }
    }
}

impl ContentExporter for StaticExporter {
    fn export(&self) -> ExportContent {
        self.content.clone()
    }
}

/// Registry entry, resolved once at registration time
#[derive(Clone)]
pub enum ExporterSpec {
    /// Content producer only; the result is the bare output URL
    Simple(Arc<dyn ContentExporter>),
    /// Content producer plus a post-processor for the result
    WithProcessor(Arc<dyn ContentExporter>, Arc<dyn ResultProcessor>),
}

impl ExporterSpec {
    pub fn simple(exporter: impl ContentExporter + 'static) -> Self {
        ExporterSpec::Simple(Arc::new(exporter))
    }

    pub fn with_processor(
        exporter: impl ContentExporter + 'static,
        processor: impl ResultProcessor + 'static,
    ) -> Self {
        ExporterSpec::WithProcessor(Arc::new(exporter), Arc::new(processor))
    }

    pub fn exporter(&self) -> &dyn ContentExporter {
        match self {
            ExporterSpec::Simple(exporter) | ExporterSpec::WithProcessor(exporter, _) => {
                exporter.as_ref()
            }
        }
    }

    pub fn processor(&self) -> Option<&dyn ResultProcessor> {
        match self {
            ExporterSpec::Simple(_) => None,
            ExporterSpec::WithProcessor(_, processor) => Some(processor.as_ref()),
        }
    }
}

impl fmt::Debug for ExporterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExporterSpec::Simple(_) => f.write_str("ExporterSpec::Simple"),
            ExporterSpec::WithProcessor(_, _) => f.write_str("ExporterSpec::WithProcessor"),
        }
    }
}

/// Format-keyed exporter lookup (case-sensitive)
#[derive(Debug, Clone, Default)]
pub struct ExporterRegistry {
    entries: HashMap<ExportFormat, ExporterSpec>,
}

impl ExporterRegistry {
    pub fn builder() -> ExporterRegistryBuilder {
        ExporterRegistryBuilder::default()
    }

    /// Entry for `format`, if registered
    pub fn get(&self, format: &ExportFormat) -> Option<&ExporterSpec> {
        self.entries.get(format)
    }

    pub fn contains(&self, format: &ExportFormat) -> bool {
        self.entries.contains_key(format)
    }

    /// Registered formats, sorted
    pub fn formats(&self) -> Vec<&ExportFormat> {
        let mut formats: Vec<_> = self.entries.keys().collect();
        formats.sort();
        formats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`ExporterRegistry`]
#[derive(Debug, Default)]
pub struct ExporterRegistryBuilder {
    entries: HashMap<ExportFormat, ExporterSpec>,
}

impl ExporterRegistryBuilder {
    /// Registers `spec` for `format`, replacing any earlier entry
    pub fn register(mut self, format: ExportFormat, spec: ExporterSpec) -> Self {
        if self.entries.contains_key(&format) {
            tracing::warn!(format = %format, "Replacing registered exporter");
        }
        self.entries.insert(format, spec);
        self
    }

    pub fn simple(self, format: ExportFormat, exporter: impl ContentExporter + 'static) -> Self {
        self.register(format, ExporterSpec::simple(exporter))
    }

    pub fn with_processor(
        self,
        format: ExportFormat,
        exporter: impl ContentExporter + 'static,
        processor: impl ResultProcessor + 'static,
    ) -> Self {
        self.register(format, ExporterSpec::with_processor(exporter, processor))
    }

    pub fn build(self) -> ExporterRegistry {
        ExporterRegistry {
            entries: self.entries,
        }
    }
}
