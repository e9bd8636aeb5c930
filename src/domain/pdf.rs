//! PDF export options
//!
//! The PDF family of exports accepts page layout hints under the `export`
//! property. The orchestrator passes them through untouched; these types only
//! give the command line a typed way to build them.

use super::export::ExportProperties;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// ISO 216 A-series page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum PageSize {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => f.write_str("portrait"),
            Orientation::Landscape => f.write_str("landscape"),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Optional PDF layout settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PdfOptions {
    pub orientation: Option<Orientation>,
    pub page_size: Option<PageSize>,
    pub margin: Option<u32>,
}

impl PdfOptions {
    /// Whether no option is set
    pub fn is_empty(&self) -> bool {
        self.orientation.is_none() && self.page_size.is_none() && self.margin.is_none()
    }

    /// Writes the set options into `properties["export"]`
    ///
    /// Existing keys of the `export` object are kept unless an option
    /// replaces them. A non-object `export` value is replaced.
    pub fn apply(&self, properties: &mut ExportProperties) {
        if self.is_empty() {
            return;
        }

        let export = properties
            .entry("export".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !export.is_object() {
            *export = Value::Object(Map::new());
        }

        if let Value::Object(export) = export {
            if let Some(orientation) = self.orientation {
                export.insert(
                    "orientation".to_string(),
                    Value::String(orientation.to_string()),
                );
            }
            if let Some(page_size) = self.page_size {
                export.insert("page-size".to_string(), Value::String(page_size.to_string()));
            }
            if let Some(margin) = self.margin {
                export.insert("margin".to_string(), Value::from(margin));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply_creates_export_object() {
        let options = PdfOptions {
            orientation: Some(Orientation::Landscape),
            page_size: Some(PageSize::A3),
            margin: Some(10),
        };
        let mut properties = ExportProperties::new();
        options.apply(&mut properties);

        assert_eq!(
            properties["export"],
            json!({"orientation": "landscape", "page-size": "A3", "margin": 10})
        );
    }

    #[test]
    fn test_apply_keeps_existing_export_keys() {
        let mut properties = json!({"export": {"title": "Roadmap"}})
            .as_object()
            .cloned()
            .unwrap();
        PdfOptions {
            page_size: Some(PageSize::A4),
            ..Default::default()
        }
        .apply(&mut properties);

        assert_eq!(
            properties["export"],
            json!({"title": "Roadmap", "page-size": "A4"})
        );
    }

    #[test]
    fn test_apply_empty_options_is_noop() {
        let mut properties = ExportProperties::new();
        PdfOptions::default().apply(&mut properties);
        assert!(properties.is_empty());
    }
}
