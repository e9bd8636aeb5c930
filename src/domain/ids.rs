//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that flow through an export workflow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upload identifier newtype wrapper
///
/// Opaque identifier issued by the configuration generator. It correlates
/// failures with the originating upload for support and diagnostics.
///
/// # Examples
///
/// ```
/// use courier::domain::ids::FileId;
/// use std::str::FromStr;
///
/// let file_id = FileId::from_str("exports/3b1f0c2e/in.json").unwrap();
/// assert_eq!(file_id.as_str(), "exports/3b1f0c2e/in.json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileId(String);

impl FileId {
    /// Creates a new FileId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(FileId)` if the ID is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("File ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the file ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FileId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for FileId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FileId> for String {
    fn from(id: FileId) -> Self {
        id.0
    }
}

impl AsRef<str> for FileId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Export format newtype wrapper
///
/// Registry key selecting the exporter (e.g. `pdf`, `png`, `publish`).
/// Matching is case-sensitive: `PDF` and `pdf` are different formats.
///
/// # Examples
///
/// ```
/// use courier::domain::ids::ExportFormat;
///
/// let format = ExportFormat::new("pdf").unwrap();
/// assert_eq!(format.event_type(), "PDF Export");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExportFormat(String);

impl ExportFormat {
    /// Creates a new ExportFormat from a string
    pub fn new(format: impl Into<String>) -> Result<Self, String> {
        let format = format.into();
        if format.trim().is_empty() {
            return Err("Export format cannot be empty".to_string());
        }
        if format.chars().any(char::is_whitespace) {
            return Err(format!("Export format cannot contain whitespace: '{format}'"));
        }
        Ok(Self(format))
    }

    /// Returns the format as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Activity-log event prefix for this format, e.g. `PDF Export`
    pub fn event_type(&self) -> String {
        format!("{} Export", self.0.to_uppercase())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ExportFormat {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_id_creation() {
        let id = FileId::new("F1").unwrap();
        assert_eq!(id.as_str(), "F1");
    }

    #[test]
    fn test_file_id_empty_fails() {
        assert!(FileId::new("").is_err());
        assert!(FileId::new("   ").is_err());
    }

    #[test]
    fn test_file_id_display() {
        let id = FileId::new("upload-42").unwrap();
        assert_eq!(format!("{}", id), "upload-42");
    }

    #[test]
    fn test_file_id_serde_rejects_empty() {
        let parsed: Result<FileId, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());

        let parsed: FileId = serde_json::from_str("\"F9\"").unwrap();
        assert_eq!(parsed.as_str(), "F9");
    }

    #[test]
    fn test_export_format_case_sensitive() {
        let lower = ExportFormat::new("pdf").unwrap();
        let upper = ExportFormat::new("PDF").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_export_format_rejects_whitespace() {
        assert!(ExportFormat::new("").is_err());
        assert!(ExportFormat::new("p df").is_err());
    }

    #[test]
    fn test_export_format_event_type() {
        let format: ExportFormat = "png".parse().unwrap();
        assert_eq!(format.event_type(), "PNG Export");
    }
}
