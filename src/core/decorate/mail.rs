//! Mail compose links for the published index page and archive
//!
//! Each decorator adds one link per source field that is present. A result
//! with neither `index-html` nor `archive-zip` is an error.

use super::{encode_component, export_field, DecorationError, ResultDecorator};
use crate::domain::{ExportResult, ARCHIVE_ZIP, INDEX_HTML};
use serde_json::Value;

const GMAIL_COMPOSE: &str = "https://mail.google.com/mail/u/0/?view=cm&ui=2&cmid=0&fs=1&tf=1";

/// Adds `gmail-index-html` and `gmail-archive-zip`
#[derive(Debug, Clone, Copy, Default)]
pub struct GmailDecorator;

impl ResultDecorator for GmailDecorator {
    fn name(&self) -> &'static str {
        "gmail"
    }

    fn decorate(&self, result: &ExportResult) -> Result<ExportResult, DecorationError> {
        compose_links(result, "gmail", |subject, body| {
            format!(
                "{GMAIL_COMPOSE}&su={}&body={}",
                encode_component(subject),
                encode_component(body)
            )
        })
    }
}

/// Adds `email-index-html` and `email-archive-zip` as `mailto:` links
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailDecorator;

impl ResultDecorator for EmailDecorator {
    fn name(&self) -> &'static str {
        "email"
    }

    fn decorate(&self, result: &ExportResult) -> Result<ExportResult, DecorationError> {
        compose_links(result, "email", |subject, body| {
            format!(
                "mailto:?subject={}&body={}",
                encode_component(subject),
                encode_component(body)
            )
        })
    }
}

fn compose_links(
    result: &ExportResult,
    prefix: &str,
    link: impl Fn(&str, &str) -> String,
) -> Result<ExportResult, DecorationError> {
    let subject = export_field(result, "title").unwrap_or("MindMup map");
    let mut additions = ExportResult::new();

    for source in [INDEX_HTML, ARCHIVE_ZIP] {
        if let Some(url) = result.get(source).and_then(Value::as_str) {
            additions.insert(
                format!("{prefix}-{source}"),
                Value::String(link(subject, url)),
            );
        }
    }

    if additions.is_empty() {
        return Err(DecorationError::MissingField(INDEX_HTML.to_string()));
    }
    Ok(additions)
}
