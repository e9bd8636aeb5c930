//! Result decoration
//!
//! Decorators enrich a successful, post-processed result with derived
//! convenience fields (share links, mail links, embed markup). Each decorator
//! reads an immutable snapshot and returns the keys it wants to add; the
//! chain merges those additions without ever overwriting an existing key.
//!
//! # Example
//!
//! ```rust
//! use courier::core::decorate::{DecoratorChain, TwitterIntentDecorator};
//! use serde_json::json;
//!
//! let chain = DecoratorChain::new().with(TwitterIntentDecorator);
//! let result = json!({"export": {"title": "T"}, "index-html": "http://x"});
//! let decorated = chain.apply(result.as_object().cloned().unwrap());
//!
//! assert!(decorated.contains_key("twitter-url"));
//! ```

pub mod mail;
pub mod share;

pub use mail::{EmailDecorator, GmailDecorator};
pub use share::{
    EmbedMarkupDecorator, FacebookShareDecorator, LinkedInShareDecorator, TumblrShareDecorator,
    TwitterIntentDecorator,
};

use crate::core::process::ResultProcessor;
use crate::domain::{ExportResult, Rejection};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Characters `encodeURIComponent` leaves untouched, removed from the escape set
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Why a decorator could not derive its fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecorationError {
    /// A field the decorator derives from is absent or not a string
    #[error("missing field '{0}'")]
    MissingField(String),
}

/// Derives additional fields from a successful result
pub trait ResultDecorator: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Returns the keys to add to `result`
    ///
    /// # Errors
    ///
    /// Returns an error when a source field is missing. The chain logs it and
    /// skips this decorator; the export still succeeds.
    fn decorate(&self, result: &ExportResult) -> Result<ExportResult, DecorationError>;
}

/// Ordered list of decorators
#[derive(Clone, Default)]
pub struct DecoratorChain {
    decorators: Vec<Arc<dyn ResultDecorator>>,
}

impl DecoratorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a decorator; decorators run in the order they were added
    pub fn with(mut self, decorator: impl ResultDecorator + 'static) -> Self {
        self.decorators.push(Arc::new(decorator));
        self
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    /// Runs every decorator over `result`
    ///
    /// Later decorators see the fields added by earlier ones.
    pub fn apply(&self, mut result: ExportResult) -> ExportResult {
        for decorator in &self.decorators {
            match decorator.decorate(&result) {
                Ok(additions) => {
                    for (key, value) in additions {
                        if result.contains_key(&key) {
                            tracing::debug!(
                                decorator = decorator.name(),
                                key = %key,
                                "Keeping existing result field"
                            );
                            continue;
                        }
                        result.insert(key, value);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        decorator = decorator.name(),
                        error = %e,
                        "Result decorator skipped"
                    );
                }
            }
        }
        result
    }
}

/// Processor that decorates the result of another processor
///
/// Same contract as the wrapped processor: it resolves with the enriched
/// result and rejects with the wrapped processor's rejection unchanged.
pub struct DecoratedProcessor {
    base: Arc<dyn ResultProcessor>,
    chain: DecoratorChain,
}

impl DecoratedProcessor {
    pub fn new(base: impl ResultProcessor + 'static, chain: DecoratorChain) -> Self {
        Self {
            base: Arc::new(base),
            chain,
        }
    }
}

#[async_trait]
impl ResultProcessor for DecoratedProcessor {
    async fn process(&self, result: ExportResult) -> Result<ExportResult, Rejection> {
        let processed = self.base.process(result).await?;
        Ok(self.chain.apply(processed))
    }
}

/// Encodes a URL component the way `encodeURIComponent` does
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}

/// Top-level string field
pub(crate) fn string_field<'a>(
    result: &'a ExportResult,
    key: &str,
) -> Result<&'a str, DecorationError> {
    result
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| DecorationError::MissingField(key.to_string()))
}

/// String field nested under the caller-supplied `export` object
pub(crate) fn export_field<'a>(
    result: &'a ExportResult,
    key: &str,
) -> Result<&'a str, DecorationError> {
    result
        .get("export")
        .and_then(|export| export.get(key))
        .and_then(Value::as_str)
        .ok_or_else(|| DecorationError::MissingField(format!("export.{key}")))
}

/// Single-entry additions map
pub(crate) fn addition(key: &str, value: String) -> ExportResult {
    let mut additions = ExportResult::new();
    additions.insert(key.to_string(), Value::String(value));
    additions
}
