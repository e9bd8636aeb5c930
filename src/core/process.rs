//! Result post-processors
//!
//! A processor receives `{output-url}` merged with the caller's export
//! properties once the output listing fills, and resolves with the result
//! object handed back to the caller.

use crate::domain::{ExportResult, Rejection};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Post-processes the raw result of a successful export
#[async_trait]
pub trait ResultProcessor: Send + Sync {
    /// Turns the raw result into the final result object
    ///
    /// # Errors
    ///
    /// A rejection fails the whole workflow with the rejection's reason.
    async fn process(&self, result: ExportResult) -> Result<ExportResult, Rejection>;
}

#[async_trait]
impl<T> ResultProcessor for Arc<T>
where
    T: ResultProcessor + ?Sized,
{
    async fn process(&self, result: ExportResult) -> Result<ExportResult, Rejection> {
        self.as_ref().process(result).await
    }
}

/// Processor backed by a closure returning a boxed future
pub struct FnProcessor<F> {
    f: F,
}

impl<F> FnProcessor<F>
where
    F: Fn(ExportResult) -> BoxFuture<'static, Result<ExportResult, Rejection>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> ResultProcessor for FnProcessor<F>
where
    F: Fn(ExportResult) -> BoxFuture<'static, Result<ExportResult, Rejection>> + Send + Sync,
{
    async fn process(&self, result: ExportResult) -> Result<ExportResult, Rejection> {
        (self.f)(result).await
    }
}

/// Processor returning its input unchanged
///
/// Base of decorated processors for formats whose result needs no fetching.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityProcessor;

#[async_trait]
impl ResultProcessor for IdentityProcessor {
    async fn process(&self, result: ExportResult) -> Result<ExportResult, Rejection> {
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OUTPUT_URL;
    use serde_json::json;

    fn seed() -> ExportResult {
        json!({OUTPUT_URL: "https://out"}).as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_identity_processor() {
        assert_eq!(IdentityProcessor.process(seed()).await, Ok(seed()));
    }

    #[tokio::test]
    async fn test_fn_processor_adds_keys() {
        let processor = FnProcessor::new(|mut result: ExportResult| {
            Box::pin(async move {
                result.insert("index-html".to_string(), json!("https://out/index.html"));
                Ok(result)
            })
        });

        let processed = processor.process(seed()).await.unwrap();
        assert_eq!(processed["index-html"], json!("https://out/index.html"));
    }

    #[tokio::test]
    async fn test_fn_processor_rejection() {
        let processor = FnProcessor::new(|_| Box::pin(async { Err(Rejection::new("bad-json")) }));
        assert_eq!(processor.process(seed()).await, Err(Rejection::new("bad-json")));
    }

    #[tokio::test]
    async fn test_arc_processor_delegates() {
        let processor: Arc<dyn ResultProcessor> = Arc::new(IdentityProcessor);
        assert_eq!(processor.process(seed()).await, Ok(seed()));
    }
}
