//! Result type alias for Courier

use super::errors::CourierError;

/// Result type alias for fallible operations outside the export workflow
///
/// Configuration loading, logging setup and the HTTP adapters return this.
/// Export workflows themselves settle into a [`super::WorkflowOutcome`].
///
/// # Examples
///
/// ```
/// use courier::domain::result::Result;
/// use courier::domain::errors::CourierError;
///
/// fn parse_interval(raw: &str) -> Result<u64> {
///     raw.parse()
///         .map_err(|_| CourierError::Validation(format!("not a number: {raw}")))
/// }
///
/// assert!(parse_interval("2500").is_ok());
/// assert!(parse_interval("soon").is_err());
/// ```
pub type Result<T> = std::result::Result<T, CourierError>;
