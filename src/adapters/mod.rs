//! External system integrations for Courier.
//!
//! This module provides the collaborators the export orchestrator talks to:
//!
//! - [`traits`] - Collaborator contracts (configuration generator, storage transport)
//! - [`http`] - Export service and signed S3 URL implementations
//! - [`memory`] - In-process implementations for dry runs and tests
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with in-memory implementations. The orchestrator only ever
//! holds `Arc<dyn ConfigurationGenerator>` and `Arc<dyn StorageTransport>`.
//!
//! ```rust,no_run
//! use courier::adapters::http::{HttpConfigurationGenerator, HttpStorage};
//! use courier::config::CourierConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CourierConfig::default();
//! let generator = HttpConfigurationGenerator::new(&config.service)?;
//! let storage = HttpStorage::from_config(&config.service, &config.polling)?;
//! # Ok(())
//! # }
//! ```

pub mod http;
pub mod memory;
pub mod traits;
