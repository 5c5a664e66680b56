//! Observability for callmap.
//!
//! - **Logging**: structured JSON or pretty output via `tracing-subscriber`
//! - **Metrics**: call, rejection and load counters via the `metrics` facade
//!
//! # Example
//!
//! ```rust,ignore
//! use callmap_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production())?;
//! callmap_telemetry::metrics::describe_metrics();
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use crate::metrics::Outcome;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
