//! Call and load metrics for callmap.
//!
//! Metrics are recorded through the [`metrics`] facade. No recorder is
//! installed here; the embedding service picks its exporter, and until it
//! does every call below is a no-op.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `callmap_calls_total` | Counter | `method`, `outcome` | Endpoint calls by outcome |
//! | `callmap_call_rejections_total` | Counter | `method`, `code` | Call-time rejections by error code |
//! | `callmap_call_duration_seconds` | Histogram | `method` | Handler invocation latency |
//! | `callmap_endpoints_loaded` | Gauge | - | Endpoints in the last successful load |
//! | `callmap_loads_total` | Counter | `outcome` | API map loads by outcome |

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Metric names.
pub mod names {
    /// Endpoint calls by outcome.
    pub const CALLS_TOTAL: &str = "callmap_calls_total";
    /// Call-time rejections by error code.
    pub const CALL_REJECTIONS_TOTAL: &str = "callmap_call_rejections_total";
    /// Handler invocation latency.
    pub const CALL_DURATION_SECONDS: &str = "callmap_call_duration_seconds";
    /// Endpoints in the last successful load.
    pub const ENDPOINTS_LOADED: &str = "callmap_endpoints_loaded";
    /// API map loads by outcome.
    pub const LOADS_TOTAL: &str = "callmap_loads_total";
}

/// Outcome label of a call or load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The call or load succeeded.
    Ok,
    /// Arguments were rejected before the handler ran.
    Rejected,
    /// The handler ran and failed.
    Failed,
}

impl Outcome {
    /// Returns the label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// Registers descriptions for all standard metrics with the installed
/// recorder.
pub fn describe_metrics() {
    describe_counter!(names::CALLS_TOTAL, "Total number of endpoint calls");
    describe_counter!(
        names::CALL_REJECTIONS_TOTAL,
        "Total number of calls rejected during argument binding"
    );
    describe_histogram!(
        names::CALL_DURATION_SECONDS,
        "Handler invocation duration in seconds"
    );
    describe_gauge!(
        names::ENDPOINTS_LOADED,
        "Number of endpoints produced by the last successful load"
    );
    describe_counter!(names::LOADS_TOTAL, "Total number of API map loads");
}

/// Records a finished call.
///
/// # Arguments
///
/// * `method` - The method name (e.g., "numbers.add")
/// * `outcome` - How the call ended
/// * `duration` - Time from binding to handler return
pub fn record_call(method: &str, outcome: Outcome, duration: Duration) {
    counter!(
        names::CALLS_TOTAL,
        "method" => method.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    histogram!(names::CALL_DURATION_SECONDS, "method" => method.to_string())
        .record(duration.as_secs_f64());
}

/// Records a call-time argument rejection.
///
/// `code` is the machine error code, e.g. `missing_argument`.
pub fn record_rejection(method: &str, code: &'static str) {
    counter!(
        names::CALL_REJECTIONS_TOTAL,
        "method" => method.to_string(),
        "code" => code
    )
    .increment(1);
}

/// Records a successful load of `endpoints` endpoints.
#[allow(clippy::cast_precision_loss)]
pub fn record_load(endpoints: usize) {
    counter!(names::LOADS_TOTAL, "outcome" => Outcome::Ok.as_str()).increment(1);
    gauge!(names::ENDPOINTS_LOADED).set(endpoints as f64);
}

/// Records an aborted load. The endpoint gauge keeps its previous value.
pub fn record_load_failure() {
    counter!(names::LOADS_TOTAL, "outcome" => Outcome::Failed.as_str()).increment(1);
}
