//! Prometheus metrics for the poll and broadcast pipeline.

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Polls attempted counter metric name.
pub const METRIC_POLLS: &str = "flag_polls_total";
/// Poll failures counter metric name.
pub const METRIC_POLL_FAILURES: &str = "flag_poll_failures_total";
/// Flag changes counter metric name.
pub const METRIC_FLAG_CHANGES: &str = "flag_changes_total";
/// Broadcasts counter metric name.
pub const METRIC_BROADCASTS: &str = "flag_broadcasts_total";
/// Stream connections counter metric name.
pub const METRIC_STREAM_CONNECTS: &str = "stream_connects_total";
/// Stream disconnections counter metric name.
pub const METRIC_STREAM_DISCONNECTS: &str = "stream_disconnects_total";
/// Active subscriber gauge metric name.
pub const METRIC_ACTIVE_SUBSCRIBERS: &str = "stream_active_subscribers";

/// Install the Prometheus recorder and register metric descriptions.
/// Call this once at startup; the returned handle renders the exposition.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(METRIC_POLLS, "Total number of parameter store polls attempted");
    describe_counter!(METRIC_POLL_FAILURES, "Total number of parameter store polls that failed");
    describe_counter!(METRIC_FLAG_CHANGES, "Total number of observed flag value changes");
    describe_counter!(METRIC_BROADCASTS, "Total number of flag broadcasts to subscribers");
    describe_counter!(METRIC_STREAM_CONNECTS, "Total number of stream subscriptions opened");
    describe_counter!(METRIC_STREAM_DISCONNECTS, "Total number of stream subscriptions closed");
    describe_gauge!(METRIC_ACTIVE_SUBSCRIBERS, "Number of currently connected stream subscribers");

    debug!("Metrics initialized");

    Ok(handle)
}

/// Increment the polls counter.
pub fn inc_polls() {
    counter!(METRIC_POLLS).increment(1);
}

/// Increment the poll failures counter.
pub fn inc_poll_failures() {
    counter!(METRIC_POLL_FAILURES).increment(1);
}

/// Increment the flag changes counter.
pub fn inc_flag_changes() {
    counter!(METRIC_FLAG_CHANGES).increment(1);
}

/// Increment the broadcasts counter.
pub fn inc_broadcasts() {
    counter!(METRIC_BROADCASTS).increment(1);
}

/// Increment the stream connects counter.
pub fn inc_stream_connects() {
    counter!(METRIC_STREAM_CONNECTS).increment(1);
}

/// Increment the stream disconnects counter.
pub fn inc_stream_disconnects() {
    counter!(METRIC_STREAM_DISCONNECTS).increment(1);
}

/// Record the current number of connected subscribers.
pub fn set_active_subscribers(count: usize) {
    gauge!(METRIC_ACTIVE_SUBSCRIBERS).set(count as f64);
}
