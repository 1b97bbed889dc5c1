//! Client metrics collection.
//!
//! Request counters by operation and status, plus a latency histogram.

use std::time::Duration;

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total campaign service requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "adloc_client_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "adloc_client_latency_seconds";
}

/// Record a completed request. Transport failures use status 0.
pub fn record_request(operation: &str, status: u16, latency: Duration) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::REQUESTS_TOTAL.contains("requests"));
        assert!(names::LATENCY_SECONDS.contains("latency"));
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        record_request("list_campaigns", 200, Duration::from_millis(250));
        record_request("list_campaigns", 0, Duration::ZERO);
    }
}
