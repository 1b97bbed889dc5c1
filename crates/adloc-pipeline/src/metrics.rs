//! Pipeline metrics.

use metrics::counter;

/// Metric name constants for consistency.
pub mod names {
    /// Listings answered from the local seed set.
    pub const LISTING_FALLBACKS_TOTAL: &str = "adloc_pipeline_listing_fallbacks_total";

    /// Async results discarded because their campaign is gone.
    pub const STALE_RESULTS_TOTAL: &str = "adloc_pipeline_stale_results_total";

    /// Finished uploads by outcome (`confirmed` / `failed`).
    pub const UPLOADS_TOTAL: &str = "adloc_pipeline_uploads_total";
}

pub fn record_listing_fallback() {
    counter!(names::LISTING_FALLBACKS_TOTAL).increment(1);
}

pub fn record_stale_result(operation: &'static str) {
    counter!(names::STALE_RESULTS_TOTAL, "operation" => operation).increment(1);
}

pub fn record_upload(outcome: &'static str) {
    counter!(names::UPLOADS_TOTAL, "outcome" => outcome).increment(1);
}
