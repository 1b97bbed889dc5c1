//! Structured campaign logging utilities.
//!
//! Keeps the `campaign_id` / `operation` fields consistent across every
//! lifecycle event the pipeline emits.

use tracing::{debug, error, info, warn};

/// Logger bound to one campaign and one operation.
#[derive(Debug, Clone)]
pub struct CampaignLogger {
    campaign_id: String,
    operation: &'static str,
}

impl CampaignLogger {
    /// Create a logger for a campaign (or placeholder) id.
    pub fn new(campaign_id: impl ToString, operation: &'static str) -> Self {
        Self {
            campaign_id: campaign_id.to_string(),
            operation,
        }
    }

    /// Operation name attached to every event.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Log operation start.
    pub fn log_start(&self, message: &str) {
        info!(
            campaign_id = %self.campaign_id,
            operation = self.operation,
            "Campaign {} started: {}", self.operation, message
        );
    }

    /// Log an intermediate step at debug level.
    pub fn log_progress(&self, message: &str) {
        debug!(
            campaign_id = %self.campaign_id,
            operation = self.operation,
            "{}", message
        );
    }

    /// Log a recoverable problem.
    pub fn log_warning(&self, message: &str) {
        warn!(
            campaign_id = %self.campaign_id,
            operation = self.operation,
            "Campaign {} warning: {}", self.operation, message
        );
    }

    /// Log operation failure.
    pub fn log_error(&self, message: &str) {
        error!(
            campaign_id = %self.campaign_id,
            operation = self.operation,
            "Campaign {} failed: {}", self.operation, message
        );
    }

    /// Log successful completion.
    pub fn log_completion(&self, message: &str) {
        info!(
            campaign_id = %self.campaign_id,
            operation = self.operation,
            "Campaign {} completed: {}", self.operation, message
        );
    }
}
