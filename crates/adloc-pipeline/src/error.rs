//! Pipeline error types.

use adloc_client::ClientError;
use adloc_models::CampaignId;
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Remote(#[from] ClientError),

    #[error("Campaign not found: {0}")]
    CampaignNotFound(CampaignId),

    #[error("Campaign is still uploading: {0}")]
    CampaignPending(CampaignId),

    #[error("Campaign has no analysis yet: {0}")]
    NoAnalysis(CampaignId),

    #[error("No deletion is awaiting confirmation")]
    NoDeletionArmed,

    #[error("Deletion already in progress: {0}")]
    DeletionInFlight(CampaignId),

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

impl PipelineError {
    /// The single short string handed to the presentation layer.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Remote(e) => e.user_message(),
            PipelineError::CampaignNotFound(_) => "Campaign not found".to_string(),
            PipelineError::CampaignPending(_) => "Campaign is still uploading".to_string(),
            PipelineError::NoAnalysis(_) => "Analysis is not ready yet".to_string(),
            PipelineError::NoDeletionArmed => "Nothing to delete".to_string(),
            PipelineError::DeletionInFlight(_) => "Deletion already in progress".to_string(),
            PipelineError::TaskFailed(_) => "Something went wrong, please retry".to_string(),
        }
    }
}
