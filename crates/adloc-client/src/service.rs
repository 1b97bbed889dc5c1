//! The remote service seam.

use adloc_models::{AnalysisPayload, CampaignEntity, CampaignId, EmbeddingsPayload};
use async_trait::async_trait;

use crate::error::ClientResult;
use crate::types::{CreateCampaignRequest, GenerationResult};

/// Operations the campaign pipeline needs from the remote service.
///
/// Every call may fail with a transport error or a structured rejection;
/// implementations must not retry on their own.
#[async_trait]
pub trait CampaignService: Send + Sync {
    /// All campaigns of the signed-in user, most recent first.
    async fn list_campaigns(&self) -> ClientResult<Vec<CampaignEntity>>;

    /// One campaign including variants and metadata.
    async fn fetch_campaign(&self, id: &CampaignId) -> ClientResult<CampaignEntity>;

    /// Upload a master video (and optional profile table).
    async fn create_campaign(&self, request: CreateCampaignRequest) -> ClientResult<CampaignEntity>;

    /// Events and captions behind an analysis reference.
    async fn fetch_analysis(&self, analysis_ref: &str) -> ClientResult<AnalysisPayload>;

    /// Cluster profiles into `group_count` segments and render a variant per segment.
    async fn request_generation(
        &self,
        id: &CampaignId,
        group_count: u32,
    ) -> ClientResult<GenerationResult>;

    /// Two-dimensional embedding points of the campaign's profiles.
    async fn fetch_embeddings(&self, id: &CampaignId) -> ClientResult<EmbeddingsPayload>;

    /// Permanently delete a campaign.
    async fn delete_campaign(&self, id: &CampaignId) -> ClientResult<()>;
}
