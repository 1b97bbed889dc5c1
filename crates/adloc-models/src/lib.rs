//! Shared data models for the AdLoc campaign console.
//!
//! This crate provides Serde-serializable types for:
//! - Campaigns, their variants and server-authored metadata
//! - Audience segments (group variants) with research and planner notes
//! - Imported audience profiles and their embedding points
//! - Analysis timelines (narrative events and captions)

pub mod campaign;
pub mod embedding;
pub mod group;
pub mod profile;
pub mod timeline;

// Re-export common types
pub use campaign::{CampaignEntity, CampaignId, CampaignMetadata, UploadDetails, Variant};
pub use embedding::{EmbeddingPoint, EmbeddingSource, EmbeddingsPayload};
pub use group::{
    ChangeOutcome, GroupContext, GroupVariant, PlannerOutcome, ResearchOutcome, TransformChange,
};
pub use profile::AudienceProfile;
pub use timeline::{AnalysisPayload, Caption, TimelineError, TimelineEvent};
