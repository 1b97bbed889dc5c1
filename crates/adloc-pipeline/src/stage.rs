//! Campaign lifecycle stages.

use std::fmt;

use adloc_models::CampaignEntity;
use serde::Serialize;

/// Where a campaign is in the upload → analyze → cluster → generate flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Placeholder, server has not acknowledged the upload yet
    Upload,
    /// Confirmed, analysis reference not available yet
    Analyze,
    /// Analysed, no segments generated
    Cluster,
    /// Generation request outstanding
    Generate,
    /// Metadata carries segment outcomes
    Ready,
}

impl PipelineStage {
    /// Stage of a confirmed campaign.
    pub fn for_entity(entity: &CampaignEntity, generating: bool) -> Self {
        if generating {
            return PipelineStage::Generate;
        }
        if entity.analysis_ref.is_none() {
            return PipelineStage::Analyze;
        }
        match &entity.metadata {
            Some(metadata) if metadata.has_segments() => PipelineStage::Ready,
            _ => PipelineStage::Cluster,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Upload => "upload",
            PipelineStage::Analyze => "analyze",
            PipelineStage::Cluster => "cluster",
            PipelineStage::Generate => "generate",
            PipelineStage::Ready => "ready",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adloc_models::{CampaignId, CampaignMetadata, GroupVariant};
    use chrono::Utc;

    fn entity(analysis_ref: Option<&str>, metadata: Option<CampaignMetadata>) -> CampaignEntity {
        CampaignEntity {
            id: CampaignId::from("c1"),
            name: None,
            original_media_ref: "/media/original/c1.mp4".to_string(),
            analysis_ref: analysis_ref.map(String::from),
            created_at: Utc::now(),
            variants: Vec::new(),
            metadata,
        }
    }

    #[test]
    fn test_stage_progression() {
        assert_eq!(PipelineStage::for_entity(&entity(None, None), false), PipelineStage::Analyze);

        let analysed = entity(Some("/media/analysis/c1.json"), None);
        assert_eq!(PipelineStage::for_entity(&analysed, false), PipelineStage::Cluster);
        assert_eq!(PipelineStage::for_entity(&analysed, true), PipelineStage::Generate);

        let metadata = CampaignMetadata {
            group_variants: vec![GroupVariant::default()],
            ..Default::default()
        };
        let ready = entity(Some("/media/analysis/c1.json"), Some(metadata));
        assert_eq!(PipelineStage::for_entity(&ready, false), PipelineStage::Ready);
        assert_eq!(PipelineStage::for_entity(&ready, true), PipelineStage::Generate);
    }

    #[test]
    fn test_generation_without_analysis_reports_generate() {
        assert_eq!(PipelineStage::for_entity(&entity(None, None), true), PipelineStage::Generate);
        assert_eq!(PipelineStage::Generate.to_string(), "generate");
    }
}
