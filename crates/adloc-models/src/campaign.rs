//! Campaign models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use crate::group::GroupVariant;

/// Identifier of a campaign.
///
/// Either issued by the server or generated locally for a placeholder. The
/// two are never told apart by inspecting the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct CampaignId(pub String);

impl CampaignId {
    /// Generate a fresh local id for an unconfirmed upload.
    pub fn temporary() -> Self {
        Self(format!("pending-{}", Uuid::new_v4().simple()))
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CampaignId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CampaignId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One generated edit of the master video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Variant {
    /// Variant name (`speed_up`, a combo name, `group-3`, ...)
    pub name: String,

    /// Where the rendered media lives
    #[serde(rename = "url")]
    pub media_ref: String,
}

impl Variant {
    pub fn new(name: impl Into<String>, media_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            media_ref: media_ref.into(),
        }
    }
}

/// Server-authored campaign metadata.
///
/// Replaced wholesale whenever the server sends a new copy; keys this crate
/// does not model are carried in `extra` so nothing is lost on replacement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignMetadata {
    /// Playback speed applied to the `speed_up` variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_factor: Option<f64>,

    /// Combos applied at upload time
    #[serde(default)]
    pub combos: Vec<String>,

    /// Number of audience segments produced by the last generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_count: Option<u32>,

    /// When the last generation finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,

    /// Per-segment outcomes of the last generation
    #[serde(default)]
    pub group_variants: Vec<GroupVariant>,

    /// Everything else the server attached (product description, goal, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CampaignMetadata {
    /// Look up one segment by its group id.
    pub fn group(&self, group_id: i64) -> Option<&GroupVariant> {
        self.group_variants.iter().find(|g| g.group_id == group_id)
    }

    /// True once a generation produced at least one segment.
    pub fn has_segments(&self) -> bool {
        !self.group_variants.is_empty()
    }
}

/// A campaign confirmed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignEntity {
    /// Server-issued id
    pub id: CampaignId,

    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Master video reference
    #[serde(rename = "originalUrl")]
    pub original_media_ref: String,

    /// Analysis payload reference (may arrive after creation)
    #[serde(rename = "analysisUrl", default, skip_serializing_if = "Option::is_none")]
    pub analysis_ref: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Generated variants, oldest first
    #[serde(default)]
    pub variants: Vec<Variant>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CampaignMetadata>,
}

impl CampaignEntity {
    /// Display label, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }

    /// Append newly generated variants, keeping existing ones.
    pub fn append_variants(&mut self, variants: impl IntoIterator<Item = Variant>) {
        self.variants.extend(variants);
    }

    /// Look up one segment outcome by group id.
    pub fn group_variant(&self, group_id: i64) -> Option<&GroupVariant> {
        self.metadata.as_ref().and_then(|m| m.group(group_id))
    }
}

/// Optional form fields submitted alongside a master video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadDetails {
    /// Campaign display name
    #[validate(length(max = 120))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Product description handed to the planner
    #[validate(length(max = 2000))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_desc: Option<String>,

    /// Campaign goal
    #[validate(length(max = 500))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

impl UploadDetails {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_ids_are_unique() {
        let a = CampaignId::temporary();
        let b = CampaignId::temporary();
        assert_ne!(a, b);
    }

    #[test]
    fn test_campaign_from_list_payload() {
        let json = r#"{
            "id": "abc123",
            "originalUrl": "/media/original/abc123.mp4",
            "analysisUrl": "/media/analysis/abc123.json",
            "metadata": {"speedFactor": 1.08, "combos": ["hook_caption"], "goal": "awareness"},
            "createdAt": "2026-02-14T10:00:00+00:00"
        }"#;

        let campaign: CampaignEntity = serde_json::from_str(json).unwrap();
        assert_eq!(campaign.id.as_str(), "abc123");
        assert!(campaign.variants.is_empty());
        assert_eq!(campaign.display_name(), "abc123");

        let metadata = campaign.metadata.unwrap();
        assert_eq!(metadata.speed_factor, Some(1.08));
        assert_eq!(metadata.combos, vec!["hook_caption".to_string()]);
        assert_eq!(metadata.extra.get("goal"), Some(&Value::from("awareness")));
        assert!(!metadata.has_segments());
    }

    #[test]
    fn test_variant_serializes_media_ref_as_url() {
        let variant = Variant::new("speed_up", "/media/processed/x-speed.mp4");
        let json = serde_json::to_value(&variant).unwrap();
        assert_eq!(json["url"], "/media/processed/x-speed.mp4");
    }

    #[test]
    fn test_upload_details_validation() {
        let details = UploadDetails::named("Spring launch");
        assert!(details.validate().is_ok());

        let too_long = UploadDetails::named("x".repeat(121));
        assert!(too_long.validate().is_err());
    }
}
