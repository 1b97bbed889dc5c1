//! Audience segment (group variant) models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where and who a segment is, as inferred by the clustering step.
///
/// Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// morning / afternoon / evening / night
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_hour: Option<u8>,

    #[serde(rename = "ageBucket", default, skip_serializing_if = "Option::is_none")]
    pub age_bracket: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_age: Option<f64>,

    #[serde(default)]
    pub top_genders: Vec<String>,

    #[serde(default)]
    pub interests: Vec<String>,
}

/// Market research notes for a segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchOutcome {
    #[serde(default)]
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<String>,

    #[serde(default)]
    pub citations: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Status of the planner that chose a segment's edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlannerOutcome {
    #[serde(default)]
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Result of one transform attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    Applied,
    Failed(String),
    Pending,
}

/// One transform the planner considered for a segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TransformChange {
    /// Tool name (`color_grade_video`, `change_speed_video`, ...)
    pub tool: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Whether the planner asked for this change
    #[serde(default)]
    pub apply: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransformChange {
    /// Collapse the raw flags into a single outcome. An error wins over
    /// everything else.
    pub fn outcome(&self) -> ChangeOutcome {
        match (&self.error, self.applied) {
            (Some(err), _) => ChangeOutcome::Failed(err.clone()),
            (None, Some(true)) => ChangeOutcome::Applied,
            _ => ChangeOutcome::Pending,
        }
    }
}

/// One audience-segment outcome produced by generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupVariant {
    /// Stable key shared by the context, research, planner and scatter views
    pub group_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<GroupContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research: Option<ResearchOutcome>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planner: Option<PlannerOutcome>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,

    #[serde(rename = "variantUrl", default, skip_serializing_if = "Option::is_none")]
    pub variant_media_ref: Option<String>,

    /// Transform attempts, in planner order
    #[serde(default)]
    pub changes: Vec<TransformChange>,
}

impl GroupVariant {
    /// Label to show, falling back to `Group {id}`.
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("Group {}", self.group_id))
    }

    /// Changes that actually landed in the rendered variant.
    pub fn applied_changes(&self) -> impl Iterator<Item = &TransformChange> {
        self.changes
            .iter()
            .filter(|c| c.outcome() == ChangeOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_outcome_tri_state() {
        let applied = TransformChange {
            tool: "color_grade_video".into(),
            apply: true,
            applied: Some(true),
            ..Default::default()
        };
        assert_eq!(applied.outcome(), ChangeOutcome::Applied);

        let failed = TransformChange {
            tool: "trim_video".into(),
            apply: true,
            applied: Some(false),
            error: Some("ffmpeg exited 1".into()),
            ..Default::default()
        };
        assert_eq!(failed.outcome(), ChangeOutcome::Failed("ffmpeg exited 1".into()));

        let skipped = TransformChange {
            tool: "blur_backdrop_video".into(),
            ..Default::default()
        };
        assert_eq!(skipped.outcome(), ChangeOutcome::Pending);
    }

    #[test]
    fn test_group_variant_from_server_payload() {
        let json = r#"{
            "groupId": 2,
            "label": "Group 2",
            "summary": "grade warm_sunset; speed slow",
            "context": {"region": "Austin, TX", "country": "US", "timeOfDay": "evening", "ageBucket": "25-34", "interests": ["trail", "coffee"]},
            "research": {"ok": true, "insights": "Evening runners", "citations": ["https://example.com"], "model": "sonar"},
            "planner": {"ok": false, "error": "timeout", "model": "gpt-4.1-mini", "raw": ""},
            "variantName": "group-2",
            "variantUrl": "/media/processed/v-group2.mp4",
            "changes": [
                {"tool": "color_grade_video", "apply": true, "applied": true, "summary": "grade warm_sunset", "reason": "evening"},
                {"tool": "trim_video", "apply": false, "reason": "Not required by heuristics."}
            ]
        }"#;

        let group: GroupVariant = serde_json::from_str(json).unwrap();
        assert_eq!(group.group_id, 2);
        let context = group.context.as_ref().unwrap();
        assert_eq!(context.age_bracket.as_deref(), Some("25-34"));
        assert_eq!(context.time_of_day.as_deref(), Some("evening"));
        assert_eq!(group.research.as_ref().unwrap().citations.len(), 1);
        assert!(!group.planner.as_ref().unwrap().ok);
        assert_eq!(group.applied_changes().count(), 1);
        assert_eq!(group.variant_media_ref.as_deref(), Some("/media/processed/v-group2.mp4"));
    }

    #[test]
    fn test_display_label_fallback() {
        let group = GroupVariant {
            group_id: 7,
            ..Default::default()
        };
        assert_eq!(group.display_label(), "Group 7");
    }
}
